pub mod catalog;
pub mod configuration;
pub mod controller;
pub mod error_handling;
pub mod records;
pub mod storage;
pub mod web_interface;

pub use controller::Controller;
