// Web Interface module root
pub mod routes;
pub mod types;
pub mod web_server;


// Re-export commonly used items
pub use types::*;
pub use web_server::{cors, WebServer};
