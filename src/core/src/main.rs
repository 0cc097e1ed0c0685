use clap::Parser;
use log::{error, info, LevelFilter};
use shipyard::configuration::config::{CliArgs, Config};
use shipyard::controller::controller_handler::Controller;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    let config = Config::load(&args);

    // RUST_LOG directives win over the configured default level
    let level = config
        .as_ref()
        .ok()
        .and_then(|c| c.log_filter().ok())
        .unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_target(false)
        .init();

    println!(
        "
==============================================================================
       shipyard v{} - product, release, client and license admin API
==============================================================================
",
        env!("CARGO_PKG_VERSION")
    );

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Unable to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!("Configuration loaded successfully");

    let mut controller = match Controller::new(config) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Unable to create a controller instance: {}, exiting...", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = controller.run().await {
        error!("Error occurred in the controller process: {}, exiting...", e);
        std::process::exit(1);
    }
}
