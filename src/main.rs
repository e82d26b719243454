use clap::Parser;
use env_logger::Env;
use scada_console::{ConsoleConfig, run_gui};

fn main() -> eframe::Result {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = ConsoleConfig::parse();
    log::info!("starting console against {}", config.api_url);
    run_gui(config)
}
