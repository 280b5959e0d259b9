use clap::Parser;
use env_logger::Env;

mod app;
mod artifact;
mod cli;
mod config;
mod conversation;
mod core;
mod display;
mod input;
mod orchestrator;
mod providers;
mod tools;
mod viewer;
mod web;

use crate::app::Application;
use crate::cli::Args;
use crate::config::Config;
use crate::core::error::ChatError;

#[tokio::main]
async fn main() -> Result<(), ChatError> {
    let args = Args::parse();
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let api_key = match config::api_key_from_env() {
        Ok(key) => key,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(config) => config.merge_args(&args),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let app = Application::new(args, config, api_key);
    app.run().await
}
