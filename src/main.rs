#![allow(non_snake_case)]

use zoomBridge::cli;
use zoomBridge::config::AppConfig;
use zoomBridge::runtime;

const DEFAULT_RUN_MODE: &str = "cli";

#[tokio::main]
async fn main() {
    let config = AppConfig::load();
    let run_mode = config
        .get("RUN_MODE")
        .unwrap_or(DEFAULT_RUN_MODE.to_string());

    if run_mode == "api" {
        runtime::run_api(config).await;
    } else if run_mode == "cli" {
        let state = match runtime::build_state(&config) {
            Ok(state) => state,
            Err(err) => {
                eprintln!("{}", err);
                return;
            }
        };
        cli::cli(&state).await;
    } else {
        println!("Invalid run mode {}", run_mode);
    }
}
