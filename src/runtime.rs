use std::sync::Arc;

use chrono_tz::Tz;

use crate::clients::auth::ZoomAuth;
use crate::clients::zoom::{MeetingOps, ZoomClient, ZoomOps};
use crate::config::AppConfig;
use crate::handlers::http;
use crate::service::scheduler::SchedulerService;

pub fn build_state(config: &AppConfig) -> Result<Arc<http::AppState>, String> {
    let auth = ZoomAuth::from_config(config).map_err(|err| err.to_string())?;
    let zoom = Arc::new(ZoomClient::new(auth));
    let default_tz: Tz = config
        .timezone()
        .parse()
        .map_err(|_| format!("Invalid DEFAULT_TIMEZONE: {}", config.timezone()))?;
    let ops: Arc<dyn MeetingOps> = zoom.clone();
    let scheduler = Arc::new(SchedulerService::new(
        ops,
        config.contacts_file(),
        config.timezone(),
    ));
    let zoom: Arc<dyn ZoomOps> = zoom;
    Ok(Arc::new(http::AppState {
        zoom,
        scheduler,
        default_tz,
    }))
}

pub async fn run_api(config: AppConfig) {
    let state = match build_state(&config) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("Failed to start API: {}", err);
            return;
        }
    };
    let port = config.bind_port();
    let routes = http::routes(state);
    println!("Serving REST API on 0.0.0.0:{}", port);
    warp::serve(routes).run(([0, 0, 0, 0], port)).await;
}
