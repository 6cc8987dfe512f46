//! Metrics API server command (`floorwatch serve`).

use anyhow::Result;

use floorwatch::config::FloorConfig;
use floorwatch::factory::server::{ServerConfig, start_server};

pub async fn cmd_serve(config: &FloorConfig) -> Result<()> {
    for warning in config.validate() {
        tracing::warn!("{}", warning);
    }

    start_server(ServerConfig {
        host: config.host(),
        port: config.port(),
        data_path: config.data_path(),
        permissive_cors: config.permissive_cors(),
        production_target: config.production_target(),
        answer_url: config.answer_url(),
        answer_timeout: config.answer_timeout(),
    })
    .await
}
