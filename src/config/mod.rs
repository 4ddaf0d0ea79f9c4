mod types;

pub use types::*;

use crate::Result;
use std::env;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(&config_path).await?;
    let mut config: Config = serde_yaml::from_str(&config_str)?;

    apply_env_overrides(&mut config);
    normalize(&mut config);

    Ok(config)
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(url) = env::var("COMFY_API_URL") {
        config.comfy.base_url = url;
    }
}

/// Trim trailing slashes once so every URL join can use `{base}/path`.
fn normalize(config: &mut Config) {
    trim_trailing_slash(&mut config.comfy.base_url);
    trim_trailing_slash(&mut config.server.public_base_url);
}

fn trim_trailing_slash(url: &mut String) {
    while url.ends_with('/') {
        url.pop();
    }
}
