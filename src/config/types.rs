use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub comfy: ComfyConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComfyConfig {
    #[serde(default = "default_comfy_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL clients can reach this service at; generated image URLs
    /// point back here.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    #[serde(default = "default_workflow_dir")]
    pub workflow_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Delay between history polls while waiting for a render.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Number of polls before a job is reported as timed out.
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
    /// Pause between batch items so the backend queue is not flooded.
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_base_url: default_public_base_url(),
            workflow_dir: default_workflow_dir(),
            output_dir: default_output_dir(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            poll_attempts: default_poll_attempts(),
            batch_delay_ms: default_batch_delay_ms(),
        }
    }
}

fn default_comfy_base_url() -> String {
    "http://127.0.0.1:8188".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_workflow_dir() -> String {
    "workflows".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_poll_attempts() -> u32 {
    100
}

fn default_batch_delay_ms() -> u64 {
    2000
}
