use axum::{body::Body, http::Request, Router};
use backdrop::{
    comfy::{ComfyClient, HttpComfyClient},
    config::{ComfyConfig, Config, GenerationConfig, LogsConfig, ServerConfig},
    generation::Generator,
    server::{router, AppState},
};
use std::sync::Arc;
use tempfile::TempDir;

/// Minimal but realistic ComfyUI workflow graph used by the tests.
pub const SAMPLE_WORKFLOW: &str = r#"{
    "3": {
        "class_type": "KSampler",
        "inputs": {"seed": 0, "steps": 20, "cfg": 8.0}
    },
    "6": {
        "class_type": "CLIPTextEncode",
        "_meta": {"title": "Positive Prompt"},
        "inputs": {"text": "placeholder", "clip": ["4", 1]}
    },
    "9": {
        "class_type": "SaveImage",
        "inputs": {"filename_prefix": "out", "images": ["8", 0]}
    }
}"#;

pub struct TestContext {
    pub app: Router,
    pub workflow_dir: TempDir,
    pub output_dir: TempDir,
}

/// Build the real router against a fake ComfyUI at `comfy_url`, with
/// fast polling so timeout paths finish quickly.
pub fn test_context(comfy_url: &str) -> TestContext {
    let workflow_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    let config = Config {
        comfy: ComfyConfig {
            base_url: comfy_url.trim_end_matches('/').to_string(),
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            public_base_url: "http://127.0.0.1:5000".to_string(),
            workflow_dir: workflow_dir.path().to_string_lossy().into_owned(),
            output_dir: output_dir.path().to_string_lossy().into_owned(),
            logs: LogsConfig::default(),
        },
        generation: GenerationConfig {
            poll_interval_ms: 10,
            poll_attempts: 5,
            batch_delay_ms: 0,
        },
    };

    let config = Arc::new(config);
    let client: Arc<dyn ComfyClient> = Arc::new(HttpComfyClient::new(&config.comfy.base_url));
    let generator = Arc::new(Generator::new(client, config.clone()));

    let app = router(AppState {
        config,
        generator,
    });

    TestContext {
        app,
        workflow_dir,
        output_dir,
    }
}

pub fn write_workflow(ctx: &TestContext, name: &str) {
    std::fs::write(ctx.workflow_dir.path().join(name), SAMPLE_WORKFLOW).unwrap();
}

pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
