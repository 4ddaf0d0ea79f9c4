//! REST client for the ComfyUI HTTP endpoints used by this gateway:
//! workflow submission (`POST /prompt`) and history retrieval
//! (`GET /history/{prompt_id}`).

mod client;
mod types;

pub use client::{ComfyClient, HttpComfyClient};
pub use types::{HistoryEntry, HistoryResponse, ImageRef, NodeOutput, SubmitResponse};
