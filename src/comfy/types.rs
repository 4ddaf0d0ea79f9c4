use serde::Deserialize;
use std::collections::HashMap;

/// Response from the ComfyUI `/prompt` endpoint after a workflow is queued.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub prompt_id: String,
}

/// Response from `/history/{prompt_id}`: a map keyed by prompt id. The
/// entry only appears once the job has executed.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryResponse {
    #[serde(flatten)]
    pub entries: HashMap<String, HistoryEntry>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub outputs: HashMap<String, NodeOutput>,
}

#[derive(Debug, Deserialize)]
pub struct NodeOutput {
    pub images: Option<Vec<ImageRef>>,
}

/// One rendered file as ComfyUI reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRef {
    pub filename: String,
    #[serde(default)]
    pub subfolder: String,
}

impl HistoryResponse {
    /// First image recorded for the given prompt, if the job has finished
    /// and produced one.
    pub fn first_image(&self, prompt_id: &str) -> Option<&ImageRef> {
        self.entries
            .get(prompt_id)?
            .outputs
            .values()
            .find_map(|output| output.images.as_ref()?.first())
    }
}
