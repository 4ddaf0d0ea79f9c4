//! Generation orchestration: loads a workflow template, patches it per
//! request, submits it to ComfyUI, and waits for the rendered image.

mod poller;
mod types;

pub use poller::Poller;
pub use types::Outcome;

use crate::comfy::ComfyClient;
use crate::config::Config;
use crate::{workflow, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

pub struct Generator {
    client: Arc<dyn ComfyClient>,
    config: Arc<Config>,
}

impl Generator {
    pub fn new(client: Arc<dyn ComfyClient>, config: Arc<Config>) -> Self {
        Self { client, config }
    }

    /// One prompt, one job. Template and backend failures propagate so
    /// the handler can answer with a 500; an unfinished job is reported
    /// as [`Outcome::Timeout`].
    pub async fn single(
        &self,
        workflow_name: &str,
        subfolder: Option<&str>,
        prompt: &str,
    ) -> Result<Outcome> {
        let mut template =
            workflow::load(&self.config.server.workflow_dir, workflow_name).await?;

        let token = new_token();
        let spec = workflow::MutationSpec {
            prompt,
            token: &token,
            base_seed: chrono::Utc::now().timestamp(),
            index: None,
            item_id: None,
            subfolder,
        };
        workflow::apply(&mut template, &spec);

        let prompt_id = self.client.submit(&template).await?;
        info!(prompt_id, "Workflow submitted");

        Ok(self.poller().wait_for_image(&prompt_id, subfolder, None).await)
    }

    /// Process batch items strictly in order, one result per input index.
    /// Malformed or blank items are skipped with their sentinel outcome;
    /// a submission failure marks that item and the batch carries on.
    pub async fn batch(
        &self,
        workflow_name: &str,
        subfolder: Option<&str>,
        events: &[Value],
    ) -> Result<Vec<Outcome>> {
        let template =
            workflow::load(&self.config.server.workflow_dir, workflow_name).await?;

        let token = new_token();
        let base_seed = chrono::Utc::now().timestamp();
        let mut results = Vec::with_capacity(events.len());

        for (index, event) in events.iter().enumerate() {
            let Some(item) = event.as_object() else {
                results.push(Outcome::Invalid);
                continue;
            };

            let prompt = item_prompt(item);
            if prompt.is_empty() {
                results.push(Outcome::Empty);
                continue;
            }

            let item_id = item
                .get("id")
                .filter(|id| !id.is_null())
                .map(render_id);
            let mut graph = template.clone();
            let spec = workflow::MutationSpec {
                prompt: &prompt,
                token: &token,
                base_seed,
                index: Some(index),
                item_id: item_id.as_deref(),
                subfolder,
            };
            workflow::apply(&mut graph, &spec);

            let outcome = match self.client.submit(&graph).await {
                Ok(prompt_id) => {
                    info!(prompt_id, index, "Batch item submitted");
                    self.poller()
                        .wait_for_image(&prompt_id, subfolder, Some(index))
                        .await
                }
                Err(e) => {
                    warn!(index, "Batch item submission failed: {}", e);
                    Outcome::Failed(e.to_string())
                }
            };
            results.push(outcome);

            // Give the backend queue room to breathe between items.
            sleep(Duration::from_millis(self.config.generation.batch_delay_ms)).await;
        }

        Ok(results)
    }

    fn poller(&self) -> Poller<'_> {
        Poller::new(
            self.client.as_ref(),
            &self.config.server.public_base_url,
            Duration::from_millis(self.config.generation.poll_interval_ms),
            self.config.generation.poll_attempts,
        )
    }
}

fn new_token() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}

/// Prompt text for a batch item: `background`, falling back to
/// `background_image` when absent or blank, trimmed.
fn item_prompt(item: &serde_json::Map<String, Value>) -> String {
    let background = item.get("background").and_then(Value::as_str).unwrap_or("");
    let raw = if background.is_empty() {
        item.get("background_image")
            .and_then(Value::as_str)
            .unwrap_or("")
    } else {
        background
    };
    raw.trim().to_string()
}

/// Item ids may arrive as JSON numbers or strings; the filename only
/// cares about the textual form.
fn render_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
