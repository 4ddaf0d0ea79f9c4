use super::types::Outcome;
use crate::comfy::ComfyClient;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Bounded completion poller for a submitted job.
///
/// Sleeps a fixed interval between history fetches and gives up with
/// [`Outcome::Timeout`] once the attempt budget is spent. The job keeps
/// running on the backend either way; there is no cancellation.
pub struct Poller<'a> {
    client: &'a dyn ComfyClient,
    public_base_url: &'a str,
    interval: Duration,
    attempts: u32,
}

impl<'a> Poller<'a> {
    pub fn new(
        client: &'a dyn ComfyClient,
        public_base_url: &'a str,
        interval: Duration,
        attempts: u32,
    ) -> Self {
        Self {
            client,
            public_base_url,
            interval,
            attempts,
        }
    }

    /// Wait until the backend's history records an output image for
    /// `prompt_id`, then build the servable URL. `subfolder` overrides the
    /// folder the backend reports; `index` labels log lines for batches.
    pub async fn wait_for_image(
        &self,
        prompt_id: &str,
        subfolder: Option<&str>,
        index: Option<usize>,
    ) -> Outcome {
        for attempt in 0..self.attempts {
            sleep(self.interval).await;

            // Transient fetch or parse failures just mean "not ready yet".
            let history = match self.client.history(prompt_id).await {
                Ok(history) => history,
                Err(e) => {
                    debug!(
                        prompt_id,
                        attempt,
                        "History fetch failed, will retry: {}", e
                    );
                    continue;
                }
            };

            if let Some(image) = history.first_image(prompt_id) {
                let folder = match subfolder {
                    Some(folder) if !folder.is_empty() => folder,
                    _ => image.subfolder.as_str(),
                };
                let path = if folder.is_empty() {
                    image.filename.clone()
                } else {
                    format!("{}/{}", folder, image.filename)
                };
                let url = format!(
                    "{}/output/{}?cb={}",
                    self.public_base_url,
                    path,
                    chrono::Utc::now().timestamp()
                );
                debug!(prompt_id, ?index, url, "Image ready");
                return Outcome::Image(url);
            }
        }

        warn!(
            prompt_id,
            ?index,
            attempts = self.attempts,
            "Polling budget exhausted, reporting timeout"
        );
        Outcome::Timeout
    }
}
