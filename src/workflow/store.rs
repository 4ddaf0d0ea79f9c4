use crate::{Error, Result};
use std::path::Path;
use tracing::debug;

/// List the `*.json` workflow templates in the template directory.
pub async fn list(dir: &str) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".json") && entry.file_type().await?.is_file() {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// Load and parse one workflow template by filename.
///
/// The template directory is the trust boundary: names that try to walk
/// out of it are rejected.
pub async fn load(dir: &str, name: &str) -> Result<serde_json::Value> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(Error::workflow(format!("invalid workflow name: {name:?}")));
    }

    let path = Path::new(dir).join(name);
    debug!("Loading workflow template: {}", path.display());

    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| Error::workflow(format!("cannot read template {name}: {e}")))?;

    serde_json::from_str(&raw)
        .map_err(|e| Error::workflow(format!("template {name} is not valid JSON: {e}")))
}
