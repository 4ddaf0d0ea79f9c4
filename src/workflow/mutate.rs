use serde_json::Value;

/// Sampler node types whose `seed` input gets rewritten.
const SEED_NODES: [&str; 3] = ["KSampler", "KSamplerAdvanced", "Seed"];

/// Title a `CLIPTextEncode` node must carry to receive the prompt text.
const POSITIVE_PROMPT_TITLE: &str = "Positive Prompt";

/// Everything one mutation pass needs. Deterministic: the same spec
/// applied to the same template produces the same workflow.
#[derive(Debug, Clone)]
pub struct MutationSpec<'a> {
    pub prompt: &'a str,
    /// Uniqueness token shared by all filenames of one request/batch.
    pub token: &'a str,
    /// Time base for seeds; batched items offset from it by index.
    pub base_seed: i64,
    pub index: Option<usize>,
    pub item_id: Option<&'a str>,
    pub subfolder: Option<&'a str>,
}

impl<'a> MutationSpec<'a> {
    pub fn seed(&self) -> i64 {
        match self.index {
            Some(index) => self.base_seed + (index as i64 + 1) * 10_000,
            None => self.base_seed,
        }
    }

    pub fn filename_prefix(&self) -> String {
        let name = match (self.item_id, self.index) {
            (Some(id), Some(index)) => format!("background_id={id}_{index:02}_{}", self.token),
            (_, Some(index)) => format!("background_{index:02}_{}", self.token),
            _ => format!("background_{}", self.token),
        };
        match self.subfolder {
            Some(subfolder) if !subfolder.is_empty() => format!("{subfolder}/{name}"),
            _ => name,
        }
    }
}

/// Patch prompt text, seeds, and output filenames into a workflow graph.
///
/// Operates on an owned copy; callers clone the parsed template per unit
/// of work so batch items never share mutated state. Nodes that match no
/// rule are left untouched, and a graph with no matching nodes is a
/// silent no-op.
pub fn apply(workflow: &mut Value, spec: &MutationSpec<'_>) {
    let Some(nodes) = workflow.as_object_mut() else {
        return;
    };

    for node in nodes.values_mut() {
        let Some(class_type) = node.get("class_type").and_then(Value::as_str) else {
            continue;
        };
        let class_type = class_type.to_string();

        if class_type == "CLIPTextEncode" && node_title(node) == Some(POSITIVE_PROMPT_TITLE) {
            if let Some(inputs) = node.get_mut("inputs").and_then(Value::as_object_mut) {
                inputs.insert("text".to_string(), Value::from(spec.prompt));
            }
        } else if SEED_NODES.contains(&class_type.as_str()) {
            if let Some(inputs) = node.get_mut("inputs").and_then(Value::as_object_mut) {
                if inputs.contains_key("seed") {
                    inputs.insert("seed".to_string(), Value::from(spec.seed()));
                }
            }
        } else if class_type == "SaveImage" {
            if let Some(inputs) = node.get_mut("inputs").and_then(Value::as_object_mut) {
                if inputs.contains_key("filename_prefix") {
                    inputs.insert(
                        "filename_prefix".to_string(),
                        Value::from(spec.filename_prefix()),
                    );
                }
                // The subfolder rides inside filename_prefix; a stale
                // subfolder input would fight with it.
                if spec.subfolder.is_some() {
                    inputs.remove("subfolder");
                }
            }
        }
    }
}

fn node_title(node: &Value) -> Option<&str> {
    node.get("_meta")?.get("title")?.as_str()
}
