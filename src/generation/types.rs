use serde::{Serialize, Serializer};

/// Result of one generation attempt. Callers branch on the variant;
/// the HTTP layer serializes it to the wire sentinels the API contract
/// promises (`"empty"`, `"invalid"`, `"timeout"`, `"error: ..."`, or the
/// image URL itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Servable URL for the rendered image.
    Image(String),
    /// The item's prompt was blank after trimming; nothing submitted.
    Empty,
    /// The batch item was not a well-formed object; nothing submitted.
    Invalid,
    /// The backend never reported the job within the polling budget.
    Timeout,
    /// Submission or backend failure for this item.
    Failed(String),
}

impl Outcome {
    pub fn to_wire(&self) -> String {
        match self {
            Outcome::Image(url) => url.clone(),
            Outcome::Empty => "empty".to_string(),
            Outcome::Invalid => "invalid".to_string(),
            Outcome::Timeout => "timeout".to_string(),
            Outcome::Failed(msg) => format!("error: {msg}"),
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn outcomes_serialize_to_wire_sentinels() {
        let outcomes = vec![
            Outcome::Image("http://host/output/a.png?cb=1".to_string()),
            Outcome::Empty,
            Outcome::Invalid,
            Outcome::Timeout,
            Outcome::Failed("boom".to_string()),
        ];

        let json = serde_json::to_string(&outcomes).unwrap();
        assert_eq!(
            json,
            r#"["http://host/output/a.png?cb=1","empty","invalid","timeout","error: boom"]"#
        );
    }
}
