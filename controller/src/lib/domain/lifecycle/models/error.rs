use serde::Deserialize;
use serde_json::Value;
use std::fmt::{Display, Formatter};
use thiserror::Error;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// One entry of the `errors` list in a GraphQL response.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GraphQlErrorEntry {
    pub message: String,
    #[serde(default)]
    pub locations: Option<Vec<ErrorLocation>>,
    #[serde(default)]
    pub path: Option<Vec<Value>>,
}

impl GraphQlErrorEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: None,
            path: None,
        }
    }

    pub fn location_text(&self) -> String {
        match &self.locations {
            Some(locations) if !locations.is_empty() => locations
                .iter()
                .map(|l| format!("{}:{}", l.line, l.column))
                .collect::<Vec<_>>()
                .join(","),
            _ => "undefined".to_string(),
        }
    }

    pub fn path_text(&self) -> String {
        match &self.path {
            Some(path) if !path.is_empty() => path
                .iter()
                .map(|segment| match segment {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("."),
            _ => "undefined".to_string(),
        }
    }
}

impl Display for GraphQlErrorEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

fn join_messages(errors: &[GraphQlErrorEntry]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The call failed: network, HTTP status, or a GraphQL error list.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response is not a GraphQL document: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("graphql error: {}", join_messages(.0))]
    GraphQl(Vec<GraphQlErrorEntry>),
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_entry_formatting() {
        let entry: GraphQlErrorEntry = serde_json::from_str(
            r#"{"message": "Not Authorized", "locations": [{"line": 2, "column": 3}], "path": ["serviceRestart", 0]}"#,
        )
        .unwrap();
        assert_eq!(entry.location_text(), "2:3");
        assert_eq!(entry.path_text(), "serviceRestart.0");

        let bare = GraphQlErrorEntry::new("boom");
        assert_eq!(bare.location_text(), "undefined");
        assert_eq!(bare.path_text(), "undefined");
    }

    #[test]
    fn test_graphql_error_message_joins_entries() {
        let error = TransportError::GraphQl(vec![
            GraphQlErrorEntry::new("first"),
            GraphQlErrorEntry::new("second"),
        ]);
        assert_eq!(error.to_string(), "graphql error: first; second");
    }
}
