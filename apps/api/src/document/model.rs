//! The editor's document: an opaque rich-text tree. It is checked for being
//! well-formed JSON and nothing else; its schema belongs to the editor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentTree(pub Value);

impl DocumentTree {
    /// Structural parse of a stored blob.
    pub fn parse(blob: &str) -> Result<Self, AppError> {
        serde_json::from_str(blob)
            .map(DocumentTree)
            .map_err(|e| AppError::CorruptDocument(e.to_string()))
    }

    pub fn to_blob(&self) -> Result<String, AppError> {
        serde_json::to_string(&self.0).map_err(|e| AppError::Internal(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_accepts_any_json_tree() {
        let doc = DocumentTree::parse(r#"{"type":"doc","content":[{"type":"paragraph"}]}"#)
            .expect("valid tree");
        assert_eq!(doc.0["type"], json!("doc"));
    }

    #[test]
    fn test_parse_rejects_truncated_blob() {
        let err = DocumentTree::parse(r#"{"type":"doc","content":["#);
        assert!(matches!(err, Err(AppError::CorruptDocument(_))));
    }

    #[test]
    fn test_blob_round_trips_unicode() {
        let doc = DocumentTree(json!({"type": "text", "text": "吾輩は猫である"}));
        let blob = doc.to_blob().expect("serializes");
        assert!(blob.contains("吾輩は猫である"));
        assert_eq!(DocumentTree::parse(&blob).expect("parses"), doc);
    }
}
