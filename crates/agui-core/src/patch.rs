// SPDX-License-Identifier: MIT OR Apache-2.0
//! JSON-Patch (RFC 6902) operations carried by `STATE_DELTA` events.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::EventError;

/// A single JSON-Patch operation.
///
/// `path` must be non-empty and start with `/`; `value` is required for
/// `add`/`replace`/`test`, and `from` is required for `move`/`copy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum JsonPatchOperation {
    Add { path: String, value: JsonValue },
    Remove { path: String },
    Replace { path: String, value: JsonValue },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: JsonValue },
}

impl JsonPatchOperation {
    /// The `path` field common to every operation variant.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            JsonPatchOperation::Add { path, .. }
            | JsonPatchOperation::Remove { path }
            | JsonPatchOperation::Replace { path, .. }
            | JsonPatchOperation::Move { path, .. }
            | JsonPatchOperation::Copy { path, .. }
            | JsonPatchOperation::Test { path, .. } => path,
        }
    }

    /// Validate structural constraints: non-empty `path` starting with `/`.
    /// `value`/`from` presence is enforced by the type itself (they are
    /// required fields on the variants that need them), so this only checks
    /// the constraint the type system can't express.
    pub fn validate(&self) -> Result<(), EventError> {
        let path = self.path();
        if path.is_empty() || !path.starts_with('/') {
            return Err(EventError::InvalidField {
                field: "path",
                reason: format!("JSON-Patch path {path:?} must be non-empty and start with '/'"),
            });
        }
        if let JsonPatchOperation::Move { from, .. } | JsonPatchOperation::Copy { from, .. } = self
            && (from.is_empty() || !from.starts_with('/'))
        {
            return Err(EventError::InvalidField {
                field: "from",
                reason: format!("JSON-Patch from {from:?} must be non-empty and start with '/'"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_round_trips_through_json() {
        let op = JsonPatchOperation::Add {
            path: "/foo".into(),
            value: serde_json::json!(42),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], "add");
        assert_eq!(json["path"], "/foo");
        let back: JsonPatchOperation = serde_json::from_value(json).unwrap();
        assert_eq!(op, back);
    }

    #[test]
    fn remove_has_no_value_field() {
        let op = JsonPatchOperation::Remove {
            path: "/foo".into(),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert!(json.get("value").is_none());
    }

    #[test]
    fn empty_path_fails_validation() {
        let op = JsonPatchOperation::Remove { path: String::new() };
        assert!(op.validate().is_err());
    }

    #[test]
    fn path_without_leading_slash_fails_validation() {
        let op = JsonPatchOperation::Remove { path: "foo".into() };
        assert!(op.validate().is_err());
    }

    #[test]
    fn move_requires_well_formed_from() {
        let op = JsonPatchOperation::Move {
            from: "bad".into(),
            path: "/foo".into(),
        };
        assert!(op.validate().is_err());
    }

    #[test]
    fn all_six_op_kinds_tag_correctly() {
        let ops = vec![
            JsonPatchOperation::Add { path: "/a".into(), value: serde_json::json!(1) },
            JsonPatchOperation::Remove { path: "/a".into() },
            JsonPatchOperation::Replace { path: "/a".into(), value: serde_json::json!(1) },
            JsonPatchOperation::Move { from: "/a".into(), path: "/b".into() },
            JsonPatchOperation::Copy { from: "/a".into(), path: "/b".into() },
            JsonPatchOperation::Test { path: "/a".into(), value: serde_json::json!(1) },
        ];
        let expected = ["add", "remove", "replace", "move", "copy", "test"];
        for (op, tag) in ops.iter().zip(expected) {
            let json = serde_json::to_value(op).unwrap();
            assert_eq!(json["op"], tag);
        }
    }
}
