use std::path::PathBuf;

use thiserror::Error;

use crate::core::tree::TreeError;

/// Errors from building dependency trees and ordering units.
///
/// Every variant is terminal for the call that produced it: no partial tree
/// or partial ordering is ever returned alongside one.
#[derive(Debug, Error)]
pub enum DepError {
    /// The file could not be found or read. The message is the capability's own, verbatim.
    #[error("{message}")]
    Access { path: PathBuf, message: String },

    #[error("max depth of {max_depth} exceeded")]
    MaxDepthExceeded { max_depth: usize },

    #[error("found circular dependency for {path} with root node of {root}")]
    CircularDependency { path: String, root: String },

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("invalid unit '{label}': {reason}")]
    InvalidUnit { label: String, reason: String },
}

impl DepError {
    pub fn access(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DepError::Access {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_unit(label: impl Into<String>, reason: impl Into<String>) -> Self {
        DepError::InvalidUnit {
            label: label.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_message_is_verbatim() {
        let err = DepError::access("/x/a.js", "ENOENT: no such file or directory, access '/x/a.js'");
        assert_eq!(
            err.to_string(),
            "ENOENT: no such file or directory, access '/x/a.js'"
        );
    }

    #[test]
    fn test_circular_message() {
        let err = DepError::CircularDependency {
            path: "/p/a.js".to_string(),
            root: "/p/a.js".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "found circular dependency for /p/a.js with root node of /p/a.js"
        );
    }

    #[test]
    fn test_tree_error_is_transparent() {
        let err: DepError = TreeError::AlreadyParented {
            key: "t1".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "node 't1' already has a parent");
    }
}
