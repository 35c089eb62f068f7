//! Identifiers assigned by the document store.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors raised when constructing a [`DocumentId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentIdError {
    /// The identifier was empty once trimmed.
    #[error("document id must not be empty")]
    Empty,
}

/// Opaque identifier of a stored customer, payment, or notification.
///
/// ## Invariants
/// - Never empty and never padded with whitespace.
///
/// # Examples
/// ```
/// use backend::domain::DocumentId;
///
/// let id = DocumentId::new(" k3Xc9ZEBn2 ").expect("valid id");
/// assert_eq!(id.as_str(), "k3Xc9ZEBn2");
/// assert!(DocumentId::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "k3Xc9ZEBn2pLq7vYw1aF")]
pub struct DocumentId(String);

impl DocumentId {
    /// Validate and wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, DocumentIdError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DocumentIdError::Empty);
        }
        if trimmed.len() == raw.len() {
            Ok(Self(raw))
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DocumentIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.0
    }
}
