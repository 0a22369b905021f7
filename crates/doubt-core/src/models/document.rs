//! Uploaded document representation.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identity of one uploaded file.
///
/// Ids grow monotonically within a session; each upload gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Raw document bytes plus their declared media type.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Identity of the upload these bytes came from.
    pub id: DocumentId,
    /// Original file name, for display.
    pub name: String,
    /// Declared media type (e.g. `application/pdf`).
    pub media_type: String,
    /// Document bytes; shared read-only between analyses.
    pub bytes: Arc<[u8]>,
}

impl RawDocument {
    /// Create a new raw document.
    pub fn new(
        id: DocumentId,
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Size of the document in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document has no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
