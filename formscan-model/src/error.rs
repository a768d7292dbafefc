use crate::{BoxId, ElementId, QObjectId};

/// Error type for building and querying a questionnaire.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// An explicit identifier did not come strictly after the last one handed out.
    #[error("Invalid identifier ordering: {id} is not greater than {last}")]
    InvalidIdOrdering { id: QObjectId, last: QObjectId },

    /// A stored box does not carry the identifier its position allocates.
    #[error("Stored box id {stored} does not match allocated id {allocated}")]
    BoxIdMismatch { stored: BoxId, allocated: BoxId },

    /// A Text question must own exactly one box.
    #[error("Malformed structural definition: Text {id} has {boxes} boxes, expected 1")]
    MalformedText { id: QObjectId, boxes: usize },

    /// A SingleChoice needs its "no answer" box plus at least one candidate.
    #[error(
        "Malformed structural definition: SingleChoice {id} has {boxes} boxes, \
         expected the no-answer box and at least one candidate"
    )]
    MissingSentinel { id: QObjectId, boxes: usize },

    /// Heads mark section breaks and cannot hold boxes.
    #[error("Malformed structural definition: {0} is a head and cannot hold boxes")]
    HeadWithBoxes(QObjectId),

    /// The operation is not supported for this element variant.
    #[error("Operation '{operation}' is not supported for {kind}")]
    Unsupported {
        operation: &'static str,
        kind: &'static str,
    },

    /// No element with this identifier exists in the questionnaire.
    #[error("No element with id {0}")]
    NotFound(ElementId),

    /// The stored structure could not be (de)serialized.
    #[error("Persistence error: {0}")]
    Persist(#[from] serde_json::Error),
}

impl ModelError {
    pub(crate) fn unsupported(operation: &'static str, kind: &'static str) -> Self {
        Self::Unsupported { operation, kind }
    }

    /// Check if this error is about the shape of the tree rather than its use.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdOrdering { .. }
                | Self::BoxIdMismatch { .. }
                | Self::MalformedText { .. }
                | Self::MissingSentinel { .. }
                | Self::HeadWithBoxes(_)
        )
    }
}
