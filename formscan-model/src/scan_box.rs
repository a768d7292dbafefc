use serde::{Deserialize, Serialize};

use crate::BoxId;

/// The form-factor tag every checkbox gets unless told otherwise.
pub const DEFAULT_CHECKBOX_FORM: &str = "box";

/// One scannable mark region on the page.
///
/// Coordinates and sizes are in survey units (millimetres on the printed page).
/// Boxes are leaves; their identifier is fixed when they are added to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanBox {
    id: BoxId,
    kind: BoxKind,
    pub page_number: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
}

/// The kind of box, determining its answer data and fingerprint contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoxKind {
    /// A tick box. `form` names its printed shape.
    Checkbox { form: String },

    /// A free-text area; its state says whether anything was written in it.
    Textbox,
}

impl BoxKind {
    /// Variant name used in text dumps.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Checkbox { .. } => "Checkbox",
            Self::Textbox => "Textbox",
        }
    }
}

impl ScanBox {
    /// Create a new, unattached box at the given position.
    pub fn new(kind: BoxKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            // Replaced when the box is added to a question.
            id: BoxId::new(0, 0, 0),
            kind,
            page_number: 0,
            x,
            y,
            width,
            height,
            text: String::new(),
        }
    }

    /// Create a checkbox with the default `"box"` form.
    pub fn checkbox(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            BoxKind::Checkbox {
                form: DEFAULT_CHECKBOX_FORM.to_string(),
            },
            x,
            y,
            width,
            height,
        )
    }

    /// Create a textbox.
    pub fn textbox(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(BoxKind::Textbox, x, y, width, height)
    }

    /// Set the label printed next to the box.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the page the box is printed on.
    pub fn on_page(mut self, page_number: u32) -> Self {
        self.page_number = page_number;
        self
    }

    pub fn id(&self) -> BoxId {
        self.id
    }

    /// Value of the box within its question (`0` for the first box).
    pub fn value(&self) -> u32 {
        self.id.value
    }

    pub fn kind(&self) -> &BoxKind {
        &self.kind
    }

    pub fn is_checkbox(&self) -> bool {
        matches!(self.kind, BoxKind::Checkbox { .. })
    }

    pub(crate) fn assign_id(&mut self, id: BoxId) {
        self.id = id;
    }
}
