//! Core model of a scanned paper questionnaire.
//!
//! This crate provides the structural definition that scanned sheets are matched against:
//! - `Questionnaire`, `QObject` and `ScanBox` - The element tree and its identifiers
//! - `Sheet` and `AnswerData` - Per-sheet answer state, created on first access
//! - `Answer` - Decoded answers per question variant
//! - `Fingerprint` - Digest of the box geometry for detecting template mismatches
//! - `DataChanged` - Notifications about writes to answer data

mod id;
pub use id::{BoxId, ElementId, QObjectId, next_box_value};

mod scan_box;
pub use scan_box::{BoxKind, DEFAULT_CHECKBOX_FORM, ScanBox};

mod qobject;
pub use qobject::{FilterHistogramInfo, HeadInfo, MarkInfo, QObject, QObjectKind, QuestionInfo};

mod element;
pub use element::Element;

mod questionnaire;
pub use questionnaire::Questionnaire;

mod data;
pub use data::{
    AnswerData, AnswerDataHolder, BoxData, DataField, FieldValue, HistogramData, MarkData, Sheet,
};

mod answer;
pub use answer::Answer;

mod notify;
pub use notify::{DataChanged, DataChangedListener, ListenerId};

mod fingerprint;
pub use fingerprint::{Fingerprint, calculate_fingerprint};

mod text;
pub use text::to_text;

mod persist;

mod error;
pub use error::ModelError;
