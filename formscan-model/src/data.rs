use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use tracing::debug;

use crate::{Element, ElementId, ModelError, QObject, QObjectKind, ScanBox};

/// Recognition result of one box on one sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxData {
    /// Whether the box is considered marked (or, for textboxes, written in).
    pub state: bool,

    /// Confidence of the recognizer in `state`; higher is better.
    pub quality: f64,
}

/// Value of an Additional_Mark on one sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkData {
    pub value: i64,
}

/// Bins of an Additional_FilterHistogram on one sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramData {
    pub value: Vec<f64>,
}

/// Per-sheet mutable state of one element.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerData {
    Box(BoxData),
    Mark(MarkData),
    Histogram(HistogramData),
}

/// Name of a tracked field of an [`AnswerData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataField {
    State,
    Quality,
    Value,
}

impl DataField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Quality => "quality",
            Self::Value => "value",
        }
    }
}

impl fmt::Display for DataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value of a tracked field, used both for writes and for reporting old values.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    State(bool),
    Quality(f64),
    Value(i64),
    Histogram(Vec<f64>),
}

impl FieldValue {
    pub fn field(&self) -> DataField {
        match self {
            Self::State(_) => DataField::State,
            Self::Quality(_) => DataField::Quality,
            Self::Value(_) | Self::Histogram(_) => DataField::Value,
        }
    }
}

impl AnswerData {
    /// Variant name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Box(_) => "box data",
            Self::Mark(_) => "mark data",
            Self::Histogram(_) => "histogram data",
        }
    }

    pub fn as_box(&self) -> Option<&BoxData> {
        match self {
            Self::Box(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_mark(&self) -> Option<&MarkData> {
        match self {
            Self::Mark(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_histogram(&self) -> Option<&HistogramData> {
        match self {
            Self::Histogram(data) => Some(data),
            _ => None,
        }
    }

    /// Current value of a field, if this data has it.
    pub fn get(&self, field: DataField) -> Option<FieldValue> {
        match (self, field) {
            (Self::Box(data), DataField::State) => Some(FieldValue::State(data.state)),
            (Self::Box(data), DataField::Quality) => Some(FieldValue::Quality(data.quality)),
            (Self::Mark(data), DataField::Value) => Some(FieldValue::Value(data.value)),
            (Self::Histogram(data), DataField::Value) => {
                Some(FieldValue::Histogram(data.value.clone()))
            }
            _ => None,
        }
    }

    /// Store `value` in its field and hand back what was there before.
    pub(crate) fn replace(&mut self, value: FieldValue) -> Result<FieldValue, ModelError> {
        let old = match (self, value) {
            (Self::Box(data), FieldValue::State(state)) => {
                FieldValue::State(std::mem::replace(&mut data.state, state))
            }
            (Self::Box(data), FieldValue::Quality(quality)) => {
                FieldValue::Quality(std::mem::replace(&mut data.quality, quality))
            }
            (Self::Mark(data), FieldValue::Value(value)) => {
                FieldValue::Value(std::mem::replace(&mut data.value, value))
            }
            (Self::Histogram(data), FieldValue::Histogram(value)) => {
                FieldValue::Histogram(std::mem::replace(&mut data.value, value))
            }
            (data, value) => {
                return Err(ModelError::unsupported(
                    setter_name(value.field()),
                    data.type_name(),
                ));
            }
        };
        Ok(old)
    }
}

fn setter_name(field: DataField) -> &'static str {
    match field {
        DataField::State => "set_state",
        DataField::Quality => "set_quality",
        DataField::Value => "set_value",
    }
}

/// Capability of structural elements that own per-sheet answer data.
///
/// Implemented by boxes and by the QObject variants whose answer is not read from boxes.
pub trait AnswerDataHolder {
    /// Key of the data in a sheet's store.
    fn data_id(&self) -> ElementId;

    /// Variant name used when the element has no data.
    fn holder_name(&self) -> &'static str;

    /// Fresh data for a sheet that has not touched this element yet,
    /// or `None` if the variant owns no data.
    fn new_data(&self) -> Option<AnswerData>;
}

impl AnswerDataHolder for ScanBox {
    fn data_id(&self) -> ElementId {
        self.id().into()
    }

    fn holder_name(&self) -> &'static str {
        self.kind().type_name()
    }

    fn new_data(&self) -> Option<AnswerData> {
        Some(AnswerData::Box(BoxData::default()))
    }
}

impl AnswerDataHolder for QObject {
    fn data_id(&self) -> ElementId {
        self.id().into()
    }

    fn holder_name(&self) -> &'static str {
        self.type_name()
    }

    fn new_data(&self) -> Option<AnswerData> {
        match self.kind() {
            QObjectKind::AdditionalMark(_) => Some(AnswerData::Mark(MarkData::default())),
            QObjectKind::AdditionalFilterHistogram(_) => {
                Some(AnswerData::Histogram(HistogramData::default()))
            }
            _ => None,
        }
    }
}

impl AnswerDataHolder for Element<'_> {
    fn data_id(&self) -> ElementId {
        self.id()
    }

    fn holder_name(&self) -> &'static str {
        self.type_name()
    }

    fn new_data(&self) -> Option<AnswerData> {
        match self {
            Self::QObject(qobject) => qobject.new_data(),
            Self::Box(scan_box) => scan_box.new_data(),
        }
    }
}

/// One scanned instance of a questionnaire, owning all of its answer data.
///
/// Data objects are created the first time an element is accessed through
/// [`Sheet::get_data`] and live as long as the sheet. The structural tree never
/// stores answers, so many sheets can be evaluated against one questionnaire.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    data: HashMap<ElementId, AnswerData>,
}

impl Sheet {
    /// Create a sheet with no answer data yet.
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// The data of `holder` on this sheet, created on first access.
    ///
    /// Read-only: writes go through [`Questionnaire::write_data`](crate::Questionnaire::write_data)
    /// so that listeners see every change.
    pub fn get_data<H>(&mut self, holder: &H) -> Result<&AnswerData, ModelError>
    where
        H: AnswerDataHolder + ?Sized,
    {
        self.data_mut(holder).map(|data| &*data)
    }

    pub(crate) fn data_mut<H>(&mut self, holder: &H) -> Result<&mut AnswerData, ModelError>
    where
        H: AnswerDataHolder + ?Sized,
    {
        match self.data.entry(holder.data_id()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let data = holder
                    .new_data()
                    .ok_or_else(|| ModelError::unsupported("get_data", holder.holder_name()))?;
                debug!(id = %entry.key(), kind = holder.holder_name(), "created answer data");
                Ok(entry.insert(data))
            }
        }
    }

    /// The data stored for `id`, without creating it.
    pub fn peek(&self, id: impl Into<ElementId>) -> Option<&AnswerData> {
        self.data.get(&id.into())
    }

    /// The recognition result of a box, or the defaults if it was never touched.
    pub fn box_data(&self, scan_box: &ScanBox) -> BoxData {
        self.peek(scan_box.id())
            .and_then(AnswerData::as_box)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of elements that have data on this sheet.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
