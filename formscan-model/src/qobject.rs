use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{BoxId, Element, ElementId, ModelError, QObjectId, ScanBox, next_box_value};

/// One visual or logical unit of the form: a section head or a question.
///
/// A QObject gets its identifier when added to a [`Questionnaire`](crate::Questionnaire);
/// its boxes get theirs as they are added after that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QObject {
    id: QObjectId,
    kind: QObjectKind,
    boxes: Vec<ScanBox>,
    #[serde(skip)]
    last_box: Option<u32>,
}

/// The variant of a QObject, carrying its variant-specific attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QObjectKind {
    /// Section break; opens a new `major` identifier.
    Head(HeadInfo),

    /// Plain question without boxes (introductory text and the like).
    Question(QuestionInfo),

    /// Multi-select question.
    Choice(QuestionInfo),

    /// Single-select question. The first box is the "no answer" box.
    SingleChoice(QuestionInfo),

    /// Scale question: one box per step between two labelled ends.
    Mark(MarkInfo),

    /// Free-text question with exactly one textbox.
    Text(QuestionInfo),

    /// Head added after printing (for reports).
    AdditionalHead(HeadInfo),

    /// Scale value entered after scanning, not read from boxes.
    AdditionalMark(MarkInfo),

    /// Histogram computed over filtered answers.
    AdditionalFilterHistogram(FilterHistogramInfo),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadInfo {
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionInfo {
    pub question: String,
    pub page_number: u32,
}

/// A question on a scale; `answers` holds the labels of the two ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkInfo {
    pub question: QuestionInfo,
    pub answers: Vec<String>,
}

/// `answers` and `filters` run in parallel: one filter expression per answer label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterHistogramInfo {
    pub question: QuestionInfo,
    pub answers: Vec<String>,
    pub filters: Vec<String>,
}

impl QObjectKind {
    /// Variant name used in text dumps and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Head(_) => "Head",
            Self::Question(_) => "Question",
            Self::Choice(_) => "Choice",
            Self::SingleChoice(_) => "SingleChoice",
            Self::Mark(_) => "Mark",
            Self::Text(_) => "Text",
            Self::AdditionalHead(_) => "Additional_Head",
            Self::AdditionalMark(_) => "Additional_Mark",
            Self::AdditionalFilterHistogram(_) => "Additional_FilterHistogram",
        }
    }

    /// Heads start a new section and never carry boxes.
    pub fn is_head(&self) -> bool {
        matches!(self, Self::Head(_) | Self::AdditionalHead(_))
    }

    /// Variants whose answer lives in their own data object rather than in boxes.
    pub fn holds_data(&self) -> bool {
        matches!(
            self,
            Self::AdditionalMark(_) | Self::AdditionalFilterHistogram(_)
        )
    }

    /// Common question attributes, for every non-head variant.
    pub fn question_info(&self) -> Option<&QuestionInfo> {
        match self {
            Self::Head(_) | Self::AdditionalHead(_) => None,
            Self::Question(info)
            | Self::Choice(info)
            | Self::SingleChoice(info)
            | Self::Text(info) => Some(info),
            Self::Mark(mark) | Self::AdditionalMark(mark) => Some(&mark.question),
            Self::AdditionalFilterHistogram(histogram) => Some(&histogram.question),
        }
    }

    fn question_info_mut(&mut self) -> Option<&mut QuestionInfo> {
        match self {
            Self::Head(_) | Self::AdditionalHead(_) => None,
            Self::Question(info)
            | Self::Choice(info)
            | Self::SingleChoice(info)
            | Self::Text(info) => Some(info),
            Self::Mark(mark) | Self::AdditionalMark(mark) => Some(&mut mark.question),
            Self::AdditionalFilterHistogram(histogram) => Some(&mut histogram.question),
        }
    }
}

impl QuestionInfo {
    fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            page_number: 0,
        }
    }
}

impl QObject {
    /// Create a new, unattached QObject of the given kind.
    pub fn new(kind: QObjectKind) -> Self {
        Self {
            id: QObjectId::default(),
            kind,
            boxes: Vec::new(),
            last_box: None,
        }
    }

    pub fn head(title: impl Into<String>) -> Self {
        Self::new(QObjectKind::Head(HeadInfo {
            title: title.into(),
        }))
    }

    pub fn additional_head(title: impl Into<String>) -> Self {
        Self::new(QObjectKind::AdditionalHead(HeadInfo {
            title: title.into(),
        }))
    }

    pub fn question(question: impl Into<String>) -> Self {
        Self::new(QObjectKind::Question(QuestionInfo::new(question)))
    }

    pub fn choice(question: impl Into<String>) -> Self {
        Self::new(QObjectKind::Choice(QuestionInfo::new(question)))
    }

    /// The first box added to a single choice is its "no answer" box.
    pub fn single_choice(question: impl Into<String>) -> Self {
        Self::new(QObjectKind::SingleChoice(QuestionInfo::new(question)))
    }

    pub fn text(question: impl Into<String>) -> Self {
        Self::new(QObjectKind::Text(QuestionInfo::new(question)))
    }

    /// A scale question labelled `low` at its first box and `high` at its last.
    pub fn mark(question: impl Into<String>, low: impl Into<String>, high: impl Into<String>) -> Self {
        Self::new(QObjectKind::Mark(MarkInfo {
            question: QuestionInfo::new(question),
            answers: vec![low.into(), high.into()],
        }))
    }

    pub fn additional_mark(
        question: impl Into<String>,
        low: impl Into<String>,
        high: impl Into<String>,
    ) -> Self {
        Self::new(QObjectKind::AdditionalMark(MarkInfo {
            question: QuestionInfo::new(question),
            answers: vec![low.into(), high.into()],
        }))
    }

    pub fn additional_filter_histogram(
        question: impl Into<String>,
        answers: Vec<String>,
        filters: Vec<String>,
    ) -> Self {
        Self::new(QObjectKind::AdditionalFilterHistogram(FilterHistogramInfo {
            question: QuestionInfo::new(question),
            answers,
            filters,
        }))
    }

    /// Set the page number. Heads have no page and ignore it.
    pub fn on_page(mut self, page_number: u32) -> Self {
        if let Some(info) = self.kind.question_info_mut() {
            info.page_number = page_number;
        }
        self
    }

    pub fn id(&self) -> QObjectId {
        self.id
    }

    pub fn kind(&self) -> &QObjectKind {
        &self.kind
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// The boxes of this QObject, in identifier order.
    pub fn boxes(&self) -> &[ScanBox] {
        &self.boxes
    }

    /// Look up a box by its value.
    pub fn scan_box(&self, value: u32) -> Option<&ScanBox> {
        self.boxes.iter().find(|b| b.value() == value)
    }

    /// The page this QObject is printed on (`0` for heads).
    pub fn page_number(&self) -> u32 {
        self.kind.question_info().map_or(0, |info| info.page_number)
    }

    pub(crate) fn into_parts(self) -> (QObjectId, QObjectKind, Vec<ScanBox>) {
        (self.id, self.kind, self.boxes)
    }

    /// Detach all boxes and reset the box cursor.
    pub(crate) fn take_boxes(&mut self) -> Vec<ScanBox> {
        self.last_box = None;
        std::mem::take(&mut self.boxes)
    }

    pub(crate) fn assign_id(&mut self, id: QObjectId) {
        self.id = id;
    }

    /// Append a box, assigning it the next value of this question.
    pub(crate) fn add_box(&mut self, mut scan_box: ScanBox) -> Result<BoxId, ModelError> {
        if self.kind.is_head() {
            return Err(ModelError::HeadWithBoxes(self.id));
        }
        let value = next_box_value(self.last_box);
        let id = self.id.child(value);
        scan_box.assign_id(id);
        self.last_box = Some(value);
        self.boxes.push(scan_box);
        debug!(%id, kind = self.kind.type_name(), "added box");
        Ok(id)
    }

    /// Depth-first search over this QObject and its boxes.
    pub fn find_object(&self, id: ElementId) -> Option<Element<'_>> {
        match id {
            ElementId::QObject(qid) if qid == self.id => Some(Element::QObject(self)),
            ElementId::QObject(_) => None,
            ElementId::Box(bid) => self
                .boxes
                .iter()
                .find(|b| b.id() == bid)
                .map(Element::Box),
        }
    }

    /// Check the variant's structural conventions.
    pub fn validate(&self) -> Result<(), ModelError> {
        match &self.kind {
            QObjectKind::Text(_) if self.boxes.len() != 1 => Err(ModelError::MalformedText {
                id: self.id,
                boxes: self.boxes.len(),
            }),
            QObjectKind::SingleChoice(_) if self.boxes.len() < 2 => {
                Err(ModelError::MissingSentinel {
                    id: self.id,
                    boxes: self.boxes.len(),
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached(mut qobject: QObject, id: QObjectId) -> QObject {
        qobject.assign_id(id);
        qobject
    }

    #[test]
    fn boxes_are_numbered_from_zero() {
        let mut q = attached(QObject::choice("Colours?"), QObjectId::new(1, 1));
        let first = q.add_box(ScanBox::checkbox(10.0, 10.0, 3.5, 3.5)).unwrap();
        let second = q.add_box(ScanBox::checkbox(20.0, 10.0, 3.5, 3.5)).unwrap();

        assert_eq!(first, BoxId::new(1, 1, 0));
        assert_eq!(second, BoxId::new(1, 1, 1));
        assert_eq!(q.boxes()[1].value(), 1);
    }

    #[test]
    fn heads_reject_boxes() {
        let mut head = attached(QObject::head("Teaching"), QObjectId::new(1, 0));
        let result = head.add_box(ScanBox::checkbox(0.0, 0.0, 1.0, 1.0));
        assert!(matches!(result, Err(ModelError::HeadWithBoxes(_))));
    }

    #[test]
    fn text_needs_exactly_one_box() {
        let mut q = attached(QObject::text("Comments"), QObjectId::new(1, 1));
        assert!(matches!(
            q.validate(),
            Err(ModelError::MalformedText { boxes: 0, .. })
        ));

        q.add_box(ScanBox::textbox(10.0, 10.0, 150.0, 40.0)).unwrap();
        assert!(q.validate().is_ok());

        q.add_box(ScanBox::textbox(10.0, 60.0, 150.0, 40.0)).unwrap();
        assert!(q.validate().is_err());
    }

    #[test]
    fn single_choice_needs_sentinel_and_candidate() {
        let mut q = attached(QObject::single_choice("Semester?"), QObjectId::new(1, 1));
        q.add_box(ScanBox::checkbox(10.0, 10.0, 3.5, 3.5)).unwrap();
        assert!(matches!(
            q.validate(),
            Err(ModelError::MissingSentinel { boxes: 1, .. })
        ));

        q.add_box(ScanBox::checkbox(20.0, 10.0, 3.5, 3.5)).unwrap();
        assert!(q.validate().is_ok());
    }

    #[test]
    fn page_number_on_heads_is_ignored() {
        assert_eq!(QObject::head("Intro").on_page(3).page_number(), 0);
        assert_eq!(QObject::question("Intro").on_page(3).page_number(), 3);
    }
}
