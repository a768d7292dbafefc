use crate::{
    AnswerData, BoxData, FieldValue, ModelError, QObject, QObjectId, QObjectKind, Questionnaire,
    ScanBox, Sheet,
};

/// The answer a sheet gives to one question, decoded from its answer data.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Choice: values of every marked box, in box order.
    Choices(Vec<u32>),

    /// SingleChoice: value of the chosen box, or [`Answer::NO_CHOICE`].
    Choice(i64),

    /// Mark: position on the scale starting at 1, or [`Answer::INVALID_MARK`].
    Mark(u32),

    /// Text: whether anything was written in the box.
    Text(bool),

    /// Additional_Mark: the stored value.
    Value(i64),

    /// Additional_FilterHistogram: the stored bins.
    Histogram(Vec<f64>),
}

impl Answer {
    /// A single choice with no candidate marked.
    pub const NO_CHOICE: i64 = -1;

    /// A mark with no box or several boxes marked.
    pub const INVALID_MARK: u32 = 0;

    /// Check if the sheet actually answered the question.
    pub fn is_answered(&self) -> bool {
        match self {
            Self::Choices(values) => !values.is_empty(),
            Self::Choice(value) => *value != Self::NO_CHOICE,
            Self::Mark(mark) => *mark != Self::INVALID_MARK,
            Self::Text(written) => *written,
            Self::Value(_) | Self::Histogram(_) => true,
        }
    }
}

impl QObject {
    /// Decode this question's answer on `sheet`.
    ///
    /// Ambiguous marks are not errors; they decode to the sentinel values of [`Answer`].
    pub fn get_answer(&self, sheet: &Sheet) -> Result<Answer, ModelError> {
        match self.kind() {
            QObjectKind::Choice(_) => Ok(Answer::Choices(marked_values(self.boxes(), sheet))),
            QObjectKind::SingleChoice(_) => Ok(Answer::Choice(best_choice(self, sheet))),
            QObjectKind::Mark(_) => {
                let marked = marked_values(self.boxes(), sheet);
                let mark = match marked.as_slice() {
                    [value] => value + 1,
                    _ => Answer::INVALID_MARK,
                };
                Ok(Answer::Mark(mark))
            }
            QObjectKind::Text(_) => match self.boxes() {
                [scan_box] => Ok(Answer::Text(sheet.box_data(scan_box).state)),
                boxes => Err(ModelError::MalformedText {
                    id: self.id(),
                    boxes: boxes.len(),
                }),
            },
            QObjectKind::AdditionalMark(_) => {
                let value = sheet
                    .peek(self.id())
                    .and_then(AnswerData::as_mark)
                    .map_or(0, |data| data.value);
                Ok(Answer::Value(value))
            }
            QObjectKind::AdditionalFilterHistogram(_) => {
                let value = sheet
                    .peek(self.id())
                    .and_then(AnswerData::as_histogram)
                    .map(|data| data.value.clone())
                    .unwrap_or_default();
                Ok(Answer::Histogram(value))
            }
            QObjectKind::Head(_) | QObjectKind::AdditionalHead(_) | QObjectKind::Question(_) => {
                Err(ModelError::unsupported("get_answer", self.type_name()))
            }
        }
    }
}

fn marked_values(boxes: &[ScanBox], sheet: &Sheet) -> Vec<u32> {
    boxes
        .iter()
        .filter(|scan_box| sheet.box_data(scan_box).state)
        .map(ScanBox::value)
        .collect()
}

/// Highest-quality marked box after the "no answer" box; earlier boxes win ties.
fn best_choice(question: &QObject, sheet: &Sheet) -> i64 {
    let mut best: Option<(&ScanBox, BoxData)> = None;
    for scan_box in question.boxes().iter().skip(1) {
        let data = sheet.box_data(scan_box);
        if !data.state {
            continue;
        }
        match &best {
            Some((_, current)) if data.quality <= current.quality => {}
            _ => best = Some((scan_box, data)),
        }
    }
    best.map_or(Answer::NO_CHOICE, |(scan_box, _)| i64::from(scan_box.value()))
}

impl Questionnaire {
    /// Decode the answer of the question `id` on `sheet`.
    pub fn get_answer(&self, sheet: &Sheet, id: QObjectId) -> Result<Answer, ModelError> {
        self.qobject(id)
            .ok_or(ModelError::NotFound(id.into()))?
            .get_answer(sheet)
    }

    /// Store an answer for the question `id` on `sheet`, notifying listeners.
    ///
    /// For a Mark this marks exactly the box with value `answer - 1`; for an
    /// Additional_Mark it stores `answer` as the value. Other variants cannot be set.
    pub fn set_answer(&self, sheet: &mut Sheet, id: QObjectId, answer: i64) -> Result<(), ModelError> {
        let question = self.qobject(id).ok_or(ModelError::NotFound(id.into()))?;
        match question.kind() {
            QObjectKind::Mark(_) => {
                // Answers off the scale mark no box.
                let target = answer.checked_sub(1);
                for scan_box in question.boxes() {
                    let state = Some(i64::from(scan_box.value())) == target;
                    self.set_box_state(sheet, scan_box.id(), state)?;
                }
                Ok(())
            }
            QObjectKind::AdditionalMark(_) => self
                .write_data(sheet, id, FieldValue::Value(answer))
                .map(drop),
            _ => Err(ModelError::unsupported("set_answer", question.type_name())),
        }
    }
}
