use tracing::debug;

use crate::notify::Listeners;
use crate::{
    AnswerData, BoxId, DataChanged, DataField, Element, ElementId, FieldValue, ListenerId,
    ModelError, QObject, QObjectId, ScanBox, Sheet,
};

/// Root of the structural definition of one survey form.
///
/// Built once by appending QObjects and their boxes; identifiers are handed out as
/// elements are appended and never change afterwards. Once definition is done the
/// tree is only read, so it can be shared by any number of [`Sheet`]s.
#[derive(Debug, Default)]
pub struct Questionnaire {
    survey: Option<String>,
    qobjects: Vec<QObject>,
    last_id: QObjectId,
    page_count: u32,
    listeners: Listeners,
}

impl Questionnaire {
    /// Create an empty questionnaire. The identifier cursor starts at `(0, 0)`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title of the survey this questionnaire belongs to.
    pub fn with_survey(mut self, survey: impl Into<String>) -> Self {
        self.survey = Some(survey.into());
        self
    }

    pub fn survey(&self) -> Option<&str> {
        self.survey.as_deref()
    }

    /// Highest page number any element is printed on.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn set_page_count(&mut self, page_count: u32) {
        self.page_count = page_count;
    }

    /// The identifier handed out last.
    pub fn last_id(&self) -> QObjectId {
        self.last_id
    }

    /// All QObjects, in identifier order.
    pub fn qobjects(&self) -> &[QObject] {
        &self.qobjects
    }

    /// All boxes of all QObjects, in identifier order.
    pub fn boxes(&self) -> impl Iterator<Item = &ScanBox> {
        self.qobjects.iter().flat_map(|qobject| qobject.boxes())
    }

    /// Append a QObject.
    ///
    /// Without `explicit_id` the next identifier is allocated from the cursor: Heads
    /// open a new major number, everything else takes the next minor number. An
    /// explicit id (used when restoring a stored structure) must be strictly greater
    /// than the cursor.
    ///
    /// Boxes the QObject already carries (e.g. when it was cloned from another
    /// questionnaire) are renumbered under the new identifier, in their current order.
    pub fn add_qobject(
        &mut self,
        mut qobject: QObject,
        explicit_id: Option<QObjectId>,
    ) -> Result<QObjectId, ModelError> {
        let id = match explicit_id {
            Some(id) if id <= self.last_id => {
                return Err(ModelError::InvalidIdOrdering {
                    id,
                    last: self.last_id,
                });
            }
            Some(id) => id,
            None if qobject.kind().is_head() => self.last_id.next_head(),
            None => self.last_id.next_question(),
        };

        let boxes = qobject.take_boxes();
        if qobject.kind().is_head() && !boxes.is_empty() {
            return Err(ModelError::HeadWithBoxes(id));
        }
        qobject.assign_id(id);
        for scan_box in boxes {
            qobject.add_box(scan_box)?;
        }

        let box_pages = qobject.boxes().iter().map(|b| b.page_number).max();
        self.last_id = id;
        self.page_count = self
            .page_count
            .max(qobject.page_number())
            .max(box_pages.unwrap_or(0));
        debug!(%id, kind = qobject.type_name(), "added qobject");
        self.qobjects.push(qobject);
        Ok(id)
    }

    /// Append a box to the QObject `question`, allocating its value.
    pub fn add_box(&mut self, question: QObjectId, scan_box: ScanBox) -> Result<BoxId, ModelError> {
        let index = self
            .index_of(question)
            .ok_or(ModelError::NotFound(question.into()))?;
        let page_number = scan_box.page_number;
        let id = self.qobjects[index].add_box(scan_box)?;
        self.page_count = self.page_count.max(page_number);
        Ok(id)
    }

    fn index_of(&self, id: QObjectId) -> Option<usize> {
        // Identifiers are strictly increasing, so the sequence is sorted.
        self.qobjects
            .binary_search_by_key(&id, |qobject| qobject.id())
            .ok()
    }

    pub fn qobject(&self, id: QObjectId) -> Option<&QObject> {
        self.index_of(id).map(|index| &self.qobjects[index])
    }

    pub fn scan_box(&self, id: BoxId) -> Option<&ScanBox> {
        self.parent(id)?.boxes().iter().find(|b| b.id() == id)
    }

    /// The QObject a box belongs to.
    pub fn parent(&self, id: BoxId) -> Option<&QObject> {
        self.qobject(id.qobject)
    }

    /// Depth-first search for an element by identifier.
    ///
    /// QObjects are visited in order, each followed by its boxes; the first match wins.
    pub fn find_object(&self, id: impl Into<ElementId>) -> Option<Element<'_>> {
        let id = id.into();
        self.qobjects
            .iter()
            .find_map(|qobject| qobject.find_object(id))
    }

    /// Check every QObject's structural conventions.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.qobjects.iter().try_for_each(QObject::validate)
    }

    /// Register a listener for answer data changes on any sheet of this questionnaire.
    ///
    /// Listeners run synchronously, in registration order. They must not modify
    /// the questionnaire.
    pub fn connect_data_changed<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&DataChanged<'_>) + Send + Sync + 'static,
    {
        self.listeners.connect(Box::new(listener))
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn disconnect_data_changed(&mut self, id: ListenerId) -> bool {
        self.listeners.disconnect(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Drop all listeners, as after restoring the questionnaire from storage.
    pub fn reinit_state(&mut self) {
        self.listeners.clear();
    }

    /// Tell every listener that `field` of `data` changed from `old_value`.
    pub fn notify_data_changed(
        &self,
        element: Element<'_>,
        data: &AnswerData,
        field: DataField,
        old_value: FieldValue,
    ) {
        let change = DataChanged {
            questionnaire: self,
            element,
            data,
            field,
            old_value,
        };
        self.listeners.notify(&change);
    }

    /// Write one field of an element's answer data on `sheet` and notify listeners.
    ///
    /// Returns the previous value of the field.
    pub fn write_data(
        &self,
        sheet: &mut Sheet,
        id: impl Into<ElementId>,
        value: FieldValue,
    ) -> Result<FieldValue, ModelError> {
        let id = id.into();
        let element = self.find_object(id).ok_or(ModelError::NotFound(id))?;
        let field = value.field();
        let data = sheet.data_mut(&element)?;
        let old_value = data.replace(value)?;
        debug!(%id, %field, "answer data changed");
        self.notify_data_changed(element, data, field, old_value.clone());
        Ok(old_value)
    }

    /// Store the recognized state of a box.
    pub fn set_box_state(&self, sheet: &mut Sheet, id: BoxId, state: bool) -> Result<(), ModelError> {
        self.write_data(sheet, id, FieldValue::State(state)).map(drop)
    }

    /// Store the recognizer's confidence for a box.
    pub fn set_box_quality(
        &self,
        sheet: &mut Sheet,
        id: BoxId,
        quality: f64,
    ) -> Result<(), ModelError> {
        self.write_data(sheet, id, FieldValue::Quality(quality))
            .map(drop)
    }
}
