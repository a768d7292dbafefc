use std::fmt;

use crate::{AnswerData, DataField, Element, FieldValue, Questionnaire};

/// Everything a listener learns about one write to answer data.
///
/// `element` is the owner of the data: a box for recognition results,
/// the QObject itself for Additional_Mark and Additional_FilterHistogram.
#[derive(Debug)]
pub struct DataChanged<'a> {
    pub questionnaire: &'a Questionnaire,
    pub element: Element<'a>,
    pub data: &'a AnswerData,
    pub field: DataField,
    pub old_value: FieldValue,
}

/// Callback registered with [`Questionnaire::connect_data_changed`].
pub type DataChangedListener = Box<dyn Fn(&DataChanged<'_>) + Send + Sync>;

/// Handle returned on registration, used to disconnect the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registry of data-changed listeners, called in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, DataChangedListener)>,
}

impl Listeners {
    pub(crate) fn connect(&mut self, listener: DataChangedListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn disconnect(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn notify(&self, change: &DataChanged<'_>) {
        for (_, listener) in &self.entries {
            listener(change);
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
