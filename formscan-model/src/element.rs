use crate::{ElementId, QObject, ScanBox};

/// A borrowed element of the questionnaire tree, as returned by lookups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element<'a> {
    QObject(&'a QObject),
    Box(&'a ScanBox),
}

impl<'a> Element<'a> {
    pub fn id(&self) -> ElementId {
        match self {
            Self::QObject(qobject) => qobject.id().into(),
            Self::Box(scan_box) => scan_box.id().into(),
        }
    }

    /// Variant name used in text dumps and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::QObject(qobject) => qobject.type_name(),
            Self::Box(scan_box) => scan_box.kind().type_name(),
        }
    }

    pub fn as_qobject(&self) -> Option<&'a QObject> {
        match self {
            Self::QObject(qobject) => Some(qobject),
            Self::Box(_) => None,
        }
    }

    pub fn as_box(&self) -> Option<&'a ScanBox> {
        match self {
            Self::QObject(_) => None,
            Self::Box(scan_box) => Some(scan_box),
        }
    }
}
