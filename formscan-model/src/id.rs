use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a QObject: `(major, minor)`.
///
/// `major` counts Heads, `minor` counts questions since the last Head.
/// Ordering is lexicographic, which is the canonical traversal order of a questionnaire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QObjectId {
    pub major: u32,
    pub minor: u32,
}

impl QObjectId {
    /// Create an identifier from its two components.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// The identifier following `self` for a Head: opens a new section.
    pub const fn next_head(self) -> Self {
        Self::new(self.major + 1, 0)
    }

    /// The identifier following `self` for any non-Head QObject.
    pub const fn next_question(self) -> Self {
        Self::new(self.major, self.minor + 1)
    }

    /// Build the identifier of the box with the given value inside this QObject.
    pub const fn child(self, value: u32) -> BoxId {
        BoxId {
            qobject: self,
            value,
        }
    }

    /// Dotted form, e.g. `1.2`.
    pub fn id_str(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    /// Underscore form used for CSV column names, e.g. `1_2`.
    pub fn id_csv(&self) -> String {
        format!("{}_{}", self.major, self.minor)
    }

    /// Form used in filter expressions, e.g. `_1_2`.
    pub fn id_filter(&self) -> String {
        format!("_{}", self.id_csv())
    }
}

impl fmt::Display for QObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl From<(u32, u32)> for QObjectId {
    fn from((major, minor): (u32, u32)) -> Self {
        Self::new(major, minor)
    }
}

/// Identifier of a box: its question's identifier followed by the box value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoxId {
    pub qobject: QObjectId,
    pub value: u32,
}

impl BoxId {
    pub const fn new(major: u32, minor: u32, value: u32) -> Self {
        QObjectId::new(major, minor).child(value)
    }

    /// Dotted form, e.g. `1.2.0`.
    pub fn id_str(&self) -> String {
        format!("{}.{}", self.qobject.id_str(), self.value)
    }

    pub fn id_csv(&self) -> String {
        format!("{}_{}", self.qobject.id_csv(), self.value)
    }

    pub fn id_filter(&self) -> String {
        format!("_{}", self.id_csv())
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.qobject, self.value)
    }
}

impl From<(u32, u32, u32)> for BoxId {
    fn from((major, minor, value): (u32, u32, u32)) -> Self {
        Self::new(major, minor, value)
    }
}

/// The value the next box of a question gets, given the last one handed out.
///
/// A question starts with no boxes, so its first box has value `0`.
pub fn next_box_value(last: Option<u32>) -> u32 {
    last.map_or(0, |value| value + 1)
}

/// Identifier of any element in the tree.
///
/// Compares like the underlying tuples: `(1, 2) < (1, 2, 0) < (1, 2, 1) < (1, 3)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementId {
    QObject(QObjectId),
    Box(BoxId),
}

impl ElementId {
    /// The QObject this element is or belongs to.
    pub fn qobject(&self) -> QObjectId {
        match self {
            Self::QObject(id) => *id,
            Self::Box(id) => id.qobject,
        }
    }

    fn box_value(&self) -> Option<u32> {
        match self {
            Self::QObject(_) => None,
            Self::Box(id) => Some(id.value),
        }
    }

    pub fn id_str(&self) -> String {
        match self {
            Self::QObject(id) => id.id_str(),
            Self::Box(id) => id.id_str(),
        }
    }
}

impl Ord for ElementId {
    fn cmp(&self, other: &Self) -> Ordering {
        // `None < Some(_)` gives the tuple prefix rule.
        self.qobject()
            .cmp(&other.qobject())
            .then_with(|| self.box_value().cmp(&other.box_value()))
    }
}

impl PartialOrd for ElementId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QObject(id) => id.fmt(f),
            Self::Box(id) => id.fmt(f),
        }
    }
}

impl From<QObjectId> for ElementId {
    fn from(id: QObjectId) -> Self {
        Self::QObject(id)
    }
}

impl From<BoxId> for ElementId {
    fn from(id: BoxId) -> Self {
        Self::Box(id)
    }
}

impl From<(u32, u32)> for ElementId {
    fn from(id: (u32, u32)) -> Self {
        Self::QObject(id.into())
    }
}

impl From<(u32, u32, u32)> for ElementId {
    fn from(id: (u32, u32, u32)) -> Self {
        Self::Box(id.into())
    }
}
