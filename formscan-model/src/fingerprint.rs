//! Structural fingerprint of a questionnaire's box geometry.
//!
//! A scanned sheet is only matched against a questionnaire whose fingerprint it
//! carries. Only geometry goes in, never texts or labels, so rewording a question
//! keeps the fingerprint while moving a box changes it.

use std::fmt;

use crate::{BoxKind, Questionnaire, ScanBox};

/// MD5 digest over the geometry of every box, in identifier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex form, as printed on sheets and in logs.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Fold `(x, y, width, height)` as big-endian `f32`s, then the checkbox form tag.
fn fold_box(context: &mut md5::Context, scan_box: &ScanBox) {
    for value in [scan_box.x, scan_box.y, scan_box.width, scan_box.height] {
        // Geometry is hashed at single precision.
        context.consume((value as f32).to_be_bytes());
    }
    if let BoxKind::Checkbox { form } = scan_box.kind() {
        context.consume(form.as_bytes());
    }
}

/// Compute the structural fingerprint of `questionnaire`.
pub fn calculate_fingerprint(questionnaire: &Questionnaire) -> Fingerprint {
    let mut context = md5::Context::new();
    for qobject in questionnaire.qobjects() {
        // Heads carry no boxes.
        for scan_box in qobject.boxes() {
            fold_box(&mut context, scan_box);
        }
    }
    Fingerprint(context.compute().0)
}

impl Questionnaire {
    pub fn fingerprint(&self) -> Fingerprint {
        calculate_fingerprint(self)
    }
}
