//! Scanned paper questionnaires.
//!
//! The object model lives in `formscan-model` and is re-exported here. On top of it,
//! [`scan`] runs batch identification of scanned pages, with the image and barcode
//! work delegated to [`scan::PageSource`] and [`scan::PageRecognizer`] implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use formscan::{QObject, Questionnaire, ScanBox, Sheet};
//!
//! let mut questionnaire = Questionnaire::new();
//! questionnaire.add_qobject(QObject::head("Lecture"), None)?;
//! let pace = questionnaire.add_qobject(QObject::mark("Pace", "slow", "fast"), None)?;
//! for i in 0..5 {
//!     questionnaire.add_box(pace, ScanBox::checkbox(100.0 + 10.0 * i as f64, 40.0, 3.5, 3.5))?;
//! }
//!
//! let mut sheet = Sheet::new();
//! questionnaire.set_answer(&mut sheet, pace, 4)?;
//! assert_eq!(questionnaire.get_answer(&sheet, pace)?, formscan::Answer::Mark(4));
//! ```

// Re-export the object model
pub use formscan_model::*;

pub mod scan;
pub use scan::{
    GlobalIdScan, PageImage, PageRecognizer, PageResult, PageSource, RecognitionError,
    ScanConfig, ScanError, Transform, find_global_ids,
};

mod test_scanner;
pub use test_scanner::TestScanner;
