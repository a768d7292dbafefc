//! Scripted scanner for running batch scans without image files.
//!
//! `TestScanner` plays both collaborators of a scan: it knows how many pages each
//! file has and which global id each page carries, and it can mark files as
//! non-monochrome or pages as rotated.
//!
//! # Example
//!
//! ```rust,ignore
//! use formscan::{ScanConfig, TestScanner, find_global_ids};
//!
//! let scanner = TestScanner::new()
//!     .with_pages("a.tif", [Some("0001"), None])
//!     .with_invalid("photo.tif");
//!
//! let mut out = Vec::new();
//! let results = find_global_ids(
//!     &["a.tif".into(), "photo.tif".into()],
//!     &scanner,
//!     &scanner,
//!     &ScanConfig::default(),
//!     &mut out,
//! )?;
//! assert_eq!(results.len(), 2);
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::scan::{
    PageImage, PageRecognizer, PageSource, RecognitionError, ScanConfig, ScanError, Transform,
};

/// A page source and recognizer that returns pre-configured results.
#[derive(Debug, Clone, Default)]
pub struct TestScanner {
    files: HashMap<PathBuf, Vec<Option<String>>>,
    invalid: HashSet<PathBuf>,
    rotated: HashSet<(PathBuf, usize)>,
    corrected: RefCell<Vec<(PathBuf, usize)>>,
}

impl TestScanner {
    /// Create a scanner that knows no files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file whose pages carry the given global ids (`None` for an unreadable code).
    pub fn with_pages<I, S>(mut self, path: impl Into<PathBuf>, global_ids: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let pages = global_ids
            .into_iter()
            .map(|id| id.map(Into::into))
            .collect();
        self.files.insert(path.into(), pages);
        self
    }

    /// Add a file that exists but is not a monochrome image.
    pub fn with_invalid(mut self, path: impl Into<PathBuf>) -> Self {
        self.invalid.insert(path.into());
        self
    }

    /// Mark a page as scanned upside down. Its id is only found after a matrix correction.
    pub fn with_rotated(mut self, path: impl Into<PathBuf>, page: usize) -> Self {
        self.rotated.insert((path.into(), page));
        self
    }

    /// Pages for which a transform was calculated, in processing order.
    pub fn corrected_pages(&self) -> Vec<(PathBuf, usize)> {
        self.corrected.borrow().clone()
    }

    fn pages(&self, path: &Path) -> Result<&[Option<String>], ScanError> {
        self.files.get(path).map(Vec::as_slice).ok_or_else(|| {
            ScanError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            ))
        })
    }

    fn is_rotated_page(&self, page: &PageImage) -> bool {
        self.rotated.contains(&(page.source.clone(), page.page))
    }
}

impl PageSource for TestScanner {
    fn check_monochrome(&self, path: &Path) -> Result<(), ScanError> {
        if self.invalid.contains(path) {
            return Err(ScanError::invalid(path, "not a bilevel image"));
        }
        self.pages(path).map(|_| ())
    }

    fn page_count(&self, path: &Path) -> Result<usize, ScanError> {
        Ok(self.pages(path)?.len())
    }

    fn load_page(&self, path: &Path, page: usize) -> Result<PageImage, ScanError> {
        if page >= self.pages(path)?.len() {
            return Err(ScanError::Decode {
                path: path.to_path_buf(),
                page,
                message: "page out of range".to_string(),
            });
        }
        Ok(PageImage {
            source: path.to_path_buf(),
            page,
            width: 8,
            height: 1,
            pixels: vec![0],
        })
    }
}

impl PageRecognizer for TestScanner {
    fn is_rotated(&self, page: &PageImage, _config: &ScanConfig) -> bool {
        self.is_rotated_page(page)
    }

    fn calculate_matrix(
        &self,
        page: &PageImage,
        config: &ScanConfig,
    ) -> Result<Transform, RecognitionError> {
        self.corrected
            .borrow_mut()
            .push((page.source.clone(), page.page));
        Ok(Transform([
            -1.0,
            0.0,
            0.0,
            -1.0,
            config.paper_width,
            config.paper_height,
        ]))
    }

    fn calculate_global_id(
        &self,
        page: &PageImage,
        transform: &Transform,
        _config: &ScanConfig,
    ) -> Result<String, RecognitionError> {
        if self.is_rotated_page(page) && *transform == Transform::IDENTITY {
            return Err(RecognitionError::Matrix("page is upside down".to_string()));
        }
        self.files
            .get(&page.source)
            .and_then(|pages| pages.get(page.page))
            .cloned()
            .flatten()
            .ok_or(RecognitionError::GlobalIdNotFound)
    }
}
