//! Batch identification of scanned pages by their global id.
//!
//! Image decoding and barcode reading are provided by collaborators behind the
//! [`PageSource`] and [`PageRecognizer`] traits. This module drives them over a
//! list of files, one result line per page, and keeps going when a file or a
//! page cannot be handled.

use std::fmt;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

/// Survey defaults the global-id step needs to locate the code on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Barcode style printed on the sheets.
    pub style: String,

    /// Paper width in millimetres.
    pub paper_width: f64,

    /// Paper height in millimetres.
    pub paper_height: f64,

    /// Directory that reported image paths are relative to.
    pub survey_dir: PathBuf,
}

impl ScanConfig {
    pub fn new() -> Self {
        Self {
            style: "code128".to_string(),
            paper_width: 210.0,
            paper_height: 297.0,
            survey_dir: PathBuf::from("."),
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_paper_size(mut self, width: f64, height: f64) -> Self {
        self.paper_width = width;
        self.paper_height = height;
        self
    }

    pub fn with_survey_dir(mut self, survey_dir: impl Into<PathBuf>) -> Self {
        self.survey_dir = survey_dir.into();
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// One decoded page of a scanned file.
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    /// The file the page was read from, as passed to the scan.
    pub source: PathBuf,

    /// Zero-based index of the page within the file.
    pub page: usize,

    pub width: u32,
    pub height: u32,

    /// Packed 1-bit rows, most significant bit first.
    pub pixels: Vec<u8>,
}

/// Affine transform from survey coordinates to image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(pub [f64; 6]);

impl Transform {
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// Map a survey-coordinate point.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }
}

/// Error type for reading scanned files.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a monochrome raster the recognizer can work on.
    #[error("Invalid input file {path}: {reason}")]
    InvalidImage { path: PathBuf, reason: String },

    #[error("Cannot decode page {page} of {path}: {message}")]
    Decode {
        path: PathBuf,
        page: usize,
        message: String,
    },
}

impl ScanError {
    pub fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if the file was readable but is not a monochrome image.
    pub fn is_invalid_image(&self) -> bool {
        matches!(self, Self::InvalidImage { .. })
    }
}

/// Error type for recognizing things on a page.
#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("No global id found on page")]
    GlobalIdNotFound,

    #[error("Could not determine page position: {0}")]
    Matrix(String),

    #[error("Recognition failed: {0}")]
    Other(String),
}

/// Access to multi-page monochrome scans.
pub trait PageSource {
    /// Check that `path` holds a monochrome image the recognizer can read.
    fn check_monochrome(&self, path: &Path) -> Result<(), ScanError>;

    /// Number of pages in `path`.
    fn page_count(&self, path: &Path) -> Result<usize, ScanError>;

    /// Decode one page.
    fn load_page(&self, path: &Path, page: usize) -> Result<PageImage, ScanError>;
}

/// Recognition of page position and global id.
pub trait PageRecognizer {
    /// Whether the page was scanned upside down and needs a transform first.
    fn is_rotated(&self, _page: &PageImage, _config: &ScanConfig) -> bool {
        false
    }

    /// Locate the page's corner marks and compute the transform.
    fn calculate_matrix(
        &self,
        page: &PageImage,
        config: &ScanConfig,
    ) -> Result<Transform, RecognitionError>;

    /// Decode the global id printed on the page.
    fn calculate_global_id(
        &self,
        page: &PageImage,
        transform: &Transform,
        config: &ScanConfig,
    ) -> Result<String, RecognitionError>;
}

/// The outcome for one page. `global_id` stays unset when recognition failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub file: String,
    pub page: usize,
    pub global_id: Option<String>,
}

/// Renders `* ("file", page, Some("id"))` or `* ("file", page, None)`.
///
/// This is Rust's `Debug` notation for the tuple, not a Python `repr`: readers that
/// `eval` each line as a Python tuple cannot parse it.
impl fmt::Display for PageResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "* {:?}", (&self.file, self.page, &self.global_id))
    }
}

/// Runs global-id recognition over scanned files.
pub struct GlobalIdScan<'a, S, R> {
    source: &'a S,
    recognizer: &'a R,
    config: &'a ScanConfig,
}

impl<'a, S: PageSource, R: PageRecognizer> GlobalIdScan<'a, S, R> {
    pub fn new(source: &'a S, recognizer: &'a R, config: &'a ScanConfig) -> Self {
        Self {
            source,
            recognizer,
            config,
        }
    }

    /// Process every file, writing progress and one `* (file, page, id)` line per page to `out`.
    ///
    /// Files that are not monochrome images are reported and skipped. Only failures
    /// to write to `out` end the run early.
    pub fn run<W: Write>(&self, files: &[PathBuf], out: &mut W) -> io::Result<Vec<PageResult>> {
        let mut results = Vec::new();
        for file in files {
            writeln!(out, "Processing {}", file.display())?;
            info!(file = %file.display(), "processing");

            let pages = match self.open(file) {
                Ok(pages) => pages,
                Err(err) if err.is_invalid_image() => {
                    warn!(file = %file.display(), %err, "skipping file");
                    writeln!(
                        out,
                        "Invalid input file {}. You need to specify a (multipage) monochrome TIFF as input.",
                        file.display()
                    )?;
                    continue;
                }
                Err(err) => {
                    warn!(file = %file.display(), %err, "skipping unreadable file");
                    writeln!(out, "Cannot read {}: {}", file.display(), err)?;
                    continue;
                }
            };

            let reported = relative_path(file, &self.config.survey_dir);
            for page in 0..pages {
                let result = PageResult {
                    file: reported.display().to_string(),
                    page,
                    global_id: self.identify(file, page),
                };
                writeln!(out, "{result}")?;
                results.push(result);
            }
        }
        writeln!(out, "Done")?;
        Ok(results)
    }

    fn open(&self, file: &Path) -> Result<usize, ScanError> {
        self.source.check_monochrome(file)?;
        self.source.page_count(file)
    }

    fn identify(&self, file: &Path, page: usize) -> Option<String> {
        let image = match self.source.load_page(file, page) {
            Ok(image) => image,
            Err(err) => {
                warn!(file = %file.display(), page, %err, "cannot load page");
                return None;
            }
        };
        match self.recognize(&image) {
            Ok(global_id) => {
                debug!(file = %file.display(), page, %global_id, "found global id");
                Some(global_id)
            }
            Err(err) => {
                warn!(file = %file.display(), page, %err, "no global id");
                None
            }
        }
    }

    fn recognize(&self, image: &PageImage) -> Result<String, RecognitionError> {
        let transform = if self.recognizer.is_rotated(image, self.config) {
            self.recognizer.calculate_matrix(image, self.config)?
        } else {
            Transform::IDENTITY
        };
        self.recognizer
            .calculate_global_id(image, &transform, self.config)
    }
}

/// Convenience wrapper around [`GlobalIdScan::run`].
pub fn find_global_ids<S, R, W>(
    files: &[PathBuf],
    source: &S,
    recognizer: &R,
    config: &ScanConfig,
    out: &mut W,
) -> io::Result<Vec<PageResult>>
where
    S: PageSource,
    R: PageRecognizer,
    W: Write,
{
    GlobalIdScan::new(source, recognizer, config).run(files, out)
}

/// `path` relative to `base`, both taken as absolute from the working directory.
/// Falls back to `path` unchanged if either cannot be made absolute.
pub fn relative_path(path: &Path, base: &Path) -> PathBuf {
    let (Ok(path_abs), Ok(base_abs)) = (std::path::absolute(path), std::path::absolute(base))
    else {
        return path.to_path_buf();
    };
    let path_parts = normalized(&path_abs);
    let base_parts = normalized(&base_abs);

    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return path_abs;
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part);
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

/// Components with `.` dropped and `..` applied.
fn normalized(path: &Path) -> Vec<Component<'_>> {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(Component::Normal(_))) {
                    parts.pop();
                }
            }
            other => parts.push(other),
        }
    }
    parts
}
