use formscan::{PageImage, PageRecognizer, RecognitionError, ScanConfig, Transform};

/// Recognizer that maps the page geometry but has no barcode decoder.
///
/// Every page comes out without a global id.
#[derive(Debug, Clone, Copy, Default)]
pub struct UndecodedBarcode;

impl PageRecognizer for UndecodedBarcode {
    /// Scale from millimetres on the paper to pixels of the scan.
    fn calculate_matrix(
        &self,
        page: &PageImage,
        config: &ScanConfig,
    ) -> Result<Transform, RecognitionError> {
        if config.paper_width <= 0.0 || config.paper_height <= 0.0 {
            return Err(RecognitionError::Matrix(format!(
                "invalid paper size {}x{}",
                config.paper_width, config.paper_height
            )));
        }
        let sx = f64::from(page.width) / config.paper_width;
        let sy = f64::from(page.height) / config.paper_height;
        Ok(Transform([sx, 0.0, 0.0, sy, 0.0, 0.0]))
    }

    fn calculate_global_id(
        &self,
        _page: &PageImage,
        _transform: &Transform,
        config: &ScanConfig,
    ) -> Result<String, RecognitionError> {
        Err(RecognitionError::Other(format!(
            "no decoder for {} barcodes",
            config.style
        )))
    }
}
