use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use formscan::{PageImage, PageSource, ScanError};
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

type TiffDecoder = Decoder<BufReader<File>>;

/// Page source for multi-page bilevel TIFF files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffPageSource;

impl TiffPageSource {
    fn open(path: &Path) -> Result<TiffDecoder, ScanError> {
        let file = File::open(path)?;
        Decoder::new(BufReader::new(file)).map_err(|err| ScanError::invalid(path, err.to_string()))
    }

    /// Advance the decoder to `page`.
    fn seek(decoder: &mut TiffDecoder, path: &Path, page: usize) -> Result<(), ScanError> {
        for current in 0..page {
            if !decoder.more_images() {
                return Err(ScanError::Decode {
                    path: path.to_path_buf(),
                    page,
                    message: format!("file has only {} pages", current + 1),
                });
            }
            decoder.next_image().map_err(|err| decode_error(path, page, err))?;
        }
        Ok(())
    }
}

fn decode_error(path: &Path, page: usize, err: tiff::TiffError) -> ScanError {
    ScanError::Decode {
        path: path.to_path_buf(),
        page,
        message: err.to_string(),
    }
}

/// Cut a decoded buffer down to `height` rows of packed 1-bit samples.
///
/// The decoder may hand back a buffer longer than the page itself.
fn packed_rows(mut pixels: Vec<u8>, width: u32, height: u32) -> Option<Vec<u8>> {
    let row_bytes = usize::try_from(width.div_ceil(8)).ok()?;
    let len = row_bytes.checked_mul(usize::try_from(height).ok()?)?;
    if pixels.len() < len {
        return None;
    }
    pixels.truncate(len);
    Some(pixels)
}

impl PageSource for TiffPageSource {
    fn check_monochrome(&self, path: &Path) -> Result<(), ScanError> {
        let mut decoder = Self::open(path)?;
        let mut page = 0;
        loop {
            let colortype = decoder
                .colortype()
                .map_err(|err| ScanError::invalid(path, err.to_string()))?;
            if colortype != ColorType::Gray(1) {
                return Err(ScanError::invalid(
                    path,
                    format!("page {page} is {colortype:?}, expected 1-bit gray"),
                ));
            }
            if !decoder.more_images() {
                return Ok(());
            }
            decoder
                .next_image()
                .map_err(|err| ScanError::invalid(path, err.to_string()))?;
            page += 1;
        }
    }

    fn page_count(&self, path: &Path) -> Result<usize, ScanError> {
        let mut decoder = Self::open(path)?;
        let mut pages = 1;
        while decoder.more_images() {
            decoder
                .next_image()
                .map_err(|err| decode_error(path, pages, err))?;
            pages += 1;
        }
        debug!(path = %path.display(), pages, "counted pages");
        Ok(pages)
    }

    fn load_page(&self, path: &Path, page: usize) -> Result<PageImage, ScanError> {
        let mut decoder = Self::open(path)?;
        Self::seek(&mut decoder, path, page)?;
        let (width, height) = decoder
            .dimensions()
            .map_err(|err| decode_error(path, page, err))?;
        let pixels = match decoder
            .read_image()
            .map_err(|err| decode_error(path, page, err))?
        {
            DecodingResult::U8(pixels) => pixels,
            _ => {
                return Err(ScanError::Decode {
                    path: path.to_path_buf(),
                    page,
                    message: "unexpected sample format".to_string(),
                });
            }
        };
        let pixels = packed_rows(pixels, width, height).ok_or_else(|| ScanError::Decode {
            path: path.to_path_buf(),
            page,
            message: format!("too few samples for a {width}x{height} page"),
        })?;
        Ok(PageImage {
            source: path.to_path_buf(),
            page,
            width,
            height,
            pixels,
        })
    }
}
