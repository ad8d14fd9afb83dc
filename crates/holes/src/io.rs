//! Image acquisition and mask output.
//!
//! A source answers `Ok(None)` when it simply has no image to offer (nothing
//! selected, nothing piped in). That is not an error and callers should stop
//! quietly.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use tracing::{debug, info};

use crate::{
    error::Result,
    types::{BinaryMask, Raster},
};

/// Trait for anything that can hand over a grayscale raster
pub trait ImageSource: Send + Sync {
    fn acquire(&self) -> Result<Option<Raster>>;

    /// Short label used in logs
    fn describe(&self) -> String;
}

/// Convert a decoded image of any colour type to a grayscale raster
pub fn to_raster(image: DynamicImage) -> Result<Raster> {
    Raster::try_from(DynamicImage::ImageLuma8(image.to_luma8()))
}

/// Load an image file as a grayscale raster
pub fn load_raster<P: AsRef<Path>>(path: P) -> Result<Raster> {
    let image = image::open(path.as_ref())?;
    to_raster(image)
}

/// Decode an in-memory image as a grayscale raster
pub fn load_raster_from_bytes(bytes: &[u8]) -> Result<Raster> {
    let image = image::load_from_memory(bytes)?;
    to_raster(image)
}

/// Save a mask for viewing; the format follows the file extension.
pub fn save_mask<P: AsRef<Path>>(mask: &BinaryMask, path: P) -> Result<()> {
    mask.image().save(path.as_ref())?;
    info!("mask written to {:?}", path.as_ref());
    Ok(())
}

/// Encode a mask as PNG bytes
pub fn encode_mask_png(mask: &BinaryMask) -> Result<Vec<u8>> {
    let mut bytes = std::io::Cursor::new(Vec::new());
    mask.image().write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Image file chosen by the user; `None` means nothing was chosen
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    pub path: Option<PathBuf>,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl ImageSource for FileSource {
    fn acquire(&self) -> Result<Option<Raster>> {
        match &self.path {
            Some(path) => load_raster(path).map(Some),
            None => Ok(None),
        }
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("file {}", path.display()),
            None => "file (none selected)".to_string(),
        }
    }
}

/// Encoded image bytes, e.g. read from stdin; empty means no image
#[derive(Debug, Clone, Default)]
pub struct BytesSource {
    pub bytes: Vec<u8>,
}

impl ImageSource for BytesSource {
    fn acquire(&self) -> Result<Option<Raster>> {
        if self.bytes.is_empty() {
            return Ok(None);
        }
        load_raster_from_bytes(&self.bytes).map(Some)
    }

    fn describe(&self) -> String {
        format!("{} bytes of encoded image data", self.bytes.len())
    }
}

/// Tries each source in turn and returns the first image found
#[derive(Default)]
pub struct SourceChain {
    sources: Vec<Box<dyn ImageSource>>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fallback source after the existing ones
    pub fn then<S>(mut self, source: S) -> Self
    where
        S: ImageSource + 'static,
    {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl ImageSource for SourceChain {
    fn acquire(&self) -> Result<Option<Raster>> {
        for source in &self.sources {
            if let Some(raster) = source.acquire()? {
                debug!("image acquired from {}", source.describe());
                return Ok(Some(raster));
            }
            debug!("no image from {}", source.describe());
        }
        Ok(None)
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.sources.iter().map(|s| s.describe()).collect();
        format!("chain [{}]", names.join(", "))
    }
}
