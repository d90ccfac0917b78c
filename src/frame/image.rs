use std::sync::Arc;

use crate::foundation::{
    core::ServiceId,
    error::{LumaError, LumaResult},
};

/// Pixel layout requested from, and reported by, a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ImageFormat {
    /// Straight RGBA8, row-major.
    Rgba,
    /// One byte of luma per pixel.
    Luma,
    /// Handle form consumed by the effect-chain engine. Leaf sources deliver RGBA8
    /// bytes for upload; transitions deliver a service handle.
    Gpu,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ImageData {
    Pixels(Arc<Vec<u8>>),
    /// The image is the output of this service's effect; resolved during chain execution.
    Service(ServiceId),
}

/// A concrete image pulled from a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub data: ImageData,
}

impl Image {
    /// A copy whose pixel buffer is not shared with `self`.
    pub fn to_owned_pixels(&self) -> Self {
        let data = match &self.data {
            ImageData::Pixels(bytes) => ImageData::Pixels(Arc::new(bytes.as_ref().clone())),
            ImageData::Service(id) => ImageData::Service(*id),
        };
        Self {
            format: self.format,
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Pixel bytes with a length check against the declared geometry.
    pub fn pixels(&self) -> LumaResult<&[u8]> {
        let ImageData::Pixels(bytes) = &self.data else {
            return Err(LumaError::effect(
                "image is a service handle, not a pixel buffer",
            ));
        };
        let bpp = match self.format {
            ImageFormat::Luma => 1,
            ImageFormat::Rgba | ImageFormat::Gpu => 4,
        };
        let expected = (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(bpp);
        if bytes.len() != expected {
            return Err(LumaError::effect(format!(
                "pixel buffer holds {} bytes, expected {expected} for {}x{}",
                bytes.len(),
                self.width,
                self.height
            )));
        }
        Ok(bytes.as_slice())
    }
}

/// Arguments of one image pull. A zero width or height asks for the native size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageRequest {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    /// The caller will modify the pixels; memoized buffers are copied, not shared.
    pub writable: bool,
}

impl ImageRequest {
    pub fn new(format: ImageFormat) -> Self {
        Self {
            format,
            width: 0,
            height: 0,
            writable: false,
        }
    }

    pub fn with_size(self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }
}
