use std::sync::Arc;

use crate::{
    frame::image::{Image, ImageData, ImageFormat, ImageRequest},
    foundation::error::LumaResult,
};

/// Base image of a frame, consulted once its deferred stack holds no callbacks.
pub trait ImageSource: Send {
    fn get_image(&mut self, request: &ImageRequest) -> LumaResult<Image>;
}

/// An in-memory still image.
#[derive(Clone, Debug)]
pub struct StillSource {
    rgba: Arc<image::RgbaImage>,
}

impl StillSource {
    pub fn new(rgba: Arc<image::RgbaImage>) -> Self {
        Self { rgba }
    }

    /// A uniformly filled image.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(Arc::new(image::RgbaImage::from_pixel(
            width,
            height,
            image::Rgba(rgba),
        )))
    }
}

impl ImageSource for StillSource {
    fn get_image(&mut self, request: &ImageRequest) -> LumaResult<Image> {
        let (width, height) = self.rgba.dimensions();
        let bytes = match request.format {
            ImageFormat::Rgba | ImageFormat::Gpu => self.rgba.as_raw().clone(),
            ImageFormat::Luma => self
                .rgba
                .pixels()
                .map(|p| rec601_luma(p.0))
                .collect::<Vec<u8>>(),
        };
        Ok(Image {
            format: request.format,
            width,
            height,
            data: ImageData::Pixels(Arc::new(bytes)),
        })
    }
}

fn rec601_luma([r, g, b, _]: [u8; 4]) -> u8 {
    let y = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
    y.round().clamp(0.0, 255.0) as u8
}
