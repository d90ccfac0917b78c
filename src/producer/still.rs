use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::{
    config::properties::Properties,
    foundation::{core::Position, error::LumaResult},
    frame::{frame::Frame, source::StillSource},
    producer::Producer,
};

/// Repeats one decoded image for every position it covers.
pub struct StillProducer {
    resource: String,
    properties: Properties,
    position: Position,
    rgba: Option<Arc<image::RgbaImage>>,
}

impl StillProducer {
    pub fn new(resource: impl Into<String>, rgba: Arc<image::RgbaImage>) -> Self {
        let resource = resource.into();
        let mut properties = Properties::new();
        properties.set_string("resource", resource.clone());
        Self {
            resource,
            properties,
            position: 0,
            rgba: Some(rgba),
        }
    }

    /// Decode an image file (PGM, PNG, JPEG, ...).
    pub fn open(path: impl AsRef<Path>) -> LumaResult<Self> {
        let path = path.as_ref();
        let rgba = image::open(path)
            .with_context(|| format!("decode pattern image '{}'", path.display()))?
            .to_rgba8();
        Ok(Self::new(path.to_string_lossy(), Arc::new(rgba)))
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.rgba.as_ref().map(|img| img.dimensions())
    }
}

impl Producer for StillProducer {
    fn resource(&self) -> &str {
        &self.resource
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    fn seek(&mut self, position: Position) {
        self.position = position;
    }

    fn position(&self) -> Position {
        self.position
    }

    fn get_frame(&mut self, _track: usize) -> Option<Frame> {
        let rgba = self.rgba.clone()?;
        let length = self.length();
        let local = self.eof().map(self.position, length)?;
        let mut frame = Frame::with_source(local, StillSource::new(rgba));
        frame.set_producer_range(0, length - 1);
        Some(frame)
    }

    fn close(&mut self) {
        self.rgba = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/producer/still.rs"]
mod tests;
