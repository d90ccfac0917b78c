use std::sync::Arc;

use crate::{
    config::properties::Properties,
    foundation::{
        core::{Position, Profile},
        error::{LumaError, LumaResult},
    },
    frame::{frame::Frame, source::StillSource},
    producer::Producer,
};

/// Direction a generated linear wipe travels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WipeDir {
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

impl WipeDir {
    pub fn parse(s: &str) -> LumaResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left_to_right" | "lefttoright" | "ltr" => Ok(Self::LeftToRight),
            "right_to_left" | "righttoleft" | "rtl" => Ok(Self::RightToLeft),
            "top_to_bottom" | "toptobottom" | "ttb" => Ok(Self::TopToBottom),
            "bottom_to_top" | "bottomtotop" | "btt" => Ok(Self::BottomToTop),
            other => Err(LumaError::validation(format!("unknown wipe dir '{other}'"))),
        }
    }
}

/// Linear luma ramp sized to the profile. Dark pixels sit where the wipe starts.
pub fn linear_ramp(width: u32, height: u32, dir: WipeDir) -> image::RgbaImage {
    let span = match dir {
        WipeDir::LeftToRight | WipeDir::RightToLeft => width,
        WipeDir::TopToBottom | WipeDir::BottomToTop => height,
    }
    .saturating_sub(1)
    .max(1) as f32;

    image::RgbaImage::from_fn(width, height, |x, y| {
        let d = match dir {
            WipeDir::LeftToRight => x,
            WipeDir::RightToLeft => width - 1 - x,
            WipeDir::TopToBottom => y,
            WipeDir::BottomToTop => height - 1 - y,
        } as f32;
        let v = ((d / span) * 255.0).round().clamp(0.0, 255.0) as u8;
        image::Rgba([v, v, v, 255])
    })
}

/// Produces a generated wipe pattern for the `wipe:<dir>` resource family.
pub struct GradientProducer {
    resource: String,
    properties: Properties,
    position: Position,
    ramp: Arc<image::RgbaImage>,
}

impl GradientProducer {
    pub fn new(profile: &Profile, resource: impl Into<String>, dir: WipeDir) -> Self {
        let resource = resource.into();
        let mut properties = Properties::new();
        properties.set_string("resource", resource.clone());
        Self {
            resource,
            properties,
            position: 0,
            ramp: Arc::new(linear_ramp(profile.width, profile.height, dir)),
        }
    }
}

impl Producer for GradientProducer {
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
        let length = self.length();
        let local = self.eof().map(self.position, length)?;
        let mut frame = Frame::with_source(local, StillSource::new(self.ramp.clone()));
        frame.set_producer_range(0, length - 1);
        Some(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/producer/gradient.rs"]
mod tests;
