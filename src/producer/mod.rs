use crate::{
    config::properties::Properties,
    foundation::core::{Position, Profile},
    frame::frame::Frame,
};

pub(crate) mod factory;
pub(crate) mod gradient;
pub(crate) mod still;

/// Frames a producer reports when nothing sets its `length` property.
pub const DEFAULT_LENGTH: Position = 15000;

/// A generator of frames at arbitrary timeline positions.
pub trait Producer: Send {
    /// Identifier the producer was built from.
    fn resource(&self) -> &str;

    fn properties(&self) -> &Properties;

    fn properties_mut(&mut self) -> &mut Properties;

    fn seek(&mut self, position: Position);

    fn position(&self) -> Position;

    /// Frame at the current position, or `None` when the producer has nothing there.
    fn get_frame(&mut self, track: usize) -> Option<Frame>;

    /// Release held resources. Called exactly once by the owner before dropping.
    fn close(&mut self) {}

    /// Content length in frames, from the `length` property.
    fn length(&self) -> Position {
        match self.properties().get_int("length") {
            n if n > 0 => n,
            _ => DEFAULT_LENGTH,
        }
    }

    fn eof(&self) -> EofMode {
        EofMode::from_properties(self.properties())
    }

    fn set_eof(&mut self, eof: EofMode) {
        self.properties_mut().set_string("eof", eof.as_str());
    }
}

/// Builds producers from resource identifiers.
pub trait ProducerFactory: Send + Sync {
    fn create(&self, profile: &Profile, resource: &str) -> Option<Box<dyn Producer>>;
}

/// What a producer does when asked for a position past its content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EofMode {
    /// Keep returning the last frame.
    #[default]
    Pause,
    /// Wrap back to the first frame.
    Loop,
    /// Return nothing.
    Continue,
}

impl EofMode {
    pub fn from_properties(props: &Properties) -> Self {
        match props.get_string("eof").as_deref().map(str::trim) {
            Some("loop") => Self::Loop,
            Some("continue") => Self::Continue,
            _ => Self::Pause,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Loop => "loop",
            Self::Continue => "continue",
        }
    }

    /// Map a requested position onto `[0, length)`; `None` means no frame.
    pub fn map(self, position: Position, length: Position) -> Option<Position> {
        if length <= 0 {
            return None;
        }
        match self {
            Self::Loop => Some(position.rem_euclid(length)),
            Self::Pause => Some(position.clamp(0, length - 1)),
            Self::Continue => (position < length).then_some(position.max(0)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/producer/eof.rs"]
mod tests;
