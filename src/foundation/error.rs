use crate::foundation::core::ServiceId;

pub type LumaResult<T> = Result<T, LumaError>;

#[derive(thiserror::Error, Debug)]
pub enum LumaError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("animation error: {0}")]
    Animation(String),

    /// A frame could not produce its image. The collaborator's message is kept as-is.
    #[error("image acquisition error: {0}")]
    Acquisition(String),

    #[error("invalid size for get_image on {service}: {width}x{height}")]
    InvalidSize {
        service: ServiceId,
        width: u32,
        height: u32,
    },

    #[error("frame stack error: {0}")]
    Stack(String),

    #[error("effect error: {0}")]
    Effect(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LumaError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::Acquisition(msg.into())
    }

    pub fn stack(msg: impl Into<String>) -> Self {
        Self::Stack(msg.into())
    }

    pub fn effect(msg: impl Into<String>) -> Self {
        Self::Effect(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
