use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::error::{LumaError, LumaResult};

/// Timeline position in frames. Signed so that offsets relative to an in point stay
/// representable before the point itself.
pub type Position = i64;

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> LumaResult<Self> {
        if den == 0 {
            return Err(LumaError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(LumaError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

/// Frame geometry and rate context shared by every service in one pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Profile {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
}

impl Profile {
    pub fn new(width: u32, height: u32, fps: Fps) -> LumaResult<Self> {
        if width == 0 || height == 0 {
            return Err(LumaError::validation(format!(
                "profile size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height, fps })
    }
}

/// Process-unique identity of a service instance.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ServiceId(pub u64);

impl ServiceId {
    /// Allocate the next id. Ids are never reused within a process.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "luma#{}", self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
