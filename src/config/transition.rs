use crate::{
    config::anim::Animated,
    foundation::{
        core::Position,
        error::{LumaError, LumaResult},
    },
};

/// Typed view of the keys the luma transition itself understands.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionConfig {
    /// Pattern source identifier. `None` or empty selects a plain dissolve.
    pub resource: Option<String>,
    /// Swap which input fades in.
    pub reverse: bool,
    /// Blur width of the wipe boundary; 0 is a hard edge.
    pub softness: Animated,
    /// Invert the sense of the pattern mask.
    pub invert: bool,
    /// First timeline position the transition covers.
    #[serde(rename = "in")]
    pub in_point: Position,
    /// Last covered position, inclusive. 0 means always active.
    #[serde(rename = "out")]
    pub out_point: Position,
}

impl TransitionConfig {
    /// Assign one key from its string form.
    ///
    /// Returns `false` for keys this config does not own so the caller can file them
    /// in the loose property store.
    pub fn set(&mut self, key: &str, value: &str) -> LumaResult<bool> {
        match key {
            "resource" => {
                let v = value.trim();
                self.resource = (!v.is_empty()).then(|| v.to_string());
            }
            "reverse" => self.reverse = parse_bool(key, value)?,
            "invert" => self.invert = parse_bool(key, value)?,
            "softness" => self.softness = Animated::parse(value)?,
            "in" => self.in_point = parse_position(key, value)?,
            "out" => self.out_point = parse_position(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// The non-empty resource identifier, if any.
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref().filter(|r| !r.is_empty())
    }

    pub fn validate(&self) -> LumaResult<()> {
        if self.out_point != 0 && self.out_point < self.in_point {
            return Err(LumaError::validation(format!(
                "transition out ({}) must be >= in ({})",
                self.out_point, self.in_point
            )));
        }
        Ok(())
    }

    /// Resolve position, length and progress for a frame at `frame_position`.
    ///
    /// `producer_range` is the `(in, out)` of the frame's producer and only matters
    /// for always-active transitions.
    pub fn timing(
        &self,
        frame_position: Position,
        producer_range: Option<(Position, Position)>,
    ) -> Timing {
        let (in_point, out_point) = if self.out_point == 0 {
            producer_range.unwrap_or((self.in_point, 0))
        } else {
            (self.in_point, self.out_point)
        };

        if out_point == 0 {
            return Timing {
                position: frame_position - in_point,
                length: 0,
                mix: 0.0,
            };
        }

        let position = frame_position - in_point;
        let length = out_point - in_point + 1;
        Timing {
            position,
            length,
            mix: progress(position, length),
        }
    }
}

/// Where a frame sits inside the transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    /// Offset from the in point.
    pub position: Position,
    /// Covered frames; 0 when the transition has no bounds.
    pub length: Position,
    /// `position / length`, clamped to `[0, 1]`.
    pub mix: f64,
}

/// Progress fraction of `position` within `length`, clamped to `[0, 1]`.
pub fn progress(position: Position, length: Position) -> f64 {
    if length <= 0 {
        return 0.0;
    }
    (position as f64 / length as f64).clamp(0.0, 1.0)
}

fn parse_bool(key: &str, value: &str) -> LumaResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(LumaError::validation(format!(
            "'{key}' expects a boolean, got '{other}'"
        ))),
    }
}

fn parse_position(key: &str, value: &str) -> LumaResult<Position> {
    value
        .trim()
        .parse()
        .map_err(|_| LumaError::validation(format!("'{key}' expects a frame number, got '{value}'")))
}

#[cfg(test)]
#[path = "../../tests/unit/config/transition.rs"]
mod tests;
