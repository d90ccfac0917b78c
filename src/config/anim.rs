use crate::foundation::{
    core::Position,
    error::{LumaError, LumaResult},
};

/// Interpolation applied from one key toward the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Interp {
    /// Hold the key's value until the next key (`|=`).
    Discrete,
    /// Straight line to the next key (`=`).
    Linear,
    /// Catmull-Rom spline through neighbouring keys (`~=`).
    Smooth,
}

impl Interp {
    fn operator(self) -> &'static str {
        match self {
            Self::Discrete => "|=",
            Self::Linear => "=",
            Self::Smooth => "~=",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Key position. Negative values count back from the end of the animation.
    pub frame: Position,
    pub value: f64,
    pub interp: Interp,
}

/// A double that may vary over the lifetime of its owner.
///
/// Parsed from and printed back to the keyframe string form
/// `"0=0;50|=1;-1~=0.5"`. A bare number is a constant.
#[derive(Clone, Debug, PartialEq)]
pub enum Animated {
    Constant(f64),
    Keyframes(Vec<Keyframe>),
}

impl Default for Animated {
    fn default() -> Self {
        Self::Constant(0.0)
    }
}

impl Animated {
    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    pub fn parse(s: &str) -> LumaResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LumaError::animation("animation string must be non-empty"));
        }
        if !s.contains('=') {
            let v = parse_value(s)?;
            return Ok(Self::Constant(v));
        }

        let mut keys = Vec::new();
        for item in s.split(';').map(str::trim).filter(|i| !i.is_empty()) {
            let eq = item
                .find('=')
                .ok_or_else(|| LumaError::animation(format!("keyframe '{item}' has no '='")))?;
            let (head, value) = (&item[..eq], &item[eq + 1..]);
            let (frame, interp) = if let Some(f) = head.strip_suffix('|') {
                (f, Interp::Discrete)
            } else if let Some(f) = head.strip_suffix('~') {
                (f, Interp::Smooth)
            } else {
                (head, Interp::Linear)
            };
            let frame: Position = frame.trim().parse().map_err(|_| {
                LumaError::animation(format!("keyframe '{item}' has an invalid frame"))
            })?;
            keys.push(Keyframe {
                frame,
                value: parse_value(value)?,
                interp,
            });
        }

        if keys.is_empty() {
            return Err(LumaError::animation("animation string has no keyframes"));
        }
        Ok(Self::Keyframes(keys))
    }

    /// Sample at `position` within an animation of `length` frames. An empty key list
    /// samples as 0.
    pub fn sample(&self, position: Position, length: Position) -> f64 {
        let keys = match self {
            Self::Constant(v) => return *v,
            Self::Keyframes(keys) => keys,
        };

        let mut resolved: Vec<(Position, f64, Interp)> = keys
            .iter()
            .map(|k| {
                let f = if k.frame < 0 {
                    length + k.frame
                } else {
                    k.frame
                };
                (f, k.value, k.interp)
            })
            .collect();
        resolved.sort_by_key(|k| k.0);

        let Some(&(_, first, _)) = resolved.first() else {
            return 0.0;
        };
        let idx = resolved.partition_point(|k| k.0 <= position);
        if idx == 0 {
            return first;
        }
        if idx >= resolved.len() {
            return resolved[resolved.len() - 1].1;
        }

        let (fa, va, interp) = resolved[idx - 1];
        let (fb, vb, _) = resolved[idx];
        let denom = fb - fa;
        if denom <= 0 {
            return va;
        }
        let t = (position - fa) as f64 / denom as f64;

        match interp {
            Interp::Discrete => va,
            Interp::Linear => va + (vb - va) * t,
            Interp::Smooth => {
                let p0 = if idx >= 2 { resolved[idx - 2].1 } else { va };
                let p3 = resolved.get(idx + 1).map_or(vb, |k| k.1);
                catmull_rom(p0, va, vb, p3, t)
            }
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Keyframes(keys) if keys.len() > 1)
    }
}

impl std::fmt::Display for Animated {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant(v) => write!(f, "{v}"),
            Self::Keyframes(keys) => {
                for (i, k) in keys.iter().enumerate() {
                    if i > 0 {
                        f.write_str(";")?;
                    }
                    write!(f, "{}{}{}", k.frame, k.interp.operator(), k.value)?;
                }
                Ok(())
            }
        }
    }
}

impl std::str::FromStr for Animated {
    type Err = LumaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for Animated {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Constant(v) => serializer.serialize_f64(*v),
            Self::Keyframes(_) => serializer.collect_str(self),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Animated {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(Self::Constant(v)),
            Repr::Text(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

fn parse_value(s: &str) -> LumaResult<f64> {
    let v: f64 = s
        .trim()
        .parse()
        .map_err(|_| LumaError::animation(format!("invalid animation value '{}'", s.trim())))?;
    if !v.is_finite() {
        return Err(LumaError::animation("animation values must be finite"));
    }
    Ok(v)
}

fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

#[cfg(test)]
#[path = "../../tests/unit/config/anim.rs"]
mod tests;
