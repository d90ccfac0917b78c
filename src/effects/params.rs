use crate::{config::properties::Properties, effects::chain::EffectVariant};

/// Namespace of the keys handed to the effect-chain engine.
pub const EFFECT_NAMESPACE: &str = "effect.";

pub const STRENGTH_FIRST: &str = "effect.float.strength_first";
pub const STRENGTH_SECOND: &str = "effect.float.strength_second";
pub const PROGRESS: &str = "effect.float.progress";
pub const TRANSITION_WIDTH: &str = "effect.float.transition_width";
pub const INVERSE: &str = "effect.int.inverse";

/// Added to softness before inverting it so a zero softness yields a hard edge.
pub const SOFTNESS_EPSILON: f64 = 1.0e-4;

/// Parameters of exactly one effect variant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ParamFamily {
    /// Two-input cross-fade weights.
    Mix {
        strength_first: f64,
        strength_second: f64,
    },
    /// Three-input pattern-shaped wipe.
    LumaMix {
        progress: f64,
        transition_width: f64,
        inverse: bool,
    },
}

impl ParamFamily {
    /// Cross-fade weights for `mix` in `[0, 1]`; `reverse` swaps which input fades in.
    pub fn mix(mix: f64, reverse: bool) -> Self {
        let inverse = 1.0 - mix;
        Self::Mix {
            strength_first: if reverse { mix } else { inverse },
            strength_second: if reverse { inverse } else { mix },
        }
    }

    /// Wipe parameters. The mask polarity is inverted unless `invert` is set.
    pub fn luma_mix(mix: f64, reverse: bool, softness: f64, invert: bool) -> Self {
        Self::LumaMix {
            progress: if reverse { 1.0 - mix } else { mix },
            transition_width: 1.0 / (softness + SOFTNESS_EPSILON),
            inverse: !invert,
        }
    }

    pub fn variant(&self) -> EffectVariant {
        match self {
            Self::Mix { .. } => EffectVariant::Mix,
            Self::LumaMix { .. } => EffectVariant::LumaMix,
        }
    }

    /// Write this family and clear the other one in a single pass over `props`.
    pub fn write(&self, props: &mut Properties) {
        match *self {
            Self::Mix {
                strength_first,
                strength_second,
            } => {
                props.set(INVERSE, None);
                props.set(PROGRESS, None);
                props.set(TRANSITION_WIDTH, None);
                props.set_double(STRENGTH_FIRST, strength_first);
                props.set_double(STRENGTH_SECOND, strength_second);
            }
            Self::LumaMix {
                progress,
                transition_width,
                inverse,
            } => {
                props.set(STRENGTH_FIRST, None);
                props.set(STRENGTH_SECOND, None);
                props.set_double(PROGRESS, progress);
                props.set_double(TRANSITION_WIDTH, transition_width);
                props.set_int(INVERSE, i64::from(inverse));
            }
        }
    }

    /// Read back the family `variant` expects; `None` when any of its keys is missing.
    pub fn read(props: &Properties, variant: EffectVariant) -> Option<Self> {
        match variant {
            EffectVariant::Mix => Some(Self::Mix {
                strength_first: props.get_double(STRENGTH_FIRST)?,
                strength_second: props.get_double(STRENGTH_SECOND)?,
            }),
            EffectVariant::LumaMix => {
                let inverse = props.get(INVERSE)?.as_int()? != 0;
                Some(Self::LumaMix {
                    progress: props.get_double(PROGRESS)?,
                    transition_width: props.get_double(TRANSITION_WIDTH)?,
                    inverse,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/params.rs"]
mod tests;
