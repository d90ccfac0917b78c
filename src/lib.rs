//! Lumamix is the luma/mix transition of a video-compositing pipeline.
//!
//! A [`LumaTransition`] blends a primary and a secondary frame under a time-varying mix
//! ratio, optionally shaped by a wipe pattern frame:
//!
//! - [`LumaTransition::process`] stages the inputs on the primary frame's deferred stack
//! - pulling the primary frame's image binds the inputs and the selected
//!   [`EffectVariant`] to an [`EffectChain`]
//! - [`CpuEffectChain`] executes bindings on the CPU
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod config;
pub(crate) mod effects;
pub(crate) mod frame;
/// Plugin entry point and registration metadata.
pub mod plugin;
pub(crate) mod producer;
pub(crate) mod transition;

pub use crate::foundation::core::{Fps, Position, Profile, ServiceId};
pub use crate::foundation::error::{LumaError, LumaResult};

pub use crate::config::anim::{Animated, Interp, Keyframe};
pub use crate::config::properties::{Properties, Value};
pub use crate::config::transition::{Timing, TransitionConfig, progress};

pub use crate::frame::frame::{DISTORT, Frame};
pub use crate::frame::image::{Image, ImageData, ImageFormat, ImageRequest};
pub use crate::frame::source::{ImageSource, StillSource};
pub use crate::frame::stack::{GetImageFn, ServiceRef, SharedFrame, StackItem};

pub use crate::producer::factory::{DefaultProducerFactory, WIPE_PREFIX};
pub use crate::producer::gradient::{GradientProducer, WipeDir, linear_ramp};
pub use crate::producer::still::StillProducer;
pub use crate::producer::{DEFAULT_LENGTH, EofMode, Producer, ProducerFactory};

pub use crate::effects::chain::{EffectBinding, EffectChain, EffectVariant};
pub use crate::effects::cpu::CpuEffectChain;
pub use crate::effects::params::{
    EFFECT_NAMESPACE, INVERSE, PROGRESS, ParamFamily, SOFTNESS_EPSILON, STRENGTH_FIRST,
    STRENGTH_SECOND, TRANSITION_WIDTH,
};

pub use crate::transition::luma::{LumaTransition, ServiceState};
pub use crate::transition::pattern::{PRODUCER_PREFIX, PatternCache};
