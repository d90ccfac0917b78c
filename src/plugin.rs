use std::sync::Arc;

use crate::{
    effects::chain::EffectChain,
    foundation::core::Profile,
    producer::ProducerFactory,
    transition::luma::LumaTransition,
};

/// Identifier the luma transition registers under.
pub const LUMA_TRANSITION_ID: &str = "luma_mix";

/// Property announcing which streams a transition touches.
pub const TRANSITION_TYPE: &str = "_transition_type";

/// Kind of service a plugin entry point is asked to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Producer,
    Filter,
    Transition,
    Consumer,
}

/// Streams a transition operates on, as stored under [`TRANSITION_TYPE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionType {
    Video = 1,
    Audio = 2,
    AudioVideo = 3,
}

/// Process-wide collaborators available to plugin entry points.
#[derive(Clone)]
pub struct PluginContext {
    /// `None` when no effect-chain engine could be initialised in this process.
    pub effect_chain: Option<Arc<dyn EffectChain>>,
    pub producers: Arc<dyn ProducerFactory>,
}

/// Build a luma transition whose initial `resource` is `arg`.
///
/// Declines when no effect-chain engine is available or a service of another type was
/// requested.
pub fn transition_luma_init(
    profile: &Profile,
    service_type: ServiceType,
    id: &str,
    arg: Option<&str>,
    ctx: &PluginContext,
) -> Option<Arc<LumaTransition>> {
    if service_type != ServiceType::Transition {
        tracing::warn!(id, ?service_type, "luma transition requested as another service type");
        return None;
    }
    let Some(chain) = ctx.effect_chain.clone() else {
        tracing::warn!(id, "no effect chain available, luma transition disabled");
        return None;
    };

    let transition = LumaTransition::new(*profile, chain, ctx.producers.clone());
    transition.update(|state| {
        state.config.resource = arg.map(str::trim).filter(|a| !a.is_empty()).map(str::to_owned);
        state
            .properties
            .set_int(TRANSITION_TYPE, TransitionType::Video as i64);
    });
    Some(Arc::new(transition))
}

/// Read back the [`TRANSITION_TYPE`] a transition announced.
pub fn transition_type(transition: &LumaTransition) -> Option<TransitionType> {
    match transition.state().properties.get_int(TRANSITION_TYPE) {
        1 => Some(TransitionType::Video),
        2 => Some(TransitionType::Audio),
        3 => Some(TransitionType::AudioVideo),
        _ => None,
    }
}
