use crate::{
    config::properties::Properties,
    effects::params::ParamFamily,
    foundation::{
        core::ServiceId,
        error::{LumaError, LumaResult},
    },
    frame::{frame::Frame, image::Image, stack::SharedFrame},
};

/// The two effects a luma transition can select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectVariant {
    /// Two-input cross-fade.
    Mix,
    /// Three-input cross-fade shaped by a luma pattern.
    LumaMix,
}

impl EffectVariant {
    pub fn input_count(self) -> usize {
        match self {
            Self::Mix => 2,
            Self::LumaMix => 3,
        }
    }
}

/// The effect-chain engine as seen by a transition.
///
/// Inputs and effects are bound per primary-frame context and per service; the engine
/// resolves the service's image handle later, when the chain executes.
pub trait EffectChain: Send + Sync {
    fn set_primary_input(
        &self,
        ctx: &mut Frame,
        service: ServiceId,
        image: Image,
    ) -> LumaResult<()>;

    /// `frame` is kept alive for as long as the binding exists.
    fn set_secondary_input(
        &self,
        ctx: &mut Frame,
        service: ServiceId,
        image: Image,
        frame: SharedFrame,
    ) -> LumaResult<()>;

    fn set_tertiary_input(
        &self,
        ctx: &mut Frame,
        service: ServiceId,
        image: Image,
        frame: SharedFrame,
    ) -> LumaResult<()>;

    /// Select `variant` for `service`, reading its parameters from `params`.
    fn set_effect(
        &self,
        ctx: &mut Frame,
        service: ServiceId,
        variant: EffectVariant,
        params: &Properties,
    ) -> LumaResult<()>;

    /// Drop everything bound for `service` on `ctx`.
    fn clear(&self, ctx: &mut Frame, service: ServiceId) {
        ctx.detach(&EffectBinding::key(service));
    }
}

/// Everything bound for one service on one primary frame.
#[derive(Debug, Default)]
pub struct EffectBinding {
    pub inputs: [Option<Image>; 3],
    pub effect: Option<(EffectVariant, ParamFamily)>,
    /// Frames the bound inputs came from.
    pub frames: Vec<SharedFrame>,
}

impl EffectBinding {
    /// Attachment name of `service`'s binding on a primary frame.
    pub fn key(service: ServiceId) -> String {
        format!("effect.binding.{}", service.0)
    }

    /// The binding for `service` on `ctx`, created empty on first use.
    pub fn on_frame(ctx: &mut Frame, service: ServiceId) -> LumaResult<&mut EffectBinding> {
        let key = Self::key(service);
        ctx.attachment_or_default::<EffectBinding>(&key)
            .ok_or_else(|| LumaError::effect(format!("attachment '{key}' is not an effect binding")))
    }

    pub fn get(ctx: &Frame, service: ServiceId) -> Option<&EffectBinding> {
        ctx.attachment(&Self::key(service))
    }

    /// The selected effect and its inputs, checked for completeness.
    pub fn resolve(&self) -> LumaResult<(EffectVariant, ParamFamily, Vec<&Image>)> {
        let (variant, params) = self
            .effect
            .ok_or_else(|| LumaError::effect("no effect selected"))?;
        let inputs = self.inputs[..variant.input_count()]
            .iter()
            .enumerate()
            .map(|(i, input)| {
                input
                    .as_ref()
                    .ok_or_else(|| LumaError::effect(format!("{variant:?} is missing input {i}")))
            })
            .collect::<LumaResult<Vec<_>>>()?;
        Ok((variant, params, inputs))
    }
}
