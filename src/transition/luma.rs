use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    config::{properties::Properties, transition::TransitionConfig},
    effects::{
        chain::{EffectChain, EffectVariant},
        params::ParamFamily,
    },
    foundation::{
        core::{Profile, ServiceId},
        error::{LumaError, LumaResult},
    },
    frame::{
        frame::Frame,
        image::{Image, ImageData, ImageFormat, ImageRequest},
        stack::SharedFrame,
    },
    producer::ProducerFactory,
    transition::pattern::{PRODUCER_PREFIX, PatternCache},
};

/// Configuration and hand-off properties, guarded by the service lock.
#[derive(Clone, Debug, Default)]
pub struct ServiceState {
    pub config: TransitionConfig,
    /// Loose entries: effect parameters written per materialization, `producer.*`
    /// pass-through, and anything else set by name.
    pub properties: Properties,
}

/// Blends a primary and secondary frame, optionally shaped by a pattern frame.
///
/// [`LumaTransition::process`] only stages work on the primary frame; pixels are bound
/// to the effect chain when a consumer pulls that frame's image.
pub struct LumaTransition {
    id: ServiceId,
    profile: Profile,
    chain: Arc<dyn EffectChain>,
    producers: Arc<dyn ProducerFactory>,
    service: Mutex<ServiceState>,
    pattern: Mutex<PatternCache>,
}

impl LumaTransition {
    pub fn new(
        profile: Profile,
        chain: Arc<dyn EffectChain>,
        producers: Arc<dyn ProducerFactory>,
    ) -> Self {
        Self {
            id: ServiceId::next(),
            profile,
            chain,
            producers,
            service: Mutex::new(ServiceState::default()),
            pattern: Mutex::new(PatternCache::new()),
        }
    }

    pub fn id(&self) -> ServiceId {
        self.id
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Set one property by name. Keys the typed config does not own are stored loosely.
    pub fn set(&self, key: &str, value: &str) -> LumaResult<()> {
        let mut state = lock(&self.service);
        if !state.config.set(key, value)? {
            state.properties.set_string(key, value);
        }
        Ok(())
    }

    /// Replace the typed configuration wholesale.
    pub fn configure(&self, config: TransitionConfig) -> LumaResult<()> {
        config.validate()?;
        lock(&self.service).config = config;
        Ok(())
    }

    /// Mutate the service state under the service lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut ServiceState) -> R) -> R {
        f(&mut lock(&self.service))
    }

    /// Snapshot of the service state.
    pub fn state(&self) -> ServiceState {
        lock(&self.service).clone()
    }

    /// Name the pattern frame is attached under on primary frames.
    pub fn pattern_attachment(&self) -> String {
        format!("luma.{}", self.id.0)
    }

    /// Stage `a_frame` for deferred blending with `b_frame` and return it.
    ///
    /// Stack after staging, top first: get_image callback, this transition, the
    /// secondary frame, the pattern frame or an empty placeholder.
    pub fn process(self: &Arc<Self>, mut a_frame: Frame, b_frame: Frame) -> Frame {
        let wipe = self.pattern_frame(&a_frame).map(|wipe| {
            let wipe = wipe.into_shared();
            a_frame.attach(self.pattern_attachment(), wipe.clone());
            wipe
        });

        a_frame.push_frame(wipe);
        a_frame.push_frame(Some(b_frame.into_shared()));
        a_frame.push_service(self.clone());
        a_frame.push_get_image(get_image);
        a_frame
    }

    fn pattern_frame(&self, a_frame: &Frame) -> Option<Frame> {
        let (resource, passthrough, position) = {
            let state = lock(&self.service);
            let timing = state
                .config
                .timing(a_frame.position(), a_frame.producer_range());
            let mut passthrough = Properties::new();
            for (k, v) in state.properties.with_prefix(PRODUCER_PREFIX) {
                passthrough.set(k.clone(), Some(v.clone()));
            }
            (
                state.config.resource().map(str::to_owned),
                passthrough,
                timing.position,
            )
        };

        lock(&self.pattern).frame_at(
            self.producers.as_ref(),
            &self.profile,
            resource.as_deref(),
            &passthrough,
            position,
        )
    }

    fn materialize(
        &self,
        a_frame: &mut Frame,
        b_frame: SharedFrame,
        c_frame: Option<SharedFrame>,
        request: &ImageRequest,
    ) -> LumaResult<Image> {
        let mut state = lock(&self.service);
        let ServiceState { config, properties } = &mut *state;

        let timing = config.timing(a_frame.position(), a_frame.producer_range());
        let softness = config.softness.sample(timing.position, timing.length);
        let request = ImageRequest {
            format: ImageFormat::Gpu,
            ..*request
        };

        let (variant, a_image, b_image, c_input) = match c_frame {
            Some(c_frame) => {
                tracing::trace!(service = %self.id, mix = timing.mix, "luma mix");
                ParamFamily::luma_mix(timing.mix, config.reverse, softness, config.invert)
                    .write(properties);

                let a_image = a_frame.get_image(&request)?;
                let sized = request.with_size(a_image.width, a_image.height);
                let b_image = lock(&b_frame).get_image(&sized)?;
                let c_image = lock(&c_frame).get_image(&sized)?;
                self.check_size(&[&a_image, &b_image, &c_image])?;
                (EffectVariant::LumaMix, a_image, b_image, Some((c_image, c_frame)))
            }
            None => {
                tracing::trace!(service = %self.id, mix = timing.mix, "mix");
                ParamFamily::mix(timing.mix, config.reverse).write(properties);

                let a_image = a_frame.get_image(&request)?;
                let sized = request.with_size(a_image.width, a_image.height);
                let b_image = lock(&b_frame).get_image(&sized)?;
                self.check_size(&[&a_image, &b_image])?;
                (EffectVariant::Mix, a_image, b_image, None)
            }
        };

        let (width, height) = (a_image.width, a_image.height);
        let bound = self.bind(
            a_frame,
            variant,
            a_image,
            (b_image, b_frame),
            c_input,
            properties,
        );
        drop(state);
        if let Err(err) = bound {
            self.chain.clear(a_frame, self.id);
            return Err(err);
        }

        Ok(Image {
            format: ImageFormat::Gpu,
            width,
            height,
            data: ImageData::Service(self.id),
        })
    }

    fn bind(
        &self,
        ctx: &mut Frame,
        variant: EffectVariant,
        a_image: Image,
        (b_image, b_frame): (Image, SharedFrame),
        c_input: Option<(Image, SharedFrame)>,
        params: &Properties,
    ) -> LumaResult<()> {
        self.chain.set_primary_input(ctx, self.id, a_image)?;
        self.chain
            .set_secondary_input(ctx, self.id, b_image, b_frame)?;
        if let Some((c_image, c_frame)) = c_input {
            self.chain
                .set_tertiary_input(ctx, self.id, c_image, c_frame)?;
        }
        self.chain.set_effect(ctx, self.id, variant, params)
    }

    fn check_size(&self, images: &[&Image]) -> LumaResult<()> {
        for img in images {
            if img.width < 1 || img.height < 1 {
                tracing::error!(
                    service = %self.id,
                    width = img.width,
                    height = img.height,
                    "invalid size for get_image"
                );
                return Err(LumaError::InvalidSize {
                    service: self.id,
                    width: img.width,
                    height: img.height,
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for LumaTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LumaTransition")
            .field("id", &self.id)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

/// Deferred callback staged by [`LumaTransition::process`].
fn get_image(a_frame: &mut Frame, request: &ImageRequest) -> LumaResult<Image> {
    let transition = a_frame
        .pop_service()?
        .downcast::<LumaTransition>()
        .map_err(|_| LumaError::stack("staged service is not a luma transition"))?;
    let b_frame = a_frame
        .pop_frame()?
        .ok_or_else(|| LumaError::stack("secondary frame is missing"))?;
    let c_frame = a_frame.pop_frame()?;

    transition.materialize(a_frame, b_frame, c_frame, request)
}

// Poisoning is ignored; every critical section leaves the state consistent.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
