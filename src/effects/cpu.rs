use std::borrow::Cow;

use rayon::prelude::*;

use crate::{
    config::properties::Properties,
    effects::{
        chain::{EffectBinding, EffectChain, EffectVariant},
        params::ParamFamily,
    },
    foundation::{
        core::ServiceId,
        error::{LumaError, LumaResult},
    },
    frame::{
        frame::Frame,
        image::{Image, ImageData, ImageFormat, ImageRequest},
        stack::SharedFrame,
    },
};

/// Reference effect-chain engine that executes bindings on the CPU.
///
/// Inputs must be RGBA8 pixel buffers. Inputs whose size differs from the primary
/// input are sampled nearest-neighbour onto the primary geometry.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuEffectChain;

impl CpuEffectChain {
    pub fn new() -> Self {
        Self
    }

    /// Pull `frame`'s image and execute whatever effect it resolves to.
    pub fn render(&self, frame: &mut Frame) -> LumaResult<image::RgbaImage> {
        let img = frame.get_image(&ImageRequest::new(ImageFormat::Gpu))?;
        match img.data {
            ImageData::Pixels(_) => to_rgba_image(&img),
            ImageData::Service(service) => execute(frame, service, &mut Vec::new()),
        }
    }
}

impl EffectChain for CpuEffectChain {
    fn set_primary_input(
        &self,
        ctx: &mut Frame,
        service: ServiceId,
        image: Image,
    ) -> LumaResult<()> {
        // The primary input starts a fresh binding.
        *EffectBinding::on_frame(ctx, service)? = EffectBinding {
            inputs: [Some(image), None, None],
            ..EffectBinding::default()
        };
        Ok(())
    }

    fn set_secondary_input(
        &self,
        ctx: &mut Frame,
        service: ServiceId,
        image: Image,
        frame: SharedFrame,
    ) -> LumaResult<()> {
        let binding = EffectBinding::on_frame(ctx, service)?;
        binding.inputs[1] = Some(image);
        binding.frames.push(frame);
        Ok(())
    }

    fn set_tertiary_input(
        &self,
        ctx: &mut Frame,
        service: ServiceId,
        image: Image,
        frame: SharedFrame,
    ) -> LumaResult<()> {
        let binding = EffectBinding::on_frame(ctx, service)?;
        binding.inputs[2] = Some(image);
        binding.frames.push(frame);
        Ok(())
    }

    fn set_effect(
        &self,
        ctx: &mut Frame,
        service: ServiceId,
        variant: EffectVariant,
        params: &Properties,
    ) -> LumaResult<()> {
        let family = ParamFamily::read(params, variant).ok_or_else(|| {
            LumaError::effect(format!("{variant:?} parameters are missing for {service}"))
        })?;
        EffectBinding::on_frame(ctx, service)?.effect = Some((variant, family));
        Ok(())
    }
}

/// Execute `service`'s binding on `ctx`. Inputs that are themselves service handles
/// are executed first; `active` holds the services currently being executed.
fn execute(
    ctx: &Frame,
    service: ServiceId,
    active: &mut Vec<ServiceId>,
) -> LumaResult<image::RgbaImage> {
    if active.contains(&service) {
        return Err(LumaError::effect(format!(
            "effect bindings form a cycle through {service}"
        )));
    }
    let binding = EffectBinding::get(ctx, service)
        .ok_or_else(|| LumaError::effect(format!("no effect bound for {service} on this frame")))?;
    let (_, params, inputs) = binding.resolve()?;

    active.push(service);
    let resolved = inputs
        .iter()
        .enumerate()
        .map(|(i, img)| resolve_input(ctx, i, img, active))
        .collect::<LumaResult<Vec<_>>>();
    active.pop();
    let resolved = resolved?;

    let buffers: Vec<(&[u8], u32, u32)> = resolved
        .iter()
        .map(|(bytes, w, h)| (bytes.as_ref(), *w, *h))
        .collect();
    let (w, h) = (buffers[0].1, buffers[0].2);

    let row_len = w as usize * 4;
    let mut out = vec![0u8; row_len * h as usize];
    out.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            for x in 0..w {
                let a = sample(buffers[0], x, y, w, h);
                let b = sample(buffers[1], x, y, w, h);
                let px = match params {
                    ParamFamily::Mix {
                        strength_first,
                        strength_second,
                    } => mix(a, b, strength_first as f32, strength_second as f32),
                    ParamFamily::LumaMix {
                        progress,
                        transition_width,
                        inverse,
                    } => {
                        let luma = f32::from(sample(buffers[2], x, y, w, h)[0]) / 255.0;
                        let luma = if inverse { 1.0 - luma } else { luma };
                        let m = luma_weight(luma, progress as f32, transition_width as f32);
                        mix(a, b, 1.0 - m, m)
                    }
                };
                let i = x as usize * 4;
                row[i..i + 4].copy_from_slice(&px);
            }
        });

    image::RgbaImage::from_raw(w, h, out)
        .ok_or_else(|| LumaError::effect("output buffer does not match its geometry"))
}

/// RGBA8 bytes and geometry of one bound input.
fn resolve_input<'a>(
    ctx: &'a Frame,
    index: usize,
    img: &'a Image,
    active: &mut Vec<ServiceId>,
) -> LumaResult<(Cow<'a, [u8]>, u32, u32)> {
    if img.width == 0 || img.height == 0 {
        return Err(LumaError::effect(format!("input {index} has no pixels")));
    }
    match img.data {
        ImageData::Service(inner) => {
            let rendered = execute(ctx, inner, active)?;
            let (w, h) = rendered.dimensions();
            Ok((Cow::Owned(rendered.into_raw()), w, h))
        }
        ImageData::Pixels(_) => {
            if matches!(img.format, ImageFormat::Luma) {
                return Err(LumaError::effect(format!(
                    "input {index} is luma, expected rgba"
                )));
            }
            Ok((Cow::Borrowed(img.pixels()?), img.width, img.height))
        }
    }
}

/// Share of the second input at a pixel whose (polarity-corrected) luma is `luma`.
pub fn luma_weight(luma: f32, progress: f32, transition_width: f32) -> f32 {
    (luma * transition_width - transition_width + progress * (transition_width + 1.0))
        .clamp(0.0, 1.0)
}

/// Weighted sum of two RGBA8 pixels.
pub fn mix(a: [u8; 4], b: [u8; 4], wa: f32, wb: f32) -> [u8; 4] {
    let mut out = [0u8; 4];
    for i in 0..4 {
        let v = f32::from(a[i]) * wa + f32::from(b[i]) * wb;
        out[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

fn sample((bytes, iw, ih): (&[u8], u32, u32), x: u32, y: u32, ow: u32, oh: u32) -> [u8; 4] {
    let sx = (u64::from(x) * u64::from(iw) / u64::from(ow)) as u32;
    let sy = (u64::from(y) * u64::from(ih) / u64::from(oh)) as u32;
    let i = (sy as usize * iw as usize + sx as usize) * 4;
    [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]
}

fn to_rgba_image(img: &Image) -> LumaResult<image::RgbaImage> {
    if matches!(img.format, ImageFormat::Luma) {
        return Err(LumaError::effect("cpu chain expects rgba inputs"));
    }
    image::RgbaImage::from_raw(img.width, img.height, img.pixels()?.to_vec())
        .ok_or_else(|| LumaError::effect("image buffer does not match its geometry"))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/cpu.rs"]
mod tests;
