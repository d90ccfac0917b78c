use std::path::PathBuf;

use crate::{
    foundation::core::Profile,
    producer::{
        Producer, ProducerFactory,
        gradient::{GradientProducer, WipeDir},
        still::StillProducer,
    },
};

/// Resource prefix selecting a generated linear wipe, e.g. `wipe:ltr`.
pub const WIPE_PREFIX: &str = "wipe:";

/// Resolves `wipe:<dir>` to a generated ramp and anything else to an image file.
///
/// Relative file paths are resolved against `root` when one is set.
#[derive(Clone, Debug, Default)]
pub struct DefaultProducerFactory {
    root: Option<PathBuf>,
}

impl DefaultProducerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

impl ProducerFactory for DefaultProducerFactory {
    fn create(&self, profile: &Profile, resource: &str) -> Option<Box<dyn Producer>> {
        if let Some(dir) = resource.strip_prefix(WIPE_PREFIX) {
            return match WipeDir::parse(dir) {
                Ok(dir) => Some(Box::new(GradientProducer::new(profile, resource, dir))),
                Err(err) => {
                    tracing::warn!(resource, %err, "cannot build wipe pattern");
                    None
                }
            };
        }

        let path = match &self.root {
            Some(root) => root.join(resource),
            None => PathBuf::from(resource),
        };
        match StillProducer::open(&path) {
            Ok(p) => Some(Box::new(p)),
            Err(err) => {
                tracing::warn!(resource, %err, "cannot open pattern image");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/producer/factory.rs"]
mod tests;
