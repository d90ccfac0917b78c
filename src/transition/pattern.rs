use crate::{
    config::properties::Properties,
    foundation::core::{Position, Profile},
    frame::frame::{DISTORT, Frame},
    producer::{EofMode, Producer, ProducerFactory},
};

/// Transition properties under this prefix are handed to the pattern producer.
pub const PRODUCER_PREFIX: &str = "producer.";

/// At most one pattern producer, bound to the resource it was built from.
#[derive(Default)]
pub struct PatternCache {
    producer: Option<Box<dyn Producer>>,
    last_resource: Option<String>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource recorded by the last rebuild attempt.
    pub fn last_resource(&self) -> Option<&str> {
        self.last_resource.as_deref()
    }

    pub fn has_producer(&self) -> bool {
        self.producer.is_some()
    }

    /// The producer for `resource`, rebuilt only when there is none yet or the
    /// resource differs from the one last seen. Empty resources leave the cache as it is
    /// and yield nothing.
    pub fn producer_for(
        &mut self,
        factory: &dyn ProducerFactory,
        profile: &Profile,
        resource: Option<&str>,
    ) -> Option<&mut Box<dyn Producer>> {
        let resource = resource.filter(|r| !r.is_empty())?;

        if self.producer.is_none() || self.last_resource.as_deref() != Some(resource) {
            self.close();
            self.last_resource = Some(resource.to_string());
            tracing::debug!(resource, "building pattern producer");
            let mut producer = factory.create(profile, resource);
            if let Some(p) = producer.as_mut() {
                p.set_eof(EofMode::Loop);
            }
            self.producer = producer;
        }
        self.producer.as_mut()
    }

    /// One pattern frame at `position`, or `None` to fall back to a plain dissolve.
    ///
    /// `passthrough` holds the transition's `producer.*` entries.
    pub fn frame_at(
        &mut self,
        factory: &dyn ProducerFactory,
        profile: &Profile,
        resource: Option<&str>,
        passthrough: &Properties,
        position: Position,
    ) -> Option<Frame> {
        let producer = self.producer_for(factory, profile, resource)?;
        producer.properties_mut().pass(passthrough, PRODUCER_PREFIX);
        producer.seek(position);
        let mut wipe = producer.get_frame(0)?;
        wipe.properties_mut().set_int(DISTORT, 1);
        Some(wipe)
    }

    /// Close and drop the cached producer, if any.
    pub fn close(&mut self) {
        if let Some(mut p) = self.producer.take() {
            p.close();
        }
    }
}

impl Drop for PatternCache {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/pattern.rs"]
mod tests;
