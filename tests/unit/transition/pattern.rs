use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use super::*;
use crate::{
    foundation::core::Fps,
    frame::source::StillSource,
};

#[derive(Default)]
struct Counters {
    built: AtomicUsize,
    closed: AtomicUsize,
}

struct MockProducer {
    resource: String,
    properties: Properties,
    position: Position,
    counters: Arc<Counters>,
    yields: bool,
}

impl Producer for MockProducer {
    fn resource(&self) -> &str {
        &self.resource
    }
    fn properties(&self) -> &Properties {
        &self.properties
    }
    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
    fn seek(&mut self, position: Position) {
        self.position = position;
    }
    fn position(&self) -> Position {
        self.position
    }
    fn get_frame(&mut self, _track: usize) -> Option<Frame> {
        self.yields
            .then(|| Frame::with_source(self.position, StillSource::solid(1, 1, [0, 0, 0, 255])))
    }
    fn close(&mut self) {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
    }
}

struct MockFactory {
    counters: Arc<Counters>,
}

impl ProducerFactory for MockFactory {
    fn create(&self, _profile: &Profile, resource: &str) -> Option<Box<dyn Producer>> {
        if resource == "unreadable" {
            return None;
        }
        self.counters.built.fetch_add(1, Ordering::SeqCst);
        Some(Box::new(MockProducer {
            resource: resource.to_string(),
            properties: Properties::new(),
            position: 0,
            counters: self.counters.clone(),
            yields: resource != "blank",
        }))
    }
}

fn setup() -> (MockFactory, Arc<Counters>, Profile) {
    let counters = Arc::new(Counters::default());
    let factory = MockFactory {
        counters: counters.clone(),
    };
    let profile = Profile::new(4, 4, Fps::new(25, 1).unwrap()).unwrap();
    (factory, counters, profile)
}

#[test]
fn unchanged_resource_reuses_the_producer() {
    let (factory, counters, profile) = setup();
    let mut cache = PatternCache::new();
    let props = Properties::new();

    assert!(cache.frame_at(&factory, &profile, Some("a.pgm"), &props, 0).is_some());
    assert!(cache.frame_at(&factory, &profile, Some("a.pgm"), &props, 1).is_some());
    assert_eq!(counters.built.load(Ordering::SeqCst), 1);
    assert_eq!(counters.closed.load(Ordering::SeqCst), 0);
}

#[test]
fn changed_resource_replaces_and_closes_once() {
    let (factory, counters, profile) = setup();
    let mut cache = PatternCache::new();
    let props = Properties::new();

    cache.frame_at(&factory, &profile, Some("a.pgm"), &props, 0);
    cache.frame_at(&factory, &profile, Some("b.pgm"), &props, 0);
    cache.frame_at(&factory, &profile, Some("b.pgm"), &props, 1);
    assert_eq!(counters.built.load(Ordering::SeqCst), 2);
    assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    assert_eq!(cache.last_resource(), Some("b.pgm"));

    drop(cache);
    assert_eq!(counters.closed.load(Ordering::SeqCst), 2);
}

#[test]
fn empty_or_absent_resource_yields_no_pattern() {
    let (factory, counters, profile) = setup();
    let mut cache = PatternCache::new();
    let props = Properties::new();

    assert!(cache.frame_at(&factory, &profile, None, &props, 0).is_none());
    assert!(cache.frame_at(&factory, &profile, Some(""), &props, 0).is_none());
    assert_eq!(counters.built.load(Ordering::SeqCst), 0);
    assert!(!cache.has_producer());
}

#[test]
fn failed_construction_retries_on_next_call() {
    let (factory, _counters, profile) = setup();
    let mut cache = PatternCache::new();
    let props = Properties::new();

    assert!(cache.frame_at(&factory, &profile, Some("unreadable"), &props, 0).is_none());
    assert_eq!(cache.last_resource(), Some("unreadable"));
    assert!(!cache.has_producer());
    assert!(cache.frame_at(&factory, &profile, Some("unreadable"), &props, 0).is_none());
}

#[test]
fn producer_without_frame_degrades_to_none() {
    let (factory, counters, profile) = setup();
    let mut cache = PatternCache::new();
    assert!(
        cache
            .frame_at(&factory, &profile, Some("blank"), &Properties::new(), 3)
            .is_none()
    );
    assert!(cache.has_producer());
    assert_eq!(counters.built.load(Ordering::SeqCst), 1);
}

#[test]
fn pattern_frames_are_distorted_seeked_and_configured() {
    let (factory, _counters, profile) = setup();
    let mut cache = PatternCache::new();
    let mut props = Properties::new();
    props.set_string("producer.length", "50");
    props.set_string("softness", "0.2");

    let wipe = cache
        .frame_at(&factory, &profile, Some("a.pgm"), &props, 12)
        .unwrap();
    assert!(wipe.is_distort());
    assert_eq!(wipe.position(), 12);

    let producer = cache
        .producer_for(&factory, &profile, Some("a.pgm"))
        .unwrap();
    assert_eq!(producer.properties().get_int("length"), 50);
    assert!(!producer.properties().contains("softness"));
    assert_eq!(producer.eof(), EofMode::Loop);
}
