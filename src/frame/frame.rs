use std::{
    any::Any,
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{
    config::properties::Properties,
    foundation::{
        core::Position,
        error::{LumaError, LumaResult},
    },
    frame::{
        image::{Image, ImageRequest},
        source::ImageSource,
        stack::{GetImageFn, ServiceRef, SharedFrame, StackItem},
    },
};

/// Property marking a frame as resizable without preserving aspect ratio.
pub const DISTORT: &str = "distort";

/// One image at one timeline position, with the deferred work needed to produce it.
///
/// The first successful [`Frame::get_image`] unwinds the stack; later pulls return the
/// memoized image.
pub struct Frame {
    position: Position,
    producer_range: Option<(Position, Position)>,
    properties: Properties,
    stack: Vec<StackItem>,
    source: Option<Box<dyn ImageSource>>,
    attachments: HashMap<String, Box<dyn Any + Send>>,
    image: Option<Image>,
    depth: u32,
}

impl Frame {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            producer_range: None,
            properties: Properties::new(),
            stack: Vec::new(),
            source: None,
            attachments: HashMap::new(),
            image: None,
            depth: 0,
        }
    }

    pub fn with_source(position: Position, source: impl ImageSource + 'static) -> Self {
        let mut frame = Self::new(position);
        frame.source = Some(Box::new(source));
        frame
    }

    pub fn into_shared(self) -> SharedFrame {
        Arc::new(Mutex::new(self))
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// `(in, out)` of the producer this frame came from.
    pub fn producer_range(&self) -> Option<(Position, Position)> {
        self.producer_range
    }

    pub fn set_producer_range(&mut self, in_point: Position, out_point: Position) {
        self.producer_range = Some((in_point, out_point));
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    pub fn is_distort(&self) -> bool {
        self.properties.get_int(DISTORT) != 0
    }

    pub fn push(&mut self, item: StackItem) {
        self.stack.push(item);
    }

    /// Push `frame`, or the empty placeholder when there is none.
    pub fn push_frame(&mut self, frame: Option<SharedFrame>) {
        self.push(frame.map_or(StackItem::Empty, StackItem::Frame));
    }

    pub fn push_service(&mut self, service: ServiceRef) {
        self.push(StackItem::Service(service));
    }

    pub fn push_get_image(&mut self, callback: GetImageFn) {
        self.push(StackItem::GetImage(callback));
    }

    pub fn pop(&mut self) -> Option<StackItem> {
        self.stack.pop()
    }

    /// Pop a staged frame; the empty placeholder yields `Ok(None)`.
    pub fn pop_frame(&mut self) -> LumaResult<Option<SharedFrame>> {
        match self.stack.pop() {
            Some(StackItem::Frame(f)) => Ok(Some(f)),
            Some(StackItem::Empty) => Ok(None),
            Some(other) => Err(LumaError::stack(format!(
                "expected a frame, found {}",
                other.kind()
            ))),
            None => Err(LumaError::stack("expected a frame, stack is empty")),
        }
    }

    pub fn pop_service(&mut self) -> LumaResult<ServiceRef> {
        match self.stack.pop() {
            Some(StackItem::Service(s)) => Ok(s),
            Some(other) => Err(LumaError::stack(format!(
                "expected a service, found {}",
                other.kind()
            ))),
            None => Err(LumaError::stack("expected a service, stack is empty")),
        }
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Attach `value` under `name`; it is dropped with the frame. Replaces any previous
    /// value under the same name.
    pub fn attach<T: Any + Send>(&mut self, name: impl Into<String>, value: T) {
        self.attachments.insert(name.into(), Box::new(value));
    }

    pub fn attachment<T: Any>(&self, name: &str) -> Option<&T> {
        self.attachments.get(name)?.downcast_ref()
    }

    /// The attachment under `name`, inserting `T::default()` first when absent.
    /// `None` when a value of another type already holds the name.
    pub fn attachment_or_default<T: Any + Send + Default>(&mut self, name: &str) -> Option<&mut T> {
        self.attachments
            .entry(name.to_string())
            .or_insert_with(|| Box::new(T::default()))
            .downcast_mut()
    }

    pub fn detach(&mut self, name: &str) -> bool {
        self.attachments.remove(name).is_some()
    }

    /// The memoized result of the first successful pull.
    pub fn cached_image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    /// Produce this frame's image.
    ///
    /// Called from inside a stack callback, this continues unwinding the same stack
    /// below that callback, reaching the base source once no callbacks remain. A failed
    /// pull restores the stack, so nothing staged is skipped on the next attempt.
    pub fn get_image(&mut self, request: &ImageRequest) -> LumaResult<Image> {
        if self.depth == 0
            && let Some(image) = &self.image
        {
            return Ok(if request.writable {
                image.to_owned_pixels()
            } else {
                image.clone()
            });
        }

        self.depth += 1;
        let result = self.unwind(request);
        self.depth -= 1;

        if self.depth == 0
            && let Ok(image) = &result
        {
            self.image = Some(image.clone());
        }
        result
    }

    fn unwind(&mut self, request: &ImageRequest) -> LumaResult<Image> {
        match self.stack.pop() {
            Some(StackItem::GetImage(callback)) => {
                let staged = self.stack.clone();
                let result = callback(self, request);
                // Restore what the callback popped.
                if result.is_err() {
                    self.stack = staged;
                    self.stack.push(StackItem::GetImage(callback));
                }
                result
            }
            Some(other) => {
                let kind = other.kind();
                self.stack.push(other);
                Err(LumaError::stack(format!(
                    "expected a get_image callback, found {kind}"
                )))
            }
            None => match self.source.as_mut() {
                Some(source) => source.get_image(request),
                None => Err(LumaError::acquisition(format!(
                    "frame at {} has no image source",
                    self.position
                ))),
            },
        }
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("position", &self.position)
            .field("stack", &self.stack)
            .field("properties", &self.properties)
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/frame.rs"]
mod tests;
