use std::{
    any::Any,
    sync::{Arc, Mutex},
};

use crate::{
    foundation::error::LumaResult,
    frame::{
        frame::Frame,
        image::{Image, ImageRequest},
    },
};

/// A frame shared between a deferred stack, attachments and effect bindings.
pub type SharedFrame = Arc<Mutex<Frame>>;

/// Opaque service identity staged on a frame. Callbacks downcast it back to the
/// concrete service that pushed it.
pub type ServiceRef = Arc<dyn Any + Send + Sync>;

/// Deferred image callback. It runs after being popped and is expected to pop the
/// values staged beneath it.
pub type GetImageFn = fn(&mut Frame, &ImageRequest) -> LumaResult<Image>;

/// One value on a frame's deferred-evaluation stack.
#[derive(Clone)]
pub enum StackItem {
    Frame(SharedFrame),
    /// Explicit "no frame" placeholder, so pops stay aligned.
    Empty,
    Service(ServiceRef),
    GetImage(GetImageFn),
}

impl StackItem {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Frame(_) => "frame",
            Self::Empty => "empty",
            Self::Service(_) => "service",
            Self::GetImage(_) => "get_image",
        }
    }
}

impl std::fmt::Debug for StackItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}
