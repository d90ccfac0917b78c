#[allow(clippy::module_inception)]
pub(crate) mod frame;
pub(crate) mod image;
pub(crate) mod source;
pub(crate) mod stack;
