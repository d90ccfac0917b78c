pub(crate) mod luma;
pub(crate) mod pattern;
