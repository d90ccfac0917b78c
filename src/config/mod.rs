pub(crate) mod anim;
pub(crate) mod properties;
pub(crate) mod transition;
