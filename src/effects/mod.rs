pub(crate) mod chain;
pub(crate) mod cpu;
pub(crate) mod params;
