pub(crate) mod buffer;
pub(crate) mod gradient;
pub(crate) mod surface;
