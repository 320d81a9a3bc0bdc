pub(crate) mod join;
pub(crate) mod source;
