pub(crate) mod color;
pub(crate) mod primitive;
pub(crate) mod resolve;
