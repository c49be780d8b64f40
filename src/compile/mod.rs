pub(crate) mod builder;
pub(crate) mod graph;
pub(crate) mod spec;
pub(crate) mod targeting;
