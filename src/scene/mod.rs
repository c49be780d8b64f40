pub(crate) mod mask;
pub(crate) mod model;
pub(crate) mod modifier;
pub(crate) mod params;
pub(crate) mod preset;
pub(crate) mod surface;
