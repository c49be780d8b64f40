pub(crate) mod executor;
pub(crate) mod owner;
pub(crate) mod pool;
pub(crate) mod port;
pub(crate) mod recording;
