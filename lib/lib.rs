pub(crate) mod util;

pub mod channel;
pub mod manifests;
pub mod repo;
pub mod result;
pub mod sources;
pub mod storage;
pub mod sync;
