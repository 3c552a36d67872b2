// Content-addressed render cache

mod inflight;
mod key;
mod store;

pub use inflight::InflightGuards;
pub use key::{fingerprint, Fingerprint};
pub use store::FsArtifactStore;
