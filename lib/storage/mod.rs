mod processed;

pub use self::processed::{DEFAULT_STATE_FILE, ProcessedRelease, ProcessedReleases};
