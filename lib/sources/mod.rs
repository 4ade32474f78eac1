mod client;
mod source;

pub mod github;

pub use self::github::models::{GithubAsset, GithubRelease};
pub use self::source::{AssetDownload, ReleaseSource};
