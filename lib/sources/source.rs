use std::future::Future;

use reqwest::StatusCode;

use crate::{repo::RepoId, result::SyncResult};

use super::{GithubAsset, GithubRelease};

/**
    The result of downloading a single release asset.

    A failed download is not an error - the status and
    response body are kept so that they can be reported.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetDownload {
    Complete(Vec<u8>),
    Failed { status: StatusCode, body: String },
}

/**
    A source of releases and their assets.

    Implemented by [`GithubProvider`](super::github::GithubProvider).
*/
pub trait ReleaseSource {
    /**
        Fetches all releases for the given repository, including drafts,
        in the order they are delivered by the source.
    */
    fn list_releases(&self, repo: &RepoId) -> impl Future<Output = SyncResult<Vec<GithubRelease>>>;

    /**
        Downloads the raw contents of the given asset.
    */
    fn download_asset(&self, asset: &GithubAsset) -> impl Future<Output = SyncResult<AssetDownload>>;
}
