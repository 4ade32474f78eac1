use std::path::{Path, PathBuf};

use tracing::{error, info, instrument};

use crate::{
    channel::Channel,
    manifests::{DEV_MANIFEST_FILE_NAME, PROD_MANIFEST_FILE_NAME},
    repo::RepoId,
    result::{SyncError, SyncResult},
    sources::ReleaseSource,
    storage::{DEFAULT_STATE_FILE, ProcessedReleases},
};

mod process;
mod update;

pub use self::process::ReleaseOutcome;

pub const DEFAULT_BASE_DIR: &str = "firmware";

/**
    Paths and identifiers used during a synchronization run.
*/
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub repo: RepoId,
    pub base_dir: PathBuf,
    pub state_file: PathBuf,
    pub dev_manifest: PathBuf,
    pub prod_manifest: PathBuf,
}

impl SyncOptions {
    /**
        Creates options for the given repository, using the default
        file names, relative to the given root directory.
    */
    #[must_use]
    pub fn in_dir(repo: RepoId, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            repo,
            base_dir: root.join(DEFAULT_BASE_DIR),
            state_file: root.join(DEFAULT_STATE_FILE),
            dev_manifest: root.join(DEV_MANIFEST_FILE_NAME),
            prod_manifest: root.join(PROD_MANIFEST_FILE_NAME),
        }
    }

    /**
        The directory that artifacts for the given channel are stored in.
    */
    #[must_use]
    pub fn channel_dir(&self, channel: Channel) -> PathBuf {
        self.base_dir.join(channel.dir_name())
    }

    /**
        The build manifest that tracks the version of the given channel.
    */
    #[must_use]
    pub fn manifest_path(&self, channel: Channel) -> &Path {
        match channel {
            Channel::Develop => &self.dev_manifest,
            Channel::Main => &self.prod_manifest,
        }
    }
}

/**
    Counts of what happened during a synchronization run.
*/
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    pub releases: usize,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub assets_downloaded: usize,
    pub assets_failed: usize,
    pub manifests_updated: bool,
}

impl SyncSummary {
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.processed > 0
    }
}

/**
    Synchronizes releases from a [`ReleaseSource`] into the local
    artifact directories, state file, and build manifests.
*/
#[derive(Debug, Clone)]
pub struct Synchronizer<S> {
    source: S,
    options: SyncOptions,
}

impl<S: ReleaseSource> Synchronizer<S> {
    pub fn new(source: S, options: SyncOptions) -> Self {
        Self { source, options }
    }

    #[must_use]
    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /**
        Runs a full synchronization:

        1. Fetches all releases from the source
        2. Processes each release in order, skipping already processed ones
        3. Updates the build manifests, if any release was newly processed

        Errors while processing a single release are logged and
        counted as failed, without stopping the remaining releases.
        If the state file can not be loaded, every release fails this
        way, since nothing can be checked for having been processed.

        # Errors

        - If the releases could not be fetched
        - If the build manifests could not be updated
    */
    #[instrument(skip(self), fields(repo = %self.options.repo), level = "debug")]
    pub async fn run(&self) -> SyncResult<SyncSummary> {
        let releases = self.source.list_releases(&self.options.repo).await?;
        info!("Found {} releases for {}", releases.len(), self.options.repo);

        let mut state = match ProcessedReleases::load(&self.options.state_file).await {
            Ok(state) => Some(state),
            Err(e) => {
                error!(
                    "Failed to load {}:\n{e}",
                    self.options.state_file.display()
                );
                None
            }
        };
        let mut summary = SyncSummary {
            releases: releases.len(),
            ..SyncSummary::default()
        };

        for release in &releases {
            let result = match state.as_mut() {
                Some(state) => self.process_release(release, state).await,
                None => Err(SyncError::StateUnavailable(self.options.state_file.clone())),
            };
            match result {
                Ok(ReleaseOutcome::Processed {
                    downloaded,
                    failed,
                }) => {
                    summary.processed += 1;
                    summary.assets_downloaded += downloaded;
                    summary.assets_failed += failed;
                }
                Ok(ReleaseOutcome::AlreadyProcessed) => summary.skipped += 1,
                Err(e) => {
                    error!(
                        "Error processing release {} (ID: {}):\n{e}",
                        release.label(),
                        release.id
                    );
                    summary.failed += 1;
                }
            }
        }

        if summary.has_changes() {
            info!("New releases were processed.");
            self.update_manifests().await?;
            summary.manifests_updated = true;
        } else {
            info!("No new releases to process.");
        }

        Ok(summary)
    }
}
