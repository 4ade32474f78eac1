use std::{ffi::OsStr, path::Path};

use tracing::{info, instrument, warn};

use crate::{
    result::SyncResult,
    sources::{AssetDownload, GithubRelease, ReleaseSource},
    storage::{ProcessedRelease, ProcessedReleases},
    util::fs::{ensure_dir, write_file},
};

use super::Synchronizer;

/**
    The outcome of processing a single release.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The release was processed and recorded in the state file.
    Processed { downloaded: usize, failed: usize },
    /// The release was already recorded in the state file and nothing was done.
    AlreadyProcessed,
}

/**
    Checks that an asset name can be written into a channel
    directory without escaping it or replacing the directory.
*/
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|n| n == OsStr::new(name))
}

impl<S: ReleaseSource> Synchronizer<S> {
    /**
        Processes a single release:

        1. Skips it if it is already present in the given state
        2. Downloads all of its assets into the directory for its channel
        3. Records it in the state and saves the state file

        A failed asset download is logged and skipped, and
        does not prevent the release from being recorded.

        # Errors

        - If the channel directory could not be created
        - If an asset request could not be sent, or its contents not written
        - If the state file could not be saved
    */
    #[instrument(skip(self, release, state), fields(id = release.id), level = "debug")]
    pub async fn process_release(
        &self,
        release: &GithubRelease,
        state: &mut ProcessedReleases,
    ) -> SyncResult<ReleaseOutcome> {
        info!(
            "Processing release: {} (ID: {})",
            release.label(),
            release.id
        );

        let display_name = release.display_name();
        if state.contains(release.id) {
            info!("Release {display_name} already processed.");
            return Ok(ReleaseOutcome::AlreadyProcessed);
        }

        let target_dir = self.options.channel_dir(release.channel());
        ensure_dir(&target_dir).await?;

        let mut downloaded = 0;
        let mut failed = 0;

        if release.assets.is_empty() {
            info!("No assets found for release {display_name}");
        }

        for asset in &release.assets {
            if !is_plain_file_name(&asset.name) {
                warn!(
                    "Skipping asset with invalid name '{}' - must be a plain file name",
                    asset.name
                );
                failed += 1;
                continue;
            }

            info!("Downloading asset: {}", asset.name);
            match self.source.download_asset(asset).await? {
                AssetDownload::Complete(contents) => {
                    let asset_path = target_dir.join(&asset.name);
                    write_file(&asset_path, &contents).await?;
                    info!(
                        "Downloaded asset: {} to {} ({} bytes)",
                        asset.name,
                        target_dir.display(),
                        contents.len()
                    );
                    downloaded += 1;
                }
                AssetDownload::Failed { status, body } => {
                    warn!(
                        "Failed to download {}. Status code: {}\nResponse: {body}",
                        asset.name,
                        status.as_u16()
                    );
                    failed += 1;
                }
            }
        }

        let entry = ProcessedRelease::new(display_name, release.draft);
        state.insert(release.id, &entry);
        if let Err(e) = state.save(&self.options.state_file).await {
            // The release was not persisted, so it must not count as processed
            state.remove(release.id);
            return Err(e);
        }

        Ok(ReleaseOutcome::Processed { downloaded, failed })
    }
}
