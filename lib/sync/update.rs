use tracing::{debug, info, instrument};

use crate::{
    channel::Channel,
    manifests::BuildManifest,
    result::SyncResult,
    sources::ReleaseSource,
    storage::ProcessedReleases,
};

use super::Synchronizer;

impl<S: ReleaseSource> Synchronizer<S> {
    /**
        Updates the `version` of both build manifests from the state file.

        For each channel, the name of the last entry of that channel in
        the state file becomes the version of the matching build manifest.
        Both manifests are rewritten, even if their version did not change.

        # Errors

        - If the state file or either build manifest could not be loaded
        - If either build manifest could not be saved
    */
    #[instrument(skip(self), level = "debug")]
    pub async fn update_manifests(&self) -> SyncResult<()> {
        let state = ProcessedReleases::load(&self.options.state_file).await?;
        let latest = state.latest_names();

        let mut manifests = Vec::new();
        for channel in Channel::all() {
            let path = self.options.manifest_path(channel);
            let mut manifest = BuildManifest::load(path).await?;
            if let Some(name) = latest.get(&channel) {
                let changed = manifest.set_version(name.as_str());
                debug!(%channel, version = %name, changed, "set manifest version");
            }
            manifests.push((path, manifest));
        }

        for (path, manifest) in &manifests {
            manifest.save(path).await?;
        }

        info!(
            "Build files updated: {} and {}",
            self.options.dev_manifest.display(),
            self.options.prod_manifest.display()
        );

        Ok(())
    }
}
