use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing::info;
use url::Url;

use firmware_sync::{
    manifests::{DEV_MANIFEST_FILE_NAME, PROD_MANIFEST_FILE_NAME},
    repo::RepoId,
    sources::github::{DEFAULT_BASE_URL, DEFAULT_TOKEN_VAR, GithubProvider, token_from_env},
    storage::DEFAULT_STATE_FILE,
    sync::{DEFAULT_BASE_DIR, SyncOptions, SyncSummary, Synchronizer},
};

const DEFAULT_REPO: &str = "arribada/geoseals-app-zephyr";

/// Downloads new GitHub release artifacts into channel
/// directories and updates the matching build manifests.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Cli {
    /// The repository to synchronize releases from, as `owner/name`.
    #[clap(long, default_value = DEFAULT_REPO)]
    pub repo: RepoId,
    /// The directory that `develop` and `main` artifact directories are created in.
    #[clap(long, default_value = DEFAULT_BASE_DIR)]
    pub base_dir: PathBuf,
    /// The file tracking which releases have already been processed.
    #[clap(long, default_value = DEFAULT_STATE_FILE)]
    pub state_file: PathBuf,
    /// The build manifest tracking the version of draft releases.
    #[clap(long, default_value = DEV_MANIFEST_FILE_NAME)]
    pub dev_manifest: PathBuf,
    /// The build manifest tracking the version of published releases.
    #[clap(long, default_value = PROD_MANIFEST_FILE_NAME)]
    pub prod_manifest: PathBuf,
    /// The base URL of the GitHub API.
    #[clap(long, default_value = DEFAULT_BASE_URL)]
    pub api_url: Url,
    /// The environment variable to read the GitHub access token from.
    #[clap(long, default_value = DEFAULT_TOKEN_VAR)]
    pub token_var: String,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // NOTE: The token must be checked before anything touches the network
        let token = token_from_env(&self.token_var)?;
        let provider = GithubProvider::new_authenticated(token, self.api_url)
            .context("Failed to create GitHub API client")?;

        let options = SyncOptions {
            repo: self.repo,
            base_dir: self.base_dir,
            state_file: self.state_file,
            dev_manifest: self.dev_manifest,
            prod_manifest: self.prod_manifest,
        };

        let sync = Synchronizer::new(provider, options);
        let summary = sync.run().await?;

        info!("{}", format_summary(&sync.options().repo, &summary));

        Ok(())
    }
}

fn format_summary(repo: &RepoId, summary: &SyncSummary) -> String {
    let styled_repo = style(repo).bold().white();
    let mut message = format!(
        "{} Synchronized {styled_repo}: {} releases, {} new, {} already processed",
        style("✓").green(),
        summary.releases,
        summary.processed,
        summary.skipped,
    );
    if summary.failed > 0 {
        message.push_str(&format!(
            ", {}",
            style(format!("{} failed", summary.failed)).bold().red()
        ));
    }
    if summary.processed > 0 {
        message.push_str(&format!(
            "\n  {} assets downloaded, {} skipped",
            summary.assets_downloaded, summary.assets_failed
        ));
    }
    message
}
