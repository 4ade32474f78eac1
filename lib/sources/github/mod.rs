#![allow(clippy::missing_errors_doc)]

use std::env::var;

use reqwest::{
    StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, LINK},
};
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::{repo::RepoId, result::SyncResult};

use super::{AssetDownload, ReleaseSource, client::create_client};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_TOKEN_VAR: &str = "GITHUB_TOKEN";

const RELEASES_PER_PAGE: &str = "100";

pub mod models;
mod result;

use self::models::{GithubAsset, GithubRelease};

pub use self::result::{GithubError, GithubResult};

/**
    Reads a GitHub access token from the given environment variable.

    Blank values are treated the same as a missing variable.
*/
pub fn token_from_env(var_name: &str) -> GithubResult<String> {
    match var(var_name) {
        Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(GithubError::MissingToken(var_name.to_string())),
    }
}

#[derive(Debug, Clone)]
pub struct GithubProvider {
    client: ClientWithMiddleware,
    base_url: Url,
}

impl GithubProvider {
    /**
        Creates a new authenticated GitHub provider instance with a token.

        Note that this does not verify the formatting or validity of the token,
        an invalid token will surface as an API error when listing releases.

        # Errors

        - If the GitHub API client could not be created.
    */
    pub fn new_authenticated(pat: impl AsRef<str>, base_url: Url) -> GithubResult<Self> {
        let pat = pat.as_ref().trim();
        let headers = {
            let mut headers = HeaderMap::new();
            headers.insert(
                HeaderName::from_static("x-github-api-version"),
                HeaderValue::from_static("2022-11-28"),
            );
            let mut token = HeaderValue::from_str(&format!("Bearer {pat}"))?;
            token.set_sensitive(true);
            headers.insert(AUTHORIZATION, token);
            headers
        };

        let client = create_client(headers)?;

        Ok(Self { client, base_url })
    }

    fn releases_url(&self, repo: &RepoId) -> GithubResult<Url> {
        // NOTE: A trailing slash is needed for join to keep any path prefix,
        // as used by GitHub Enterprise servers (`https://host/api/v3`)
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let mut url = base.join(&format!(
            "repos/{owner}/{name}/releases",
            owner = repo.owner(),
            name = repo.name(),
        ))?;
        url.query_pairs_mut()
            .append_pair("per_page", RELEASES_PER_PAGE);
        Ok(url)
    }

    async fn get_releases_page(
        &self,
        url: Url,
    ) -> GithubResult<(Vec<GithubRelease>, Option<Url>)> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        let next = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_next_link);
        let body = response.text().await?;

        Ok((parse_releases(status, &body)?, next))
    }

    /**
        Fetches all releases for the given repository, including drafts.

        Pages are followed using the `Link` header until no next page remains.
    */
    #[instrument(skip(self), fields(%repo), level = "debug")]
    pub async fn get_all_releases(&self, repo: &RepoId) -> GithubResult<Vec<GithubRelease>> {
        debug!(%repo, "fetching releases");

        let mut releases = Vec::new();
        let mut next = Some(self.releases_url(repo)?);
        while let Some(url) = next.take() {
            let (page, next_url) = self.get_releases_page(url).await?;
            debug!(count = page.len(), "fetched page of releases");
            releases.extend(page);
            next = next_url;
        }

        Ok(releases)
    }

    /**
        Downloads the contents of the given asset.

        Uses the API URL of the asset, not the browser download URL,
        so that assets of private repositories can be downloaded too.
    */
    #[instrument(skip(self, asset), fields(name = %asset.name), level = "debug")]
    pub async fn download_asset_contents(&self, asset: &GithubAsset) -> GithubResult<AssetDownload> {
        debug!(id = asset.id, name = %asset.name, "downloading asset contents");

        let response = self
            .client
            .get(asset.url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/octet-stream"))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            let bytes = response.bytes().await?;
            Ok(AssetDownload::Complete(bytes.to_vec()))
        } else {
            let body = response.text().await?;
            Ok(AssetDownload::Failed { status, body })
        }
    }
}

impl ReleaseSource for GithubProvider {
    async fn list_releases(&self, repo: &RepoId) -> SyncResult<Vec<GithubRelease>> {
        Ok(self.get_all_releases(repo).await?)
    }

    async fn download_asset(&self, asset: &GithubAsset) -> SyncResult<AssetDownload> {
        Ok(self.download_asset_contents(asset).await?)
    }
}

/**
    Parses a page of releases from a response body.

    The API answers with a list of releases on success, and with
    an object containing a `message` field on failure.
*/
fn parse_releases(status: StatusCode, body: &str) -> GithubResult<Vec<GithubRelease>> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Err(GithubError::UnexpectedFormat { status });
    };
    if value.is_array() {
        return serde_json::from_value(value).map_err(GithubError::MalformedReleases);
    }
    match value {
        Value::Object(map) => match map.get("message") {
            Some(Value::String(message)) => Err(GithubError::Api(message.clone())),
            Some(message) => Err(GithubError::Api(message.to_string())),
            None => Err(GithubError::UnexpectedFormat { status }),
        },
        _ => Err(GithubError::UnexpectedFormat { status }),
    }
}

/**
    Extracts the `rel="next"` URL from a `Link` header, if any.

    Example header:

    `<https://api.github.com/repositories/1/releases?page=2>; rel="next", <...>; rel="last"`
*/
fn parse_next_link(header: &str) -> Option<Url> {
    header.split(',').find_map(|part| {
        let mut segments = part.split(';');
        let target = segments.next()?.trim();
        let is_next = segments.any(|param| {
            let param = param.trim().replace(' ', "");
            param == "rel=\"next\"" || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        Url::parse(target).ok()
    })
}
