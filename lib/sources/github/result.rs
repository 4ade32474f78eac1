use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error(
        "environment variable '{0}' is not set\
        \nIt must contain a GitHub access token with read access to the repository."
    )]
    MissingToken(String),
    #[error("API returned an error: {0}")]
    Api(String),
    #[error("unexpected response format (status {status}) - expected a list of releases")]
    UnexpectedFormat { status: reqwest::StatusCode },
    #[error("malformed release list: {0}")]
    MalformedReleases(#[source] serde_json::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to build client - invalid header value: {0}")]
    ReqwestHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("request error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),
}

pub type GithubResult<T> = Result<T, GithubError>;
