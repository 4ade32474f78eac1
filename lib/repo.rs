use std::{fmt, str::FromStr};

use thiserror::Error;

/**
    Error type representing the possible errors that can occur when parsing a `RepoId`.
*/
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoIdParseError {
    #[error("repository id is empty")]
    Empty,
    #[error("missing '/' separator")]
    MissingSeparator,
    #[error("owner '{0}' is empty or invalid")]
    InvalidOwner(String),
    #[error("name '{0}' is empty or invalid")]
    InvalidName(String),
}

/**
    A repository identifier, which includes the owner and name of a repository.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn is_invalid_identifier(s: &str) -> bool {
    s.is_empty() // Must not be empty
        || s.chars().any(char::is_whitespace) // Must not contain whitespace
        || s.chars().any(|c| c == '/') // Must not contain the separator character
}

impl FromStr for RepoId {
    type Err = RepoIdParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RepoIdParseError::Empty);
        }

        let Some((before, after)) = s.split_once('/') else {
            return Err(RepoIdParseError::MissingSeparator);
        };

        let before = before.trim();
        let after = after.trim();

        if is_invalid_identifier(before) {
            return Err(RepoIdParseError::InvalidOwner(before.to_string()));
        }
        if is_invalid_identifier(after) {
            return Err(RepoIdParseError::InvalidName(after.to_string()));
        }

        Ok(Self {
            owner: before.to_string(),
            name: after.to_string(),
        })
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_id(owner: &str, name: &str) -> RepoId {
        RepoId {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn parse_valid_basic() {
        assert_eq!("a/b".parse::<RepoId>().unwrap(), new_id("a", "b"));
        assert_eq!(
            "arribada/geoseals-app-zephyr".parse::<RepoId>().unwrap(),
            new_id("arribada", "geoseals-app-zephyr")
        );
    }

    #[test]
    fn parse_valid_extra_whitespace() {
        // Surrounding whitespace should be trimmed and ok
        let id = new_id("a", "b");
        assert_eq!(" a/b".parse::<RepoId>().unwrap(), id);
        assert_eq!("a/b ".parse::<RepoId>().unwrap(), id);
        assert_eq!("a /b".parse::<RepoId>().unwrap(), id);
        assert_eq!("a/ b".parse::<RepoId>().unwrap(), id);
    }

    #[test]
    fn parse_invalid() {
        assert_eq!("".parse::<RepoId>(), Err(RepoIdParseError::Empty));
        assert_eq!("   ".parse::<RepoId>(), Err(RepoIdParseError::Empty));
        assert_eq!(
            "ab".parse::<RepoId>(),
            Err(RepoIdParseError::MissingSeparator)
        );
        assert_eq!(
            "/b".parse::<RepoId>(),
            Err(RepoIdParseError::InvalidOwner(String::new()))
        );
        assert_eq!(
            "a/".parse::<RepoId>(),
            Err(RepoIdParseError::InvalidName(String::new()))
        );
        assert_eq!(
            "a/b/c".parse::<RepoId>(),
            Err(RepoIdParseError::InvalidName("b/c".to_string()))
        );
        assert_eq!(
            "a b/c".parse::<RepoId>(),
            Err(RepoIdParseError::InvalidOwner("a b".to_string()))
        );
    }

    #[test]
    fn display_roundtrip() {
        let id = new_id("arribada", "geoseals-app-zephyr");
        assert_eq!(id.to_string(), "arribada/geoseals-app-zephyr");
    }
}
