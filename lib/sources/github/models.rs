use serde::Deserialize;
use url::Url;

use crate::channel::Channel;

#[derive(Debug, Clone, Deserialize)]
pub struct GithubRelease {
    pub id: u64,
    pub tag_name: Option<String>,
    #[serde(rename = "name")]
    pub title: Option<String>,
    pub draft: bool,
    #[serde(default)]
    pub assets: Vec<GithubAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubAsset {
    pub id: u64,
    pub url: Url,
    pub name: String,
}

fn non_empty(s: Option<&String>) -> Option<&str> {
    s.map(String::as_str).filter(|s| !s.trim().is_empty())
}

impl GithubRelease {
    #[must_use]
    pub fn channel(&self) -> Channel {
        Channel::from_draft(self.draft)
    }

    /**
        The name recorded for this release once processed, and
        written as the version of the matching build manifest.

        - Draft releases use their title, falling back to the tag name
        - Published releases use their tag name
        - If neither is available, a synthetic `draft-<id>` name is used
    */
    #[must_use]
    pub fn display_name(&self) -> String {
        let tag = non_empty(self.tag_name.as_ref());
        let preferred = if self.draft {
            non_empty(self.title.as_ref()).or(tag)
        } else {
            tag
        };
        match preferred {
            Some(name) => name.to_string(),
            None => format!("draft-{}", self.id),
        }
    }

    /**
        A human-readable label for logging, which is the title if present.
    */
    #[must_use]
    pub fn label(&self) -> String {
        non_empty(self.title.as_ref())
            .unwrap_or("<untitled>")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn release(id: u64, tag: Option<&str>, title: Option<&str>, draft: bool) -> GithubRelease {
        serde_json::from_value(json!({
            "id": id,
            "tag_name": tag,
            "name": title,
            "draft": draft,
            "assets": [],
        }))
        .unwrap()
    }

    #[test]
    fn published_uses_tag() {
        let r = release(1, Some("v1.2.0"), Some("Release 1.2"), false);
        assert_eq!(r.display_name(), "v1.2.0");
        assert_eq!(r.channel(), Channel::Main);
    }

    #[test]
    fn published_without_tag_is_synthetic() {
        assert_eq!(release(7, None, Some("x"), false).display_name(), "draft-7");
        assert_eq!(release(8, Some(""), None, false).display_name(), "draft-8");
    }

    #[test]
    fn draft_uses_title() {
        let r = release(3, Some("v2.0.0-rc1"), Some("Nightly build"), true);
        assert_eq!(r.display_name(), "Nightly build");
        assert_eq!(r.channel(), Channel::Develop);
    }

    #[test]
    fn draft_without_title_falls_back() {
        assert_eq!(release(4, Some("v2.0.0"), None, true).display_name(), "v2.0.0");
        assert_eq!(release(5, None, Some("  "), true).display_name(), "draft-5");
    }

    #[test]
    fn deserialize_api_release() {
        let r: GithubRelease = serde_json::from_value(json!({
            "id": 42,
            "tag_name": "v0.1.0",
            "name": "First",
            "draft": false,
            "prerelease": false,
            "assets": [{
                "id": 99,
                "url": "https://api.github.com/repos/o/r/releases/assets/99",
                "browser_download_url": "https://github.com/o/r/releases/download/v0.1.0/fw.bin",
                "name": "fw.bin",
                "size": 1024,
            }],
        }))
        .unwrap();
        assert_eq!(r.assets.len(), 1);
        assert_eq!(r.assets[0].name, "fw.bin");
        assert_eq!(
            r.assets[0].url.as_str(),
            "https://api.github.com/repos/o/r/releases/assets/99"
        );
        assert_eq!(r.label(), "First");
    }
}
