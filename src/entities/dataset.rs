use serde::{Deserialize, Serialize};
use crate::entities::{Designer, Post, Team, Video, Year};
use crate::error::ShowcaseError;

/// Everything published for one exhibition year. Immutable once decoded.
#[derive(Serialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct Dataset {
    pub designers: Vec<Designer>,
    pub posts: Vec<Post>,
    pub videos: Vec<Video>,
    pub teams: Vec<Team>,
}

// Collections may be keyed in English or with the original Korean labels.
#[derive(Deserialize)]
struct RawDataset {
    #[serde(alias = "디자이너", default)]
    designers: Option<Vec<Designer>>,
    #[serde(alias = "포스트", default)]
    posts: Option<Vec<Post>>,
    #[serde(alias = "비디오", default)]
    videos: Option<Vec<Video>>,
    #[serde(alias = "팀", default)]
    teams: Option<Vec<Team>>,
    #[serde(flatten)]
    rest: serde_json::Map<String, serde_json::Value>,
}

impl Dataset {
    /// Decodes a per-year document, checking every record's shape.
    ///
    /// Absent or `null` collections become empty. A payload that is not an object, or that
    /// carries none of the four collections, is rejected as malformed.
    pub fn decode(year: Year, payload: &[u8]) -> Result<Dataset, ShowcaseError> {
        let malformed = |reason: String| ShowcaseError::MalformedDataset { year, reason };
        let raw: RawDataset = serde_json::from_slice(payload).map_err(|e| malformed(e.to_string()))?;
        let known_collections = [
            raw.designers.is_some(),
            raw.posts.is_some(),
            raw.videos.is_some(),
            raw.teams.is_some(),
        ];
        if !known_collections.iter().any(|x| *x) {
            let keys = raw.rest.keys().cloned().collect::<Vec<String>>();
            return Err(malformed(format!("no designers/posts/videos/teams collection (found keys: {:?})", keys)));
        }
        Ok(Dataset {
            designers: raw.designers.unwrap_or_default(),
            posts: raw.posts.unwrap_or_default(),
            videos: raw.videos.unwrap_or_default(),
            teams: raw.teams.unwrap_or_default(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.designers.is_empty() && self.posts.is_empty() && self.videos.is_empty() && self.teams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const YEAR: Year = Year::new(2025);

    #[test]
    fn test_decode_english_keys() {
        let payload = r#"{
            "designers": [{ "name": "김민지" }],
            "posts": [{ "id": "1", "designerName": "김민지", "postName": "졸업전시" }],
            "videos": [],
            "teams": []
        }"#;
        let dataset = Dataset::decode(YEAR, payload.as_bytes()).unwrap();
        assert_eq!(dataset.designers.len(), 1);
        assert_eq!(dataset.posts[0].post_name, "졸업전시");
        assert!(dataset.videos.is_empty());
    }

    #[test]
    fn test_decode_korean_keys_and_missing_collections() {
        let payload = r#"{ "디자이너": [{ "name": "김민지" }], "비디오": null }"#;
        let dataset = Dataset::decode(YEAR, payload.as_bytes()).unwrap();
        assert_eq!(dataset.designers[0].name, "김민지");
        assert!(dataset.posts.is_empty());
        assert!(dataset.videos.is_empty());
        assert!(dataset.teams.is_empty());
    }

    #[test]
    fn test_zero_designers_is_valid() {
        let dataset = Dataset::decode(YEAR, br#"{ "designers": [] }"#).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_malformed_payloads() {
        let cases: [&[u8]; 5] = [
            b"<html>not json</html>",
            b"[]",
            br#"{ "unrelated": [] }"#,
            br#"{ "designers": {} }"#,
            br#"{ "posts": [{ "id": "1" }] }"#,
        ];
        for payload in cases {
            let err = Dataset::decode(YEAR, payload).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Malformed, "payload: {}", String::from_utf8_lossy(payload));
        }
    }
}
