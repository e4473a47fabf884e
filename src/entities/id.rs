use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Exhibition year; every dataset and comment feed is partitioned by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Year(u16);

impl Year {
    pub const fn new(year: u16) -> Self {
        Self(year)
    }

    pub fn value(&self) -> u16 {
        self.0
    }

    /// Parses a raw year parameter, falling back to `default` when it is absent or unparseable.
    pub fn parse_or(raw: Option<&str>, default: Year) -> Year {
        raw.and_then(|x| x.trim().parse().ok()).unwrap_or(default)
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Year {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u16>().map(Year)
    }
}

/// Record id compared by its string form: the source documents mix `"7"` and `7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct EntityId(String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = match RawId::deserialize(deserializer)? {
            RawId::Text(x) => x,
            RawId::Unsigned(x) => x.to_string(),
            RawId::Signed(x) => x.to_string(),
            RawId::Float(x) => x.to_string(),
        };
        Ok(Self(id))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accepts either a single string or a list of strings and always yields a list.
pub fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let values = match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(x) => vec![x],
        OneOrMany::Many(x) => x,
    };
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_parse_or() {
        let default = Year::new(2025);
        assert_eq!(Year::parse_or(Some("2023"), default), Year::new(2023));
        assert_eq!(Year::parse_or(Some(" 2023 "), default), Year::new(2023));
        assert_eq!(Year::parse_or(Some("twenty"), default), default);
        assert_eq!(Year::parse_or(Some(""), default), default);
        assert_eq!(Year::parse_or(None, default), default);
    }

    #[test]
    fn test_entity_id_accepts_numbers_and_strings() {
        let ids: Vec<EntityId> = serde_json::from_str(r#"["7", 7, 7.0, -3]"#).unwrap();
        assert!(ids[0].matches("7"));
        assert!(ids[1].matches("7"));
        assert!(ids[2].matches("7"));
        assert!(ids[3].matches("-3"));
        assert_eq!(serde_json::to_string(&ids[1]).unwrap(), "\"7\"");
    }

    #[test]
    fn test_one_or_many() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(deserialize_with = "one_or_many")]
            names: Vec<String>,
        }
        let one: Holder = serde_json::from_str(r#"{"names": "김민지"}"#).unwrap();
        assert_eq!(one.names, vec!["김민지"]);
        let many: Holder = serde_json::from_str(r#"{"names": ["김민지", "이영희"]}"#).unwrap();
        assert_eq!(many.names, vec!["김민지", "이영희"]);
    }
}
