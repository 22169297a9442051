use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static::lazy_static! {
    // Hyphenated form first so a UUID is never read as its leading 32 characters.
    static ref DOCUMENT_ID_REGEX: Regex = Regex::new(
        r"[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12}|[a-fA-F0-9]{32}"
    ).expect("Failed to compile document ID regex - this is a bug in the code");
}

/// Identifier of a Notion page.
///
/// Stored as 32 lowercase hex characters. Notion accepts either that form
/// or the hyphenated UUID form; [`DocumentId::to_hyphenated`] produces the
/// latter for API calls and output records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Finds a page identifier anywhere in a URL or raw string.
    ///
    /// The first 32-hex run or hyphenated UUID wins. Query strings such as
    /// `?v=<view id>` come after the page segment in Notion URLs, so the
    /// leftmost match is the page.
    pub fn extract(reference: &str) -> Result<Self, ValidationError> {
        let found = DOCUMENT_ID_REGEX.find(reference).ok_or_else(|| {
            ValidationError::InvalidId(format!("No page ID found in: {}", reference))
        })?;
        Ok(Self(found.as_str().replace('-', "").to_ascii_lowercase()))
    }

    /// Returns the canonical non-hyphenated ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the hyphenated UUID format for API compatibility.
    pub fn to_hyphenated(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            &self.0[0..8],
            &self.0[8..12],
            &self.0[12..16],
            &self.0[16..20],
            &self.0[20..32]
        )
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::extract(s)
    }
}

impl Serialize for DocumentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_hyphenated().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DocumentId::extract(&s).map_err(serde::de::Error::custom)
    }
}

/// Identifier of a block as Notion reports it.
///
/// Block IDs come straight from API responses and are passed back
/// verbatim, so no normalization happens here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "550e8400e29b41d4a716446655440000";

    #[test]
    fn extracts_from_page_urls() {
        let id = DocumentId::extract(
            "https://www.notion.so/acme/Test-Page-550e8400e29b41d4a716446655440000",
        )
        .unwrap();
        assert_eq!(id.as_str(), HEX);

        let id = DocumentId::extract("https://notion.so/550E8400E29B41D4A716446655440000?pvs=4")
            .unwrap();
        assert_eq!(id.as_str(), HEX);
    }

    #[test]
    fn extracts_hyphenated_uuid_anywhere() {
        let id = DocumentId::extract("id=550e8400-e29b-41d4-a716-446655440000&x=1").unwrap();
        assert_eq!(id.as_str(), HEX);
        assert_eq!(id.to_hyphenated(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn leftmost_id_wins_over_view_id() {
        let id = DocumentId::extract(
            "https://www.notion.so/550e8400e29b41d4a716446655440000?v=ffffffffffffffffffffffffffffffff",
        )
        .unwrap();
        assert_eq!(id.as_str(), HEX);
    }

    #[test]
    fn rejects_references_without_an_id() {
        assert!(DocumentId::extract("https://www.notion.so/some-page").is_err());
        assert!(DocumentId::extract("").is_err());
        assert!(DocumentId::extract("550e8400e29b41d4a71644665544000").is_err());
    }

    #[test]
    fn serializes_hyphenated() {
        let id = DocumentId::extract(HEX).unwrap();
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"550e8400-e29b-41d4-a716-446655440000\""
        );
    }
}
