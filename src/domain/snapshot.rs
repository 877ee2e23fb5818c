use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::date_key::date_key_at;
use crate::domain::Node;

/// One fetched section: its identifier, the URL it came from and the
/// sanitized feed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionResult {
    pub section: String,
    pub url: String,
    #[serde(alias = "json")]
    pub document: Node,
}

/// A day's worth of section results, stored under a single date key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    pub source: String,
    pub sections: Vec<SectionResult>,
}

impl Snapshot {
    pub fn new(source: impl Into<String>, sections: Vec<SectionResult>) -> Self {
        Self {
            created_at: Utc::now(),
            source: source.into(),
            sections,
        }
    }

    /// Date key of the local calendar day the snapshot was created on.
    pub fn date_key(&self) -> String {
        date_key_at(&self.created_at)
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.section.as_str()).collect()
    }
}

/// `createdAt` as ISO-8601 with millisecond precision and a `Z` suffix.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} snapshot of {} sections at {}",
            self.source,
            self.sections.len(),
            self.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}
