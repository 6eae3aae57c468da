use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize};

use crate::AlphabetRules;

/// Project settings shipped with every release as `<project>.meta.json.xz`.
///
/// Decoding is strict: a field this struct does not know fails the whole
/// release, while a missing field takes its zero value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseMetadata {
    pub name: String,
    /// Minimum tracker library version.
    pub min_version: i64,
    /// Minimum pipeline version.
    pub min_client_version: i64,
    /// Characters a generated shortcode is drawn from.
    pub alphabet: String,
    pub url_template: String,
    /// Seconds between requests.
    pub request_delay: f64,
    /// Status code lists; `null` reads as empty.
    #[serde(deserialize_with = "null_as_empty")]
    pub redirect_codes: Vec<u16>,
    #[serde(deserialize_with = "null_as_empty")]
    pub no_redirect_codes: Vec<u16>,
    #[serde(deserialize_with = "null_as_empty")]
    pub unavailable_codes: Vec<u16>,
    #[serde(deserialize_with = "null_as_empty")]
    pub banned_codes: Vec<u16>,
    pub body_regex: Option<String>,
    pub location_anti_regex: Option<String>,
    /// HTTP method, e.g. `head`.
    pub method: String,
    pub enabled: bool,
    pub autoqueue: bool,
    pub num_count_per_item: i64,
    pub max_num_items: i64,
    pub lower_sequence_num: i64,
    pub autorelease_time: i64,
}

impl ReleaseMetadata {
    pub fn from_reader<R: Read>(reader: R) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }

    pub fn from_slice(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }

    /// Expand the URL template for one shortcode.
    pub fn url_for(&self, shortcode: &str) -> String {
        self.url_template.replace("{shortcode}", shortcode)
    }

    pub fn rules(&self) -> AlphabetRules {
        AlphabetRules::new(&self.alphabet)
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u16>, D::Error> {
    Ok(Option::<Vec<u16>>::deserialize(deserializer)?.unwrap_or_default())
}
