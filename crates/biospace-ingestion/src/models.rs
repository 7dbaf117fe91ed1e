//! Raw dataset record as it appears in the publication JSON array.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One entry of the static dataset before normalisation.
///
/// Every field is optional and loosely typed: a field with an unexpected
/// JSON type is treated as absent rather than failing the whole load.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPublication {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub source_link: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub authors: Option<Vec<String>>,
    #[serde(default, rename = "abstract", deserialize_with = "lenient_text")]
    pub abstract_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub introduction: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub methods: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub results: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub conclusions: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub keywords: Option<Vec<String>>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts an array of strings (non-strings dropped) or a bare string.
fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        Some(Value::String(s)) => Some(vec![s]),
        _ => None,
    })
}
