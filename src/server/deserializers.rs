use serde::de::Error;
use serde::{Deserialize, Deserializer};

// forms post select values as strings, scripts post numbers; accept both
#[derive(Deserialize)]
#[serde(untagged)]
enum IntegerOrString {
    Integer(i64),
    String(String),
}

/// Reads an integer given as a JSON number or a numeric string. `null` and
/// the empty string count as missing.
pub fn deserialize_optional_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntegerOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntegerOrString::Integer(value)) => Ok(Some(value)),
        Some(IntegerOrString::String(value)) if value.trim().is_empty() => Ok(None),
        Some(IntegerOrString::String(value)) => value
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("Wrong value {value}, can not parse to i64"))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategorySelector {
    Flag(bool),
    Integer(i64),
    String(String),
}

/// Quiz category id. Falsy values (`false`, `0`, `""`, `"0"`, `null`) select
/// every category and come back as `None`.
pub fn deserialize_category_selector<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Option::<CategorySelector>::deserialize(deserializer)? {
        None | Some(CategorySelector::Flag(false)) => None,
        Some(CategorySelector::Flag(true)) => {
            return Err(D::Error::custom("category id can not be `true`"))
        }
        Some(CategorySelector::Integer(value)) => Some(value),
        Some(CategorySelector::String(value)) if value.trim().is_empty() => None,
        Some(CategorySelector::String(value)) => Some(
            value
                .trim()
                .parse::<i64>()
                .map_err(|_| D::Error::custom(format!("Wrong value {value}, can not parse to i64")))?,
        ),
    };
    Ok(id.filter(|id| *id != 0))
}

/// Page numbers that do not parse fall back to the default page.
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.trim().parse::<i64>().ok()))
}
