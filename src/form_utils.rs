/// Serde helpers for request deserialization.
///
/// Query strings cannot repeat a key into a `Vec` through `serde_urlencoded`,
/// so id lists travel as `category_ids=1,2,3`. JSON partial updates need to
/// tell a missing key apart from an explicit `null`.
use serde::{Deserialize, Deserializer};

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Comma-separated ids; empty input yields an empty list.
pub fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    parse_id_list(s.as_deref().unwrap_or("")).map_err(serde::de::Error::custom)
}

pub fn parse_id_list(value: &str) -> Result<Vec<i64>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| format!("invalid category id: {}", part))
        })
        .collect()
}

/// Wraps whatever was sent, including `null`, in `Some`. Combine with
/// `#[serde(default)]` so a missing key stays `None`.
pub fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryUpdate;

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1,2, 3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_id_list("").unwrap(), Vec::<i64>::new());
        assert_eq!(parse_id_list("4,,").unwrap(), vec![4]);
        assert!(parse_id_list("1,food").is_err());
    }

    #[test]
    fn test_missing_and_null_parent_are_distinct() {
        let missing: CategoryUpdate = serde_json::from_str(r#"{"name": "Food"}"#).unwrap();
        assert_eq!(missing.parent_id, None);

        let cleared: CategoryUpdate = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(cleared.parent_id, Some(None));

        let set: CategoryUpdate = serde_json::from_str(r#"{"parent_id": 7}"#).unwrap();
        assert_eq!(set.parent_id, Some(Some(7)));
    }
}
