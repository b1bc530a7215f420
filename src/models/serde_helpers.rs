//! Serde helpers shared by request DTOs.

use serde::{Deserialize, Deserializer};

/// Distinguish an absent field from an explicit `null` in PATCH payloads.
///
/// Use together with `#[serde(default)]`: a missing field stays `None`,
/// `null` becomes `Some(None)` and a value becomes `Some(Some(value))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        value: Option<Option<i32>>,
    }

    #[test]
    fn test_double_option_states() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.value, None);

        let null: Patch = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(null.value, Some(None));

        let set: Patch = serde_json::from_str(r#"{"value": 7}"#).unwrap();
        assert_eq!(set.value, Some(Some(7)));
    }
}
