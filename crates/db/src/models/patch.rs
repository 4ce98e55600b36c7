//! Double-option deserialization for nullable patch fields.
//!
//! `COALESCE` partial updates cannot distinguish "field absent" from
//! "field explicitly null". For fields where clearing matters (parent
//! reassignment to root), the update DTO uses `Option<Option<T>>`:
//! `None` = leave unchanged, `Some(None)` = set NULL, `Some(v)` = set v.

use serde::{Deserialize, Deserializer};

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
        parent_id: Option<Option<i64>>,
    }

    #[test]
    fn absent_field_is_none() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.parent_id, None);
    }

    #[test]
    fn explicit_null_is_some_none() {
        let patch: Patch = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(patch.parent_id, Some(None));
    }

    #[test]
    fn value_is_some_some() {
        let patch: Patch = serde_json::from_str(r#"{"parent_id": 7}"#).unwrap();
        assert_eq!(patch.parent_id, Some(Some(7)));
    }
}
