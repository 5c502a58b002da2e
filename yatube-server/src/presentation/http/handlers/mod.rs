pub(crate) mod auth;
pub(crate) mod comments;
pub(crate) mod follow;
pub(crate) mod groups;
pub(crate) mod posts;
pub(crate) mod users;

use serde::{Deserialize, Deserializer};

/// Distinguishes a missing field (`None`) from an explicit `null`
/// (`Some(None)`) in PATCH/PUT bodies.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::double_option;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "double_option")]
        group: Option<Option<i64>>,
    }

    #[test]
    fn double_option_separates_missing_and_null() {
        let missing: Body = serde_json::from_str("{}").expect("valid json");
        assert_eq!(missing.group, None);

        let null: Body = serde_json::from_str(r#"{"group": null}"#).expect("valid json");
        assert_eq!(null.group, Some(None));

        let set: Body = serde_json::from_str(r#"{"group": 3}"#).expect("valid json");
        assert_eq!(set.group, Some(Some(3)));
    }
}
