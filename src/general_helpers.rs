use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

pub fn generate_id() -> String {
    nanoid::nanoid!()
}

/// HTML forms submit untouched inputs as empty strings; treat those as absent.
pub fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        when: Option<DateTime<Utc>>,
    }

    #[test]
    fn empty_form_value_is_none() {
        let stamped: Stamped = serde_json::from_str(r#"{"when": ""}"#).unwrap();
        assert!(stamped.when.is_none());

        let stamped: Stamped = serde_json::from_str("{}").unwrap();
        assert!(stamped.when.is_none());
    }

    #[test]
    fn rfc3339_value_is_parsed() {
        let stamped: Stamped = serde_json::from_str(r#"{"when": "2023-10-01T12:00:00Z"}"#).unwrap();
        assert_eq!(
            stamped.when.unwrap(),
            "2023-10-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(generate_id(), generate_id());
    }
}
