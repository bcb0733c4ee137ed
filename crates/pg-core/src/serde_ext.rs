//! Lenient deserializers for identifiers that remote systems send either as
//! JSON numbers or as strings, depending on server version.

use serde::{Deserialize, Deserializer, de::Error as _};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(u64),
}

/// Deserialize `"123"` or `123` into a `String`.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(value) => Ok(value),
        StringOrNumber::Number(value) => Ok(value.to_string()),
    }
}

/// Deserialize `"123"` or `123` into a `u64`.
pub fn number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Number(value) => Ok(value),
        StringOrNumber::String(value) => value
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected a numeric id, got '{value}'"))),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "super::string_or_number")]
        text: String,
        #[serde(deserialize_with = "super::number_or_string")]
        number: u64,
    }

    #[test]
    fn accepts_both_shapes() {
        let row: Row = serde_json::from_str(r#"{"text": 42, "number": "7"}"#).unwrap();
        assert_eq!(row.text, "42");
        assert_eq!(row.number, 7);

        let row: Row = serde_json::from_str(r#"{"text": "abc", "number": 9}"#).unwrap();
        assert_eq!(row.text, "abc");
        assert_eq!(row.number, 9);
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let result: Result<Row, _> = serde_json::from_str(r#"{"text": "a", "number": "x"}"#);
        assert!(result.is_err());
    }
}
