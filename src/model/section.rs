use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque section identifier. The backend sends numbers, but nothing here relies on that.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum Section {
    Number(i64),
    Text(String),
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Number(n) => write!(f, "{}", n),
            Section::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Section {
    fn from(value: &str) -> Self {
        let value = value.trim();
        match value.parse::<i64>() {
            Ok(n) => Section::Number(n),
            Err(_) => Section::Text(value.to_string()),
        }
    }
}

impl Default for Section {
    fn default() -> Self {
        Section::Text(String::new())
    }
}

impl From<i64> for Section {
    fn from(value: i64) -> Self {
        Section::Number(value)
    }
}

/// `GET /api/sections`
#[derive(Serialize, Deserialize, Debug)]
pub struct SectionsResponse {
    pub sections: Vec<Section>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sections_accept_numbers_and_strings() {
        let data: SectionsResponse =
            serde_json::from_str(r#"{"sections": [1, 2, "10A"]}"#).unwrap();
        assert_eq!(
            data.sections,
            vec![
                Section::Number(1),
                Section::Number(2),
                Section::Text("10A".to_string())
            ]
        );
        assert_eq!(data.sections[2].to_string(), "10A");
    }

    #[test]
    fn parses_user_input() {
        assert_eq!(Section::from(" 7 "), Section::Number(7));
        assert_eq!(Section::from("sec-b"), Section::Text("sec-b".to_string()));
    }
}
