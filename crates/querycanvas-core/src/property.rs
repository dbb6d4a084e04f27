use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type PropertyMap = BTreeMap<String, PropertyValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{b}"),
            // `{}` on f64 already omits a trailing ".0" and never saturates.
            PropertyValue::Number(n) => write!(f, "{n}"),
            PropertyValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Number(value as f64)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_drops_trailing_zero() {
        assert_eq!(PropertyValue::Number(35.0).to_string(), "35");
        assert_eq!(PropertyValue::Number(2.5).to_string(), "2.5");
        assert_eq!(PropertyValue::from("Evli").to_string(), "Evli");
    }

    #[test]
    fn test_display_large_number_reparses_exactly() {
        for n in [1e20, -3.5e18, 9_007_199_254_740_993.0, f64::MAX] {
            let text = PropertyValue::Number(n).to_string();
            assert_eq!(text.parse::<f64>().unwrap(), n, "{text}");
        }
        assert_eq!(
            PropertyValue::Number(1e20).to_string(),
            "100000000000000000000"
        );
    }

    #[test]
    fn test_untagged_deserialize() {
        let map: PropertyMap =
            serde_json::from_str(r#"{"yas": 35, "isim": "Mehmet", "aktif": true}"#).unwrap();
        assert_eq!(map["yas"], PropertyValue::Number(35.0));
        assert_eq!(map["isim"], PropertyValue::from("Mehmet"));
        assert_eq!(map["aktif"], PropertyValue::Bool(true));
    }
}
