//! Loosely typed parameter bag with coerce-or-fail accessors.
//!
//! Every operation receives its caller-supplied fields as a `ParamBag` and
//! reads them through typed accessors. Coercion is strict: a JSON number
//! with a fractional part never silently truncates into an index, a string
//! never turns into a bool, and a required string that is blank (or all
//! whitespace) counts as missing. Failures always name the offending key.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("missing required parameter '{key}'")]
    Missing { key: String },

    #[error("parameter '{key}' must be {expected}, got {found}")]
    Invalid {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("parameters must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },
}

pub type ParamResult<T> = Result<T, ParamError>;

#[derive(Debug, Clone, Default)]
pub struct ParamBag {
    fields: Map<String, Value>,
}

impl ParamBag {
    pub fn new(fields: Map<String, Value>) -> Self {
        ParamBag { fields }
    }

    pub fn from_value(value: Value) -> ParamResult<Self> {
        match value {
            Value::Object(fields) => Ok(ParamBag { fields }),
            other => Err(ParamError::NotAnObject {
                found: type_name(&other),
            }),
        }
    }

    pub fn from_json_str(raw: &str) -> ParamResult<Self> {
        let value: Value = serde_json::from_str(raw).map_err(|_| ParamError::NotAnObject {
            found: "unparseable text",
        })?;
        Self::from_value(value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    fn raw(&self, key: &str) -> Option<&Value> {
        match self.fields.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// Required string; blank or whitespace-only values are treated as
    /// missing (the password rule).
    pub fn required_str(&self, key: &str) -> ParamResult<&str> {
        match self.opt_str(key)? {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ParamError::Missing { key: key.into() }),
        }
    }

    /// Required string that may legitimately be blank (e.g. a replacement
    /// value); only absence fails.
    pub fn present_str(&self, key: &str) -> ParamResult<&str> {
        self.opt_str(key)?
            .ok_or_else(|| ParamError::Missing { key: key.into() })
    }

    pub fn opt_str(&self, key: &str) -> ParamResult<Option<&str>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(other) => Err(invalid(key, "a string", other)),
        }
    }

    pub fn str_or(&self, key: &str, default: &str) -> ParamResult<String> {
        Ok(self.opt_str(key)?.unwrap_or(default).to_string())
    }

    /// Required integer. JSON numbers that are not exact integers fail
    /// instead of truncating.
    pub fn required_i64(&self, key: &str) -> ParamResult<i64> {
        self.opt_i64(key)?
            .ok_or_else(|| ParamError::Missing { key: key.into() })
    }

    pub fn opt_i64(&self, key: &str) -> ParamResult<Option<i64>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::Number(number)) => match number.as_i64() {
                Some(value) => Ok(Some(value)),
                None => Err(ParamError::Invalid {
                    key: key.into(),
                    expected: "an integer",
                    found: "a non-integer number",
                }),
            },
            Some(other) => Err(invalid(key, "an integer", other)),
        }
    }

    pub fn i64_or(&self, key: &str, default: i64) -> ParamResult<i64> {
        Ok(self.opt_i64(key)?.unwrap_or(default))
    }

    pub fn opt_f64(&self, key: &str) -> ParamResult<Option<f64>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::Number(number)) => match number.as_f64() {
                Some(value) => Ok(Some(value)),
                None => Err(ParamError::Invalid {
                    key: key.into(),
                    expected: "a number",
                    found: "an out-of-range number",
                }),
            },
            Some(other) => Err(invalid(key, "a number", other)),
        }
    }

    pub fn f64_or(&self, key: &str, default: f64) -> ParamResult<f64> {
        Ok(self.opt_f64(key)?.unwrap_or(default))
    }

    pub fn bool_or(&self, key: &str, default: bool) -> ParamResult<bool> {
        match self.raw(key) {
            None => Ok(default),
            Some(Value::Bool(value)) => Ok(*value),
            Some(other) => Err(invalid(key, "a boolean", other)),
        }
    }

    /// Required list of integers (bulk index parameters).
    pub fn required_i64_list(&self, key: &str) -> ParamResult<Vec<i64>> {
        match self.raw(key) {
            None => Err(ParamError::Missing { key: key.into() }),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Number(number) => number.as_i64().ok_or(ParamError::Invalid {
                        key: key.into(),
                        expected: "a list of integers",
                        found: "a non-integer number",
                    }),
                    other => Err(invalid(key, "a list of integers", other)),
                })
                .collect(),
            Some(other) => Err(invalid(key, "a list of integers", other)),
        }
    }

    pub fn opt_str_list(&self, key: &str) -> ParamResult<Option<Vec<String>>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(value) => Ok(value.clone()),
                    other => Err(invalid(key, "a list of strings", other)),
                })
                .collect::<ParamResult<Vec<_>>>()
                .map(Some),
            Some(other) => Err(invalid(key, "a list of strings", other)),
        }
    }
}

fn invalid(key: &str, expected: &'static str, found: &Value) -> ParamError {
    ParamError::Invalid {
        key: key.into(),
        expected,
        found: type_name(found),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn bag(value: Value) -> ParamBag {
        ParamBag::from_value(value).unwrap()
    }

    #[test]
    fn required_str_rejects_blank_and_whitespace() {
        let bag = bag(json!({"password": "   ", "empty": "", "ok": "secret"}));
        assert!(matches!(
            bag.required_str("password"),
            Err(ParamError::Missing { .. })
        ));
        assert!(matches!(
            bag.required_str("empty"),
            Err(ParamError::Missing { .. })
        ));
        assert!(matches!(
            bag.required_str("absent"),
            Err(ParamError::Missing { .. })
        ));
        assert_eq!(bag.required_str("ok").unwrap(), "secret");
    }

    #[test]
    fn missing_error_names_the_key() {
        let bag = bag(json!({}));
        let err = bag.required_str("password").unwrap_err();
        assert!(err.to_string().contains("'password'"));
    }

    #[test]
    fn integer_coercion_never_truncates() {
        let bag = bag(json!({"index": 2.5, "good": 3}));
        assert!(matches!(
            bag.required_i64("index"),
            Err(ParamError::Invalid { .. })
        ));
        assert_eq!(bag.required_i64("good").unwrap(), 3);
    }

    #[test]
    fn strings_do_not_coerce_to_numbers_or_bools() {
        let bag = bag(json!({"index": "4", "flag": "true"}));
        assert!(bag.required_i64("index").is_err());
        assert!(bag.bool_or("flag", false).is_err());
    }

    #[test]
    fn null_counts_as_absent() {
        let bag = bag(json!({"outputPath": null}));
        assert_eq!(bag.opt_str("outputPath").unwrap(), None);
        assert_eq!(bag.bool_or("outputPath", true).unwrap(), true);
    }

    #[test]
    fn defaults_apply_when_absent() {
        let bag = bag(json!({}));
        assert_eq!(bag.i64_or("start", 0).unwrap(), 0);
        assert!(bag.bool_or("caseSensitive", true).unwrap());
        assert_eq!(bag.f64_or("width", 100.0).unwrap(), 100.0);
    }

    #[test]
    fn index_list_requires_integers() {
        let bag = bag(json!({"indices": [0, 2, 5], "mixed": [1, "two"]}));
        assert_eq!(bag.required_i64_list("indices").unwrap(), vec![0, 2, 5]);
        assert!(bag.required_i64_list("mixed").is_err());
        assert!(matches!(
            bag.required_i64_list("absent"),
            Err(ParamError::Missing { .. })
        ));
    }

    #[test]
    fn bag_must_be_an_object() {
        assert!(matches!(
            ParamBag::from_value(json!([1, 2])),
            Err(ParamError::NotAnObject { .. })
        ));
        assert!(ParamBag::from_json_str("{\"a\": 1}").is_ok());
    }
}
