//! Path segments and query parameters.
//!
//! Both carry an explicit "absent" variant so call sites can pass optional
//! arguments straight through; absent entries are dropped when the URL is built.

use crate::error::{JikanError, Result};
use serde_json::Value;
use std::borrow::Cow;
use std::convert::Infallible;
use std::str::FromStr;

/// Build a fixed-size array of [`PathSegment`]s from mixed values.
///
/// ```
/// use jikan_client::segments;
///
/// let request: Option<&str> = None;
/// let path = segments!["anime", 5, request, "episodes"];
/// assert_eq!(path.len(), 4);
/// ```
#[macro_export]
macro_rules! segments {
    ($($segment:expr),* $(,)?) => {
        [$($crate::api::PathSegment::from($segment)),*]
    };
}

/// One component of a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Text(String),
    Number(i64),
    Absent,
}

impl PathSegment {
    /// Text to place in the URL, or `None` if the segment is dropped.
    ///
    /// Absent segments and empty strings are dropped. Numbers always survive,
    /// including 0, so an id or episode of 0 is not silently cut from the path.
    pub fn as_path_part(&self) -> Option<Cow<'_, str>> {
        match self {
            PathSegment::Text(text) if text.is_empty() => None,
            PathSegment::Text(text) => Some(Cow::Borrowed(text)),
            PathSegment::Number(number) => Some(Cow::Owned(number.to_string())),
            PathSegment::Absent => None,
        }
    }
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        PathSegment::Text(value.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        PathSegment::Text(value)
    }
}

impl From<&String> for PathSegment {
    fn from(value: &String) -> Self {
        PathSegment::Text(value.clone())
    }
}

macro_rules! path_segment_from_int {
    ($($int:ty),*) => {
        $(impl From<$int> for PathSegment {
            fn from(value: $int) -> Self {
                PathSegment::Number(i64::from(value))
            }
        })*
    };
}

path_segment_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl<T: Into<PathSegment>> From<Option<T>> for PathSegment {
    fn from(value: Option<T>) -> Self {
        value.map_or(PathSegment::Absent, Into::into)
    }
}

impl TryFrom<&Value> for PathSegment {
    type Error = JikanError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(PathSegment::Absent),
            Value::String(text) => Ok(PathSegment::Text(text.clone())),
            Value::Number(number) => Ok(number
                .as_i64()
                .map(PathSegment::Number)
                .unwrap_or_else(|| PathSegment::Text(number.to_string()))),
            other => Err(JikanError::InvalidInput(format!(
                "URL parts must be strings or numbers but given was {}",
                other
            ))),
        }
    }
}

/// Convert a JSON array of URL parts into path segments
pub fn segments_from_json(url_parts: &Value) -> Result<Vec<PathSegment>> {
    let parts = url_parts.as_array().ok_or_else(|| {
        JikanError::InvalidInput(format!(
            "The given parameter should be an array like [\"anime\", 1] but given was {}",
            url_parts
        ))
    })?;

    parts.iter().map(PathSegment::try_from).collect()
}

/// Scalar query parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Absent,
}

impl QueryValue {
    /// Whether this value is written to the query string.
    ///
    /// Absent, empty strings, `false` and NaN are dropped; zero is kept.
    pub fn is_included(&self) -> bool {
        match self {
            QueryValue::Str(text) => !text.is_empty(),
            QueryValue::Int(_) => true,
            QueryValue::Float(number) => !number.is_nan(),
            QueryValue::Bool(flag) => *flag,
            QueryValue::Absent => false,
        }
    }

    /// Serialized form of an included value
    pub fn to_query_string(&self) -> Option<String> {
        if !self.is_included() {
            return None;
        }

        let text = match self {
            QueryValue::Str(text) => text.clone(),
            QueryValue::Int(number) => number.to_string(),
            QueryValue::Float(number) => format_float(*number),
            QueryValue::Bool(flag) => flag.to_string(),
            QueryValue::Absent => return None,
        };

        Some(text)
    }

    /// Infer the literal type of command-line text: integer, then float,
    /// then boolean, else string
    pub fn infer(text: &str) -> Self {
        if let Ok(number) = text.parse::<i64>() {
            return QueryValue::Int(number);
        }
        if let Ok(number) = text.parse::<f64>() {
            if number.is_finite() {
                return QueryValue::Float(number);
            }
        }
        match text {
            "true" => QueryValue::Bool(true),
            "false" => QueryValue::Bool(false),
            _ => QueryValue::Str(text.to_string()),
        }
    }
}

fn format_float(number: f64) -> String {
    if number == 0.0 {
        // covers -0.0
        "0".to_string()
    } else if number.is_infinite() {
        let text = if number > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else {
        number.to_string()
    }
}

impl FromStr for QueryValue {
    type Err = Infallible;

    fn from_str(text: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::infer(text))
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::Str(value.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

macro_rules! query_value_from_int {
    ($($int:ty),*) => {
        $(impl From<$int> for QueryValue {
            fn from(value: $int) -> Self {
                QueryValue::Int(i64::from(value))
            }
        })*
    };
}

query_value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(QueryValue::Absent, Into::into)
    }
}

impl TryFrom<&Value> for QueryValue {
    type Error = JikanError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(QueryValue::Absent),
            Value::Bool(flag) => Ok(QueryValue::Bool(*flag)),
            Value::String(text) => Ok(QueryValue::Str(text.clone())),
            Value::Number(number) => Ok(match number.as_i64() {
                Some(int) => QueryValue::Int(int),
                None => QueryValue::Float(number.as_f64().unwrap_or(f64::NAN)),
            }),
            other => Err(JikanError::InvalidInput(format!(
                "Query parameter values must be scalars but given was {}",
                other
            ))),
        }
    }
}

/// Ordered query parameters; duplicate keys are kept and all emitted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParameters {
    entries: Vec<(String, QueryValue)>,
}

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`push`](Self::push)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Append an entry, keeping any earlier entries for the same key
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Replace every entry for `key` with a single one at the first entry's position
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter().position(|(k, _)| *k == key) {
            Some(index) => {
                self.entries[index].1 = value;
                let mut seen = 0;
                self.entries.retain(|(k, _)| {
                    if *k != key {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.entries.push((key, value)),
        }
    }

    /// First value stored for `key`
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether any entry for `key` would be written to the query string
    pub fn has_included(&self, key: &str) -> bool {
        self.entries
            .iter()
            .any(|(k, v)| k == key && v.is_included())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries surviving the inclusion rule, serialized, in insertion order
    pub fn included(&self) -> impl Iterator<Item = (&str, String)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.to_query_string().map(|text| (k.as_str(), text)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParameters
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl TryFrom<&Value> for QueryParameters {
    type Error = JikanError;

    /// Accepts a JSON object of scalars; `null` means no parameters
    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| -> Result<(String, QueryValue)> {
                    Ok((key.clone(), QueryValue::try_from(value)?))
                })
                .collect(),
            other => Err(JikanError::InvalidInput(format!(
                "Query parameters should be an object like {{\"type\": \"tv\"}} but given was {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_segment_conversions() {
        let request: Option<&str> = None;
        let path = segments!["anime", 5u32, request, String::from("episodes")];

        assert_eq!(path[0], PathSegment::Text("anime".to_string()));
        assert_eq!(path[1], PathSegment::Number(5));
        assert_eq!(path[2], PathSegment::Absent);
        assert_eq!(path[3].as_path_part().as_deref(), Some("episodes"));
    }

    #[test]
    fn test_segment_drops_empty_and_absent() {
        assert_eq!(PathSegment::from("").as_path_part(), None);
        assert_eq!(PathSegment::Absent.as_path_part(), None);
        assert_eq!(PathSegment::from(0).as_path_part().as_deref(), Some("0"));
    }

    #[test]
    fn test_segments_from_json() {
        let path = segments_from_json(&json!(["anime", 1, null, "characters"])).unwrap();
        assert_eq!(
            path,
            vec![
                PathSegment::Text("anime".to_string()),
                PathSegment::Number(1),
                PathSegment::Absent,
                PathSegment::Text("characters".to_string()),
            ]
        );

        let error = segments_from_json(&json!("anime/1")).unwrap_err();
        assert!(matches!(error, JikanError::InvalidInput(_)));

        let nested = segments_from_json(&json!(["anime", ["nested"]])).unwrap_err();
        assert!(matches!(nested, JikanError::InvalidInput(_)));
    }

    #[test]
    fn test_json_params_keep_key_order() {
        let params = QueryParameters::try_from(&json!({"type": "tv", "status": "airing", "page": 0})).unwrap();
        let keys: Vec<_> = params.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["type", "status", "page"]);

        let url = crate::api::build_url("https://api.jikan.moe/v4", &segments!["anime"], Some(&params)).unwrap();
        assert_eq!(url.query(), Some("type=tv&status=airing&page=0"));
    }

    #[test]
    fn test_inclusion_rule() {
        assert!(QueryValue::Int(0).is_included());
        assert!(QueryValue::Float(0.0).is_included());
        assert!(QueryValue::Int(-3).is_included());
        assert!(QueryValue::from("tv").is_included());
        assert!(QueryValue::Bool(true).is_included());

        assert!(!QueryValue::from("").is_included());
        assert!(!QueryValue::Bool(false).is_included());
        assert!(!QueryValue::Float(f64::NAN).is_included());
        assert!(!QueryValue::Absent.is_included());
        assert!(!QueryValue::from(None::<u32>).is_included());
    }

    #[test]
    fn test_query_string_formatting() {
        assert_eq!(QueryValue::Float(2.0).to_query_string().as_deref(), Some("2"));
        assert_eq!(QueryValue::Float(7.5).to_query_string().as_deref(), Some("7.5"));
        assert_eq!(QueryValue::Float(-0.0).to_query_string().as_deref(), Some("0"));
        assert_eq!(
            QueryValue::Float(f64::INFINITY).to_query_string().as_deref(),
            Some("Infinity")
        );
        assert_eq!(QueryValue::Bool(true).to_query_string().as_deref(), Some("true"));
        assert_eq!(QueryValue::Bool(false).to_query_string(), None);
    }

    #[test]
    fn test_parse_query_value() {
        assert_eq!("25".parse::<QueryValue>().unwrap(), QueryValue::Int(25));
        assert_eq!("8.5".parse::<QueryValue>().unwrap(), QueryValue::Float(8.5));
        assert_eq!("true".parse::<QueryValue>().unwrap(), QueryValue::Bool(true));
        assert_eq!("tv".parse::<QueryValue>().unwrap(), QueryValue::from("tv"));
        assert_eq!("inf".parse::<QueryValue>().unwrap(), QueryValue::from("inf"));
    }

    #[test]
    fn test_included_keeps_order_and_duplicates() {
        let params = QueryParameters::new()
            .with("genres", 1)
            .with("page", 0)
            .with("limit", None::<u32>)
            .with("sfw", false)
            .with("genres", 4);

        let included: Vec<_> = params.included().collect();
        assert_eq!(
            included,
            vec![
                ("genres", "1".to_string()),
                ("page", "0".to_string()),
                ("genres", "4".to_string()),
            ]
        );
        assert_eq!(params.len(), 5);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut params = QueryParameters::new()
            .with("q", "")
            .with("type", "tv")
            .with("q", "naruto");

        params.set("q", "bleach");

        let entries: Vec<_> = params.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("q", &QueryValue::from("bleach")),
                ("type", &QueryValue::from("tv")),
            ]
        );

        params.set("limit", 5);
        assert_eq!(params.get("limit"), Some(&QueryValue::Int(5)));
    }

    #[test]
    fn test_has_included() {
        let params = QueryParameters::new().with("q", "").with("limit", 0);
        assert!(!params.has_included("q"));
        assert!(params.has_included("limit"));
        assert!(!params.has_included("page"));
    }

    #[test]
    fn test_parameters_from_json() {
        let params =
            QueryParameters::try_from(&json!({"type": "tv", "page": 2, "sfw": true, "min_score": 7.5}))
                .unwrap();
        assert_eq!(params.get("type"), Some(&QueryValue::from("tv")));
        assert_eq!(params.get("page"), Some(&QueryValue::Int(2)));
        assert_eq!(params.get("sfw"), Some(&QueryValue::Bool(true)));
        assert_eq!(params.get("min_score"), Some(&QueryValue::Float(7.5)));

        assert!(QueryParameters::try_from(&json!(null)).unwrap().is_empty());
        assert!(QueryParameters::try_from(&json!([1, 2])).is_err());
        assert!(QueryParameters::try_from(&json!({"genres": [1, 2]})).is_err());
    }
}
