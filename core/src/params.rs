//! Typed call descriptor: method plus ordered query parameters.
//!
//! # Design
//! `Params` keeps insertion order because the query string is emitted in
//! the order the caller supplied. Setting a key twice replaces the earlier
//! value in place, so every key appears exactly once on the wire.

use crate::http::HttpMethod;

/// Characters `encodeURIComponent` leaves alone but `urlencoding` escapes.
const UNRESERVED_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Percent-encode one query component with `encodeURIComponent` rules.
pub fn encode_component(raw: &str) -> String {
    let mut encoded = urlencoding::encode(raw).into_owned();
    // `%` itself is emitted as `%25`, so these sequences only come from the marks.
    for (escaped, mark) in UNRESERVED_MARKS {
        if encoded.contains(escaped) {
            encoded = encoded.replace(escaped, mark);
        }
    }
    encoded
}

fn format_float(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        n.to_string()
    }
}

/// A single parameter value: a scalar or a sequence of scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Percent-encoded form used in the query string. Lists encode each
    /// element and join them with a literal comma.
    pub fn encode(&self) -> String {
        match self {
            ParamValue::Str(s) => encode_component(s),
            ParamValue::Int(n) => n.to_string(),
            ParamValue::UInt(n) => n.to_string(),
            ParamValue::Float(n) => encode_component(&format_float(*n)),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::List(items) => items
                .iter()
                .map(ParamValue::encode)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Str(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

macro_rules! impl_from_number {
    ($variant:ident($target:ty): $($t:ty),*) => {
        $(impl From<$t> for ParamValue {
            fn from(value: $t) -> Self {
                ParamValue::$variant(<$target>::from(value))
            }
        })*
    };
}

impl_from_number!(Int(i64): i8, i16, i32, i64, u8, u16, u32);
impl_from_number!(UInt(u64): u64);
impl_from_number!(Float(f64): f32, f64);

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        // usize is at most 64 bits on every supported target.
        ParamValue::UInt(value as u64)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Ordered mapping of parameter name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`. A replaced key keeps its original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `key=value&key2=value2` in insertion order; empty when there are no
    /// parameters.
    pub fn to_query_string(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), v.encode()))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

/// Options for one call: the method and its parameters. The path travels
/// separately.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub params: Params,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.set(key, value);
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_keeps_insertion_order() {
        let options = RequestOptions::new()
            .param("title", "New Issue")
            .param("labels", "iteration-1")
            .param("assignee_id", 1);
        assert_eq!(
            options.params.to_query_string(),
            "title=New%20Issue&labels=iteration-1&assignee_id=1"
        );
    }

    #[test]
    fn empty_params_produce_empty_query() {
        assert_eq!(Params::new().to_query_string(), "");
    }

    #[test]
    fn lists_are_joined_with_commas() {
        let params: Params = [("labels", vec!["bug", "needs review"])]
            .into_iter()
            .collect();
        assert_eq!(params.to_query_string(), "labels=bug,needs%20review");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let params: Params = [("search", "a&b=c/d?")].into_iter().collect();
        assert_eq!(params.to_query_string(), "search=a%26b%3Dc%2Fd%3F");
    }

    #[test]
    fn marks_are_left_unescaped_like_encode_uri_component() {
        let params: Params = [("title", "Fix (urgent)! it's *done*")]
            .into_iter()
            .collect();
        assert_eq!(
            params.to_query_string(),
            "title=Fix%20(urgent)!%20it's%20*done*"
        );
    }

    #[test]
    fn escaped_percent_is_not_unescaped() {
        let params: Params = [("q", "%21 100%")].into_iter().collect();
        assert_eq!(params.to_query_string(), "q=%2521%20100%25");
    }

    #[test]
    fn unsigned_and_float_values_render() {
        let options = RequestOptions::new()
            .param("big", u64::MAX)
            .param("count", 3usize)
            .param("weight", 1.5)
            .param("whole", 2.0_f64)
            .param("limit", f64::INFINITY);
        assert_eq!(
            options.params.to_query_string(),
            "big=18446744073709551615&count=3&weight=1.5&whole=2&limit=Infinity"
        );
    }

    #[test]
    fn get_sees_replaced_value() {
        let mut params = Params::new();
        params.set("state", "opened");
        params.set("state", "closed");
        assert_eq!(params.get("state"), Some(&ParamValue::from("closed")));
        assert_eq!(params.get("labels"), None);
    }

    #[test]
    fn iter_yields_insertion_order() {
        let params: Params = [("b", 2), ("a", 1), ("b", 3)].into_iter().collect();
        let pairs: Vec<(&str, &ParamValue)> = params.iter().collect();
        assert_eq!(
            pairs,
            vec![("b", &ParamValue::Int(3)), ("a", &ParamValue::Int(1))]
        );
    }

    #[test]
    fn setting_a_key_twice_replaces_in_place() {
        let options = RequestOptions::new()
            .param("state", "opened")
            .param("labels", "bug")
            .param("state", "closed");
        assert_eq!(options.params.len(), 2);
        assert_eq!(options.params.to_query_string(), "state=closed&labels=bug");
    }

    #[test]
    fn booleans_and_integers_render_plainly() {
        let params: Params = [
            ("confidential", ParamValue::from(true)),
            ("weight", ParamValue::from(-3)),
        ]
        .into_iter()
        .collect();
        assert_eq!(params.to_query_string(), "confidential=true&weight=-3");
    }

    #[test]
    fn options_default_to_get_without_params() {
        let options = RequestOptions::default();
        assert_eq!(options.method, HttpMethod::Get);
        assert!(options.params.is_empty());
    }
}
