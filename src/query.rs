//! Filter to query-string encoding.
//!
//! Filters push their fields, in declaration order, into a [`QueryString`].
//! Absent fields contribute nothing; the finished string is either empty or
//! starts with `?`.

use std::fmt::Display;

use chrono::{NaiveDateTime, NaiveTime};
use url::form_urlencoded;

/// A typed filter that can be appended to a list endpoint path.
pub trait QueryFilter {
    /// Pushes every present field into `query`, in declaration order.
    fn write_query(&self, query: &mut QueryString);

    /// Encodes the filter as a query suffix (`""` or `?a=1&b=2`).
    fn to_query_string(&self) -> String {
        let mut query = QueryString::default();
        self.write_query(&mut query);
        query.finish()
    }
}

/// Encodes `filter` as a query suffix.
pub fn encode<F: QueryFilter + ?Sized>(filter: &F) -> String {
    filter.to_query_string()
}

/// Accumulates `name=value` pairs.
#[derive(Debug, Default)]
pub struct QueryString {
    pairs: Vec<String>,
}

impl QueryString {
    /// Identifiers and numbers: literal text, no escaping.
    pub fn literal<V: Display>(&mut self, name: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.pairs.push(format!("{name}={value}"));
        }
        self
    }

    /// Free text, percent-encoded as a query component. Empty text is absent.
    pub fn text(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.filter(|value| !value.is_empty()) {
            let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
            self.pairs.push(format!("{name}={encoded}"));
        }
        self
    }

    /// Time of day as 24-hour `HH:MM:SS`.
    pub fn time(&mut self, name: &str, value: Option<NaiveTime>) -> &mut Self {
        self.literal(name, value.map(|time| time.format("%H:%M:%S")))
    }

    /// Date-time as ISO-8601. The fraction carries as many digits as the
    /// value needs (none, 3, 6 or 9), so parsing it back is exact.
    pub fn date_time(&mut self, name: &str, value: Option<NaiveDateTime>) -> &mut Self {
        self.literal(name, value.map(|at| at.format("%Y-%m-%dT%H:%M:%S%.f")))
    }

    /// Decimal number; `NaN` and infinities count as absent.
    pub fn number(&mut self, name: &str, value: Option<f64>) -> &mut Self {
        self.literal(name, value.filter(|value| value.is_finite()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn finish(self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("?{}", self.pairs.join("&"))
        }
    }
}
