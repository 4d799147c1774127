//! Data model: observations, timestamps and body categories.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use nalgebra::Vector3;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Heliocentric position in astronomical units.
pub type Position = Vector3<f64>;

/// Zone-less date-time layouts, tried after the plain date and RFC 3339.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// The instant a timestamp denotes, used for ordering and deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeKey {
    /// Day index or Julian day, possibly fractional
    Day(OrderedFloat<f64>),
    
    /// Calendar date (`YYYY-MM-DD`)
    Date(NaiveDate),
    
    /// Date with time of day; zoned inputs are normalized to UTC
    DateTime(NaiveDateTime),
}

/// Which representation a [`Timestamp`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampKind {
    Day,
    Date,
    DateTime,
}

/// An orderable timestamp read from the input table.
///
/// Equality, ordering and hashing use only the parsed instant. The label is
/// the trimmed input text and becomes the frame identifier, so frames are
/// named exactly as the table spells them. When two spellings denote the
/// same instant, the first one seen names the frame.
#[derive(Debug, Clone)]
pub struct Timestamp {
    key: TimeKey,
    label: String,
}

impl Timestamp {
    /// Day index timestamp, labelled with its decimal form.
    pub fn day(day: f64) -> Self {
        Self {
            key: TimeKey::Day(OrderedFloat(day)),
            label: day.to_string(),
        }
    }
    
    pub fn key(&self) -> TimeKey {
        self.key
    }
    
    /// Text used as the frame identifier.
    pub fn label(&self) -> &str {
        &self.label
    }
    
    /// Returns the representation of this timestamp.
    pub fn kind(&self) -> TimestampKind {
        match self.key {
            TimeKey::Day(_) => TimestampKind::Day,
            TimeKey::Date(_) => TimestampKind::Date,
            TimeKey::DateTime(_) => TimestampKind::DateTime,
        }
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Hash for Timestamp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl fmt::Display for TimestampKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimestampKind::Day => "day index",
            TimestampKind::Date => "date",
            TimestampKind::DateTime => "date-time",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Timestamp {
    type Err = String;
    
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        let key = parse_key(label).ok_or_else(|| {
            "expected a day index, YYYY-MM-DD, YYYY-MM-DD HH:MM[:SS] or RFC 3339".to_string()
        })?;
        
        Ok(Self {
            key,
            label: label.to_string(),
        })
    }
}

fn parse_key(s: &str) -> Option<TimeKey> {
    if let Ok(day) = s.parse::<f64>() {
        return day.is_finite().then_some(TimeKey::Day(OrderedFloat(day)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(TimeKey::Date(date));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(TimeKey::DateTime(dt.naive_utc()));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(TimeKey::DateTime)
}

/// One input row: where a body was at a given time.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Raw body identifier, e.g. `5 JUPITER BARYCENTER`
    pub body: String,
    pub timestamp: Timestamp,
    pub position: Position,
}

impl Observation {
    pub fn new(body: impl Into<String>, timestamp: Timestamp, position: Position) -> Self {
        Self {
            body: body.into(),
            timestamp,
            position,
        }
    }
}

/// Derives the display category of a body name.
///
/// Catalog names such as `5 JUPITER BARYCENTER` or `301 MOON` yield their
/// second token; single-token names yield themselves. The result is always
/// uppercase. An empty or blank name yields an empty category.
pub fn category(name: &str) -> String {
    let mut tokens = name.split_whitespace();
    let first = tokens.next();
    
    match (first, tokens.next()) {
        (_, Some(second)) => second.to_uppercase(),
        (Some(only), None) => only.to_uppercase(),
        (None, None) => String::new(),
    }
}
