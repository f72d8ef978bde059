use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use flexstr::SharedStr as FlexStr;

use crate::error::{BuildError, MalformedDurationError};
use crate::ontology::{OntologyClass, OntologyTerms};

lazy_static! {
    static ref DURATION_RE: Regex =
        Regex::new(r"^P(?:(?P<years>\d+)Y)?(?:(?P<months>\d+)M)?(?:(?P<weeks>\d+)W)?(?:(?P<days>\d+)D)?(?:(?P<time>T)(?:(?P<hours>\d+)H)?(?:(?P<minutes>\d+)M)?(?:(?P<seconds>\d+)(?:\.(?P<fraction>\d{1,9}))?S)?)?$")
        .unwrap();
}

const NANOS_PER_SECOND: i32 = 1_000_000_000;

// 0001-01-01T00:00:00Z to 9999-12-31T23:59:59Z, the years that RFC 3339
// can write with four digits
pub const MIN_TIMESTAMP_SECONDS: i64 = -62_135_596_800;
pub const MAX_TIMESTAMP_SECONDS: i64 = 253_402_300_799;

// An ISO-8601 duration such as "P52Y2M" or "PT36H", used for ages.  The
// original text is kept so that encoding is lossless.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Iso8601Duration {
    text: FlexStr,
    years: u32,
    months: u32,
    weeks: u32,
    days: u32,
    hours: u32,
    minutes: u32,
    seconds: u32,
    nanos: u32,
}

impl Iso8601Duration {
    pub fn parse(text: &str) -> Result<Iso8601Duration, MalformedDurationError> {
        let malformed = || MalformedDurationError { value: text.to_owned() };

        let captures = DURATION_RE.captures(text).ok_or_else(malformed)?;

        let date_parts = ["years", "months", "weeks", "days"];
        let time_parts = ["hours", "minutes", "seconds"];

        let has_date = date_parts.iter().any(|name| captures.name(name).is_some());
        let has_time = time_parts.iter().any(|name| captures.name(name).is_some());

        if !has_date && !has_time {
            return Err(malformed());
        }
        // "P1DT" has a designator with no time components
        if captures.name("time").is_some() && !has_time {
            return Err(malformed());
        }

        let component = |name: &str| -> Result<u32, MalformedDurationError> {
            match captures.name(name) {
                Some(value) => value.as_str().parse::<u32>().map_err(|_| malformed()),
                None => Ok(0),
            }
        };

        // right pad the fraction to nine digits to get nanoseconds
        let nanos = match captures.name("fraction") {
            Some(fraction) => format!("{:0<9}", fraction.as_str()).parse::<u32>()
                .map_err(|_| malformed())?,
            None => 0,
        };

        Ok(Iso8601Duration {
            text: text.into(),
            years: component("years")?,
            months: component("months")?,
            weeks: component("weeks")?,
            days: component("days")?,
            hours: component("hours")?,
            minutes: component("minutes")?,
            seconds: component("seconds")?,
            nanos,
        })
    }

    pub fn as_str(&self) -> &str {
        self.text.as_ref()
    }

    pub fn years(&self) -> u32 {
        self.years
    }

    pub fn months(&self) -> u32 {
        self.months
    }

    pub fn weeks(&self) -> u32 {
        self.weeks
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> f64 {
        self.seconds as f64 + self.nanos as f64 / NANOS_PER_SECOND as f64
    }

    // Approximate length in days, using 365.25 day years and 30.4375 day months.
    // Only useful for ordering ages.
    pub fn approximate_days(&self) -> f64 {
        self.years as f64 * 365.25 + self.months as f64 * 30.4375 +
            self.weeks as f64 * 7.0 + self.days as f64 +
            (self.hours as f64 * 3600.0 + self.minutes as f64 * 60.0 + self.seconds()) / 86400.0
    }
}

impl Display for Iso8601Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl FromStr for Iso8601Duration {
    type Err = MalformedDurationError;

    fn from_str(s: &str) -> Result<Iso8601Duration, MalformedDurationError> {
        Iso8601Duration::parse(s)
    }
}

impl TryFrom<String> for Iso8601Duration {
    type Error = MalformedDurationError;

    fn try_from(s: String) -> Result<Iso8601Duration, MalformedDurationError> {
        Iso8601Duration::parse(&s)
    }
}

impl From<Iso8601Duration> for String {
    fn from(duration: Iso8601Duration) -> String {
        duration.text.to_string()
    }
}

// A point in time as seconds and nanoseconds since the Unix epoch.
// JSON uses an RFC 3339 string, the binary encoding uses the number pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    seconds: i64,
    nanos: i32,
}

#[derive(Serialize, Deserialize)]
struct RawTimestamp {
    seconds: i64,
    nanos: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Result<Timestamp, BuildError> {
        let invalid = |reason: &str| BuildError::InvalidValue {
            entity: "Timestamp",
            field: "nanos",
            reason: reason.to_owned(),
        };

        if !(0..NANOS_PER_SECOND).contains(&nanos) {
            return Err(invalid("must be in the range 0..1000000000"));
        }

        if !(MIN_TIMESTAMP_SECONDS..=MAX_TIMESTAMP_SECONDS).contains(&seconds) {
            return Err(BuildError::InvalidValue {
                entity: "Timestamp",
                field: "seconds",
                reason: format!("{} is outside the years 1 to 9999", seconds),
            });
        }

        Ok(Timestamp { seconds, nanos })
    }

    fn split_datetime(datetime: DateTime<Utc>) -> (i64, i32) {
        // chrono puts leap seconds in the nanoseconds
        (datetime.timestamp(), (datetime.timestamp_subsec_nanos() % NANOS_PER_SECOND as u32) as i32)
    }

    pub fn from_datetime(datetime: DateTime<Utc>) -> Result<Timestamp, BuildError> {
        let (seconds, nanos) = Timestamp::split_datetime(datetime);
        Timestamp::new(seconds, nanos)
    }

    pub fn now() -> Timestamp {
        let (seconds, nanos) = Timestamp::split_datetime(Utc::now());
        Timestamp { seconds, nanos }
    }

    pub fn parse_rfc3339(text: &str) -> Result<Timestamp, BuildError> {
        let datetime = DateTime::parse_from_rfc3339(text)
            .map_err(|err| BuildError::InvalidValue {
                entity: "Timestamp",
                field: "seconds",
                reason: format!("can't parse \"{}\": {}", text, err),
            })?;
        Timestamp::from_datetime(datetime.with_timezone(&Utc))
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanos(&self) -> i32 {
        self.nanos
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        // the range was checked on construction
        DateTime::from_timestamp(self.seconds, self.nanos as u32).unwrap_or_default()
    }

    pub fn to_rfc3339(&self) -> String {
        self.to_datetime().to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_rfc3339())
        } else {
            RawTimestamp { seconds: self.seconds, nanos: self.nanos }.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            Timestamp::parse_rfc3339(&text).map_err(de::Error::custom)
        } else {
            let raw = RawTimestamp::deserialize(deserializer)?;
            Timestamp::new(raw.seconds, raw.nanos).map_err(de::Error::custom)
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Age {
    #[serde(rename = "iso8601duration")]
    Iso8601Duration(Iso8601Duration),
    OntologyClass(OntologyClass),
    Timestamp(Timestamp),
}

impl Age {
    pub fn iso8601(text: &str) -> Result<Age, MalformedDurationError> {
        Ok(Age::Iso8601Duration(Iso8601Duration::parse(text)?))
    }

    pub fn duration(&self) -> Option<&Iso8601Duration> {
        match *self {
            Age::Iso8601Duration(ref duration) => Some(duration),
            _ => None,
        }
    }
}

impl Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Age::Iso8601Duration(ref duration) => write!(f, "{}", duration),
            Age::OntologyClass(ref ontology_class) => write!(f, "{}", ontology_class),
            Age::Timestamp(ref timestamp) => write!(f, "{}", timestamp),
        }
    }
}

impl OntologyTerms for Age {
    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a OntologyClass>) {
        if let Age::OntologyClass(ref ontology_class) = *self {
            terms.push(ontology_class);
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AgeRange {
    start: Age,
    end: Age,
}

impl AgeRange {
    pub fn new(start: Age, end: Age) -> AgeRange {
        AgeRange { start, end }
    }

    pub fn start(&self) -> &Age {
        &self.start
    }

    pub fn end(&self) -> &Age {
        &self.end
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GestationalAge {
    weeks: u32,
    #[serde(skip_serializing_if="Option::is_none")]
    days: Option<u32>,
}

impl GestationalAge {
    pub fn new(weeks: u32, days: Option<u32>) -> GestationalAge {
        GestationalAge { weeks, days }
    }

    pub fn weeks(&self) -> u32 {
        self.weeks
    }

    pub fn days(&self) -> Option<u32> {
        self.days
    }
}

#[derive(Deserialize)]
struct TimeIntervalFields {
    start: Timestamp,
    end: Timestamp,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "TimeIntervalFields")]
pub struct TimeInterval {
    start: Timestamp,
    end: Timestamp,
}

impl TimeInterval {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<TimeInterval, BuildError> {
        if end < start {
            return Err(BuildError::InvalidValue {
                entity: "TimeInterval",
                field: "end",
                reason: format!("{} is before the start {}", end, start),
            });
        }
        Ok(TimeInterval { start, end })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }
}

impl TryFrom<TimeIntervalFields> for TimeInterval {
    type Error = BuildError;

    fn try_from(fields: TimeIntervalFields) -> Result<TimeInterval, BuildError> {
        TimeInterval::new(fields.start, fields.end)
    }
}

// "When" something happened: an age, an ontology coded onset like
// HP:0011461 "Fetal onset", an absolute time or an interval
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TimeElement {
    Age(Age),
    AgeRange(AgeRange),
    GestationalAge(GestationalAge),
    OntologyClass(OntologyClass),
    Timestamp(Timestamp),
    Interval(TimeInterval),
}

impl TimeElement {
    pub fn age(&self) -> Option<&Age> {
        match *self {
            TimeElement::Age(ref age) => Some(age),
            _ => None,
        }
    }
}

impl From<Age> for TimeElement {
    fn from(age: Age) -> TimeElement {
        TimeElement::Age(age)
    }
}

impl From<OntologyClass> for TimeElement {
    fn from(ontology_class: OntologyClass) -> TimeElement {
        TimeElement::OntologyClass(ontology_class)
    }
}

impl From<Timestamp> for TimeElement {
    fn from(timestamp: Timestamp) -> TimeElement {
        TimeElement::Timestamp(timestamp)
    }
}

impl From<TimeInterval> for TimeElement {
    fn from(interval: TimeInterval) -> TimeElement {
        TimeElement::Interval(interval)
    }
}

impl OntologyTerms for TimeElement {
    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a OntologyClass>) {
        match *self {
            TimeElement::Age(ref age) => age.collect_terms(terms),
            TimeElement::AgeRange(ref range) => {
                range.start.collect_terms(terms);
                range.end.collect_terms(terms);
            },
            TimeElement::OntologyClass(ref ontology_class) => terms.push(ontology_class),
            TimeElement::GestationalAge(_) | TimeElement::Timestamp(_) |
            TimeElement::Interval(_) => (),
        }
    }
}

#[test]
fn test_parse_duration() {
    let age = Iso8601Duration::parse("P52Y2M").unwrap();
    assert_eq!(age.years(), 52);
    assert_eq!(age.months(), 2);
    assert_eq!(age.days(), 0);
    assert_eq!(age.as_str(), "P52Y2M");

    let full = Iso8601Duration::parse("P1Y2M3W4DT5H6M7.25S").unwrap();
    assert_eq!((full.weeks(), full.days(), full.hours(), full.minutes()), (3, 4, 5, 6));
    assert_eq!(full.seconds(), 7.25);

    assert_eq!(Iso8601Duration::parse("PT36H").unwrap().hours(), 36);
    assert!(Iso8601Duration::parse("P14Y").unwrap().approximate_days() >
            Iso8601Duration::parse("P13Y11M").unwrap().approximate_days());
}

#[test]
fn test_malformed_duration() {
    for bad in ["", "P", "PT", "P1DT", "14Y", "P14", "P1.5Y", "P-1Y", "p14y", "P14Y ", "P99999999999Y"] {
        assert_eq!(Iso8601Duration::parse(bad),
                   Err(MalformedDurationError { value: bad.to_owned() }),
                   "{} should be rejected", bad);
    }
}

#[test]
fn test_timestamp() {
    let dob = Timestamp::parse_rfc3339("1964-03-15T00:00:00Z").unwrap();
    assert_eq!(dob.seconds(), -182995200);
    assert_eq!(dob.nanos(), 0);
    assert_eq!(dob.to_rfc3339(), "1964-03-15T00:00:00Z");

    let precise = Timestamp::new(1_600_000_000, 250_000_000).unwrap();
    assert_eq!(Timestamp::parse_rfc3339(&precise.to_rfc3339()).unwrap(), precise);

    assert!(Timestamp::new(0, -1).is_err());
    assert!(Timestamp::new(0, NANOS_PER_SECOND).is_err());
    assert!(Timestamp::new(i64::MAX, 0).is_err());
}

#[test]
fn test_timestamp_range() {
    let first = Timestamp::new(MIN_TIMESTAMP_SECONDS, 0).unwrap();
    assert_eq!(first.to_rfc3339(), "0001-01-01T00:00:00Z");
    assert_eq!(Timestamp::parse_rfc3339(&first.to_rfc3339()).unwrap(), first);

    let last = Timestamp::new(MAX_TIMESTAMP_SECONDS, 999_999_999).unwrap();
    assert_eq!(last.to_rfc3339(), "9999-12-31T23:59:59.999999999Z");
    assert_eq!(Timestamp::parse_rfc3339(&last.to_rfc3339()).unwrap(), last);

    assert!(Timestamp::new(MIN_TIMESTAMP_SECONDS - 1, 999_999_999).is_err());
    assert!(Timestamp::new(MAX_TIMESTAMP_SECONDS + 1, 0).is_err());

    // in range only before the offset is applied
    assert!(Timestamp::parse_rfc3339("0001-01-01T00:30:00+01:00").is_err());
    assert!(Timestamp::parse_rfc3339("9999-12-31T23:30:00-01:00").is_err());
}

#[test]
fn test_time_interval() {
    let start = Timestamp::new(1000, 0).unwrap();
    let end = Timestamp::new(2000, 0).unwrap();
    assert!(TimeInterval::new(start, end).is_ok());
    assert!(TimeInterval::new(start, start).is_ok());
    assert!(matches!(TimeInterval::new(end, start),
                     Err(BuildError::InvalidValue { entity: "TimeInterval", field: "end", .. })));
}

#[test]
fn test_time_element_terms() {
    let fetal_onset = crate::ontology::ontology_class("HP:0011461", "Fetal onset");
    let onset = TimeElement::from(fetal_onset.clone());
    assert_eq!(onset.ontology_terms(), vec![&fetal_onset]);

    let age = TimeElement::from(Age::iso8601("P14Y").unwrap());
    assert!(age.ontology_terms().is_empty());
    assert_eq!(age.age().and_then(Age::duration).map(|d| d.years()), Some(14));
}
