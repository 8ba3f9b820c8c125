//! Result types produced by the statistic groups.

use std::fmt;

use chrono::Weekday;

use crate::filters::weekday_name;

/// The four statistic groups, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    TimeOfTravel,
    Stations,
    TripDuration,
    Users,
}

impl StatKind {
    pub const ALL: [StatKind; 4] = [
        StatKind::TimeOfTravel,
        StatKind::Stations,
        StatKind::TripDuration,
        StatKind::Users,
    ];

    pub fn title(self) -> &'static str {
        match self {
            StatKind::TimeOfTravel => "Stats on the Most Frequent Times of Travel",
            StatKind::Stations => "Stats on the Most Popular Stations and Trip",
            StatKind::TripDuration => "Stats on Trip Duration",
            StatKind::Users => "Stats on Users",
        }
    }
}

/// Occurrence count of a mode out of the records considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountInfo {
    pub count: u64,
    pub total: u64,
}

impl CountInfo {
    pub fn pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.count as f64 / self.total as f64) * 100.0
        }
    }
}

/// Seconds split into hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hms {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Hms {
    pub fn from_secs(secs: u64) -> Self {
        Hms {
            hours: secs / 3600,
            minutes: secs % 3600 / 60,
            seconds: secs % 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatValue {
    /// Calendar month number, 1..=12.
    Month(u32),
    Weekday(Weekday),
    /// Hour of day, 0..=23.
    Hour(u32),
    Station(String),
    Trip { start: String, end: String },
    /// Rendered as hours, minutes and seconds.
    TotalDuration(u64),
    /// Rendered as minutes and seconds.
    AverageDuration(u64),
    Year(i32),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Month(m) => {
                let name = u8::try_from(*m)
                    .ok()
                    .and_then(|m| chrono::Month::try_from(m).ok())
                    .map(|m| m.name());
                match name {
                    Some(name) => f.write_str(name),
                    None => write!(f, "{m}"),
                }
            }
            StatValue::Weekday(d) => f.write_str(weekday_name(*d)),
            StatValue::Hour(h) => write!(f, "{h}"),
            StatValue::Station(s) => f.write_str(s),
            StatValue::Trip { start, end } => write!(f, "{start} -> {end}"),
            StatValue::TotalDuration(secs) => {
                let t = Hms::from_secs(*secs);
                write!(
                    f,
                    "{} hours {} minutes and {} seconds",
                    t.hours, t.minutes, t.seconds
                )
            }
            StatValue::AverageDuration(secs) => {
                write!(f, "{} minutes and {} seconds", secs / 60, secs % 60)
            }
            StatValue::Year(y) => write!(f, "{y}"),
        }
    }
}

/// One labelled statistic, optionally annotated with its count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatResult {
    pub label: &'static str,
    pub value: StatValue,
    pub count: Option<CountInfo>,
}

impl StatResult {
    pub fn new(label: &'static str, value: StatValue) -> Self {
        StatResult {
            label,
            value,
            count: None,
        }
    }

    pub fn with_count(mut self, count: u64, total: u64) -> Self {
        self.count = Some(CountInfo { count, total });
        self
    }
}

/// Category counts in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    pub header: &'static str,
    pub rows: Vec<(String, u64)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatEntry {
    Line(StatResult),
    Table(FrequencyTable),
    Heading(&'static str),
    /// A block that could not be computed, with the reason.
    Unavailable(String),
}

/// The output of one statistic group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatGroup {
    pub kind: StatKind,
    pub entries: Vec<StatEntry>,
}

impl StatGroup {
    /// Finds a line by label.
    pub fn line(&self, label: &str) -> Option<&StatResult> {
        self.entries.iter().find_map(|e| match e {
            StatEntry::Line(r) if r.label == label => Some(r),
            _ => None,
        })
    }

    /// Finds a table by header.
    pub fn table(&self, header: &str) -> Option<&FrequencyTable> {
        self.entries.iter().find_map(|e| match e {
            StatEntry::Table(t) if t.header == header => Some(t),
            _ => None,
        })
    }
}
