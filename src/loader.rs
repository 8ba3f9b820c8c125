//! Reads a city's trip CSV into an in-memory [`Dataset`].
//!
//! Every row must parse. A single malformed row aborts the load with
//! [`BikeshareError::DataError`] so aggregates are never computed over a
//! silently thinned dataset.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::DataConfig;
use crate::error::{BikeshareError, Result};
use crate::filters::City;

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const REQUIRED_COLUMNS: [&str; 6] = [
    START_TIME,
    END_TIME,
    TRIP_DURATION,
    START_STATION,
    END_STATION,
    USER_TYPE,
];

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Layout used when a timestamp is written back out.
pub const TIMESTAMP_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row as it appears in the CSV. Unknown columns (such as the leading
/// unnamed row index) are ignored.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: String,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

/// A single bikeshare trip.
///
/// Month and weekday are derived from the start timestamp when the record is
/// built. Fields are private so the derived values cannot drift.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    duration_secs: u64,
    start_station: String,
    end_station: String,
    user_type: String,
    gender: Option<String>,
    birth_year: Option<i32>,
    month: u32,
    weekday: Weekday,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        duration_secs: u64,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        user_type: impl Into<String>,
    ) -> Self {
        TripRecord {
            start_time,
            end_time,
            duration_secs,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: user_type.into(),
            gender: None,
            birth_year: None,
            month: start_time.month(),
            weekday: start_time.weekday(),
        }
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn start_station(&self) -> &str {
        &self.start_station
    }

    pub fn end_station(&self) -> &str {
        &self.end_station
    }

    /// Empty when the cell was blank.
    pub fn user_type(&self) -> &str {
        &self.user_type
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth_year
    }

    /// Calendar month of the start time, 1..=12.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Hour of the start time, 0..=23.
    pub fn start_hour(&self) -> u32 {
        self.start_time.hour()
    }
}

/// All trips of one city, in file order. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Dataset {
    city: City,
    records: Vec<TripRecord>,
    has_gender: bool,
    has_birth_year: bool,
}

impl Dataset {
    pub fn new(
        city: City,
        records: Vec<TripRecord>,
        has_gender: bool,
        has_birth_year: bool,
    ) -> Self {
        Dataset {
            city,
            records,
            has_gender,
            has_birth_year,
        }
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the source carried a `Gender` column.
    pub fn has_gender(&self) -> bool {
        self.has_gender
    }

    /// Whether the source carried a `Birth Year` column.
    pub fn has_birth_year(&self) -> bool {
        self.has_birth_year
    }
}

/// Loads the configured source file for `city`.
pub fn load(city: City, config: &DataConfig) -> Result<Dataset> {
    let path = config.source_path(city);
    load_path(city, &path)
}

/// Loads a trip CSV from `path`, gunzipping it when the name ends in `.gz`.
#[tracing::instrument(skip_all, fields(city = %city, path = %path.display()))]
pub fn load_path(city: City, path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|source| BikeshareError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");
    debug!(gzipped, "Opened data source");

    let dataset = if gzipped {
        read_trips(city, GzDecoder::new(BufReader::new(file)))?
    } else {
        read_trips(city, BufReader::new(file))?
    };

    info!(
        records = dataset.len(),
        has_gender = dataset.has_gender(),
        has_birth_year = dataset.has_birth_year(),
        "Dataset loaded"
    );
    Ok(dataset)
}

/// Parses trip rows from any CSV reader.
pub fn read_trips<R: Read>(city: City, reader: R) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);

    let headers = rdr.headers().map_err(csv_error)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(BikeshareError::data(
                1,
                format!("missing required column {column:?}"),
            ));
        }
    }
    let has_gender = headers.iter().any(|h| h == GENDER);
    let has_birth_year = headers.iter().any(|h| h == BIRTH_YEAR);

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    while rdr.read_record(&mut row).map_err(csv_error)? {
        let line = row.position().map_or(0, |p| p.line());
        let raw: RawTrip = row
            .deserialize(Some(&headers))
            .map_err(|e| BikeshareError::data(line, e.to_string()))?;
        records.push(parse_trip(raw, line)?);
    }

    Ok(Dataset::new(city, records, has_gender, has_birth_year))
}

fn parse_trip(raw: RawTrip, line: u64) -> Result<TripRecord> {
    let start = parse_timestamp(&raw.start_time).ok_or_else(|| {
        BikeshareError::data(line, format!("bad start time {:?}", raw.start_time))
    })?;
    let end = parse_timestamp(&raw.end_time).ok_or_else(|| {
        BikeshareError::data(line, format!("bad end time {:?}", raw.end_time))
    })?;
    let duration = parse_duration(&raw.trip_duration).ok_or_else(|| {
        BikeshareError::data(line, format!("bad trip duration {:?}", raw.trip_duration))
    })?;

    let mut record = TripRecord::new(
        start,
        end,
        duration,
        raw.start_station,
        raw.end_station,
        raw.user_type.unwrap_or_default(),
    );

    if let Some(gender) = raw.gender.filter(|g| !g.trim().is_empty()) {
        record = record.with_gender(gender);
    }
    if let Some(year) = raw.birth_year {
        if !year.is_finite() {
            return Err(BikeshareError::data(line, format!("bad birth year {year}")));
        }
        record = record.with_birth_year(year.trunc() as i32);
    }

    Ok(record)
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Whole seconds; decimal input is truncated toward zero.
fn parse_duration(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Some(secs);
    }
    let secs = s.parse::<f64>().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    Some(secs.trunc() as u64)
}

fn csv_error(err: csv::Error) -> BikeshareError {
    let line = err.position().map_or(0, |p| p.line());
    BikeshareError::data(line, err.to_string())
}
