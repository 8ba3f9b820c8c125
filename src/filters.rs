//! Filter vocabulary: supported cities, months and weekdays.
//!
//! Raw user input is validated and normalized here. Everything downstream
//! of these types can assume the values are in range.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;

use crate::error::{BikeshareError, Result};

/// A city with a bundled trip dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lowercase name as typed by users.
    pub fn key(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// File name of the city's CSV source, relative to the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        City::ALL
            .into_iter()
            .find(|c| c.key() == key)
            .ok_or_else(|| BikeshareError::invalid("city", s))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Months covered by the datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January = 1,
    February,
    March,
    April,
    May,
    June,
}

impl Month {
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    /// Calendar month number, January = 1.
    pub fn number(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Either no constraint on a dimension, or exactly one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T: Copy> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn value(&self) -> Option<T> {
        match self {
            Selection::All => None,
            Selection::Only(v) => Some(*v),
        }
    }
}

pub type MonthFilter = Selection<Month>;
pub type WeekdayFilter = Selection<Weekday>;

impl Selection<Month> {
    /// Accepts `all`, `n`, a month name (january..june) or its position 0..=6
    /// where 0 means all. Case-insensitive, surrounding whitespace ignored.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim().to_lowercase();
        if s == "all" || s == "n" {
            return Ok(Selection::All);
        }
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let pos: usize = s
                .parse()
                .map_err(|_| BikeshareError::invalid("month", input))?;
            return match pos {
                0 => Ok(Selection::All),
                1..=6 => Ok(Selection::Only(Month::ALL[pos - 1])),
                _ => Err(BikeshareError::invalid("month", input)),
            };
        }
        Month::ALL
            .into_iter()
            .find(|m| m.name().to_lowercase() == s)
            .map(Selection::Only)
            .ok_or_else(|| BikeshareError::invalid("month", input))
    }
}

/// Canonical week order, Monday first.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const WEEKDAYS: [(Weekday, &str, &str); 7] = [
    (Weekday::Mon, "monday", "mon"),
    (Weekday::Tue, "tuesday", "tue"),
    (Weekday::Wed, "wednesday", "wed"),
    (Weekday::Thu, "thursday", "th"),
    (Weekday::Fri, "friday", "fri"),
    (Weekday::Sat, "saturday", "sat"),
    (Weekday::Sun, "sunday", "sun"),
];

impl Selection<Weekday> {
    /// Accepts `all`, `n`, a full weekday name or one of the short aliases
    /// mon/tue/wed/th/fri/sat/sun. Case-insensitive.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim().to_lowercase();
        if s == "all" || s == "n" {
            return Ok(Selection::All);
        }
        WEEKDAYS
            .iter()
            .find(|(_, name, alias)| *name == s || *alias == s)
            .map(|(day, _, _)| Selection::Only(*day))
            .ok_or_else(|| BikeshareError::invalid("day", input))
    }
}

/// Canonical capitalized weekday name, e.g. `Monday`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// The active selection for one reporting pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub city: City,
    pub month: MonthFilter,
    pub weekday: WeekdayFilter,
}

impl FilterSpec {
    pub fn new(city: City, month: MonthFilter, weekday: WeekdayFilter) -> Self {
        Self {
            city,
            month,
            weekday,
        }
    }

    /// Validates the three raw inputs against the vocabularies.
    pub fn parse(city: &str, month: &str, weekday: &str) -> Result<Self> {
        Ok(Self {
            city: city.parse()?,
            month: MonthFilter::parse(month)?,
            weekday: WeekdayFilter::parse(weekday)?,
        })
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = self.month.value().map_or("All", Month::name);
        let day = self.weekday.value().map_or("All", weekday_name);
        write!(
            f,
            "(filter -> City: {}, Month: {}, Day: {})",
            self.city, month, day
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_is_case_insensitive_and_trimmed() {
        assert_eq!("  Chicago ".parse::<City>().unwrap(), City::Chicago);
        assert_eq!(
            "NEW YORK CITY".parse::<City>().unwrap(),
            City::NewYorkCity
        );
        assert!(matches!(
            "boston".parse::<City>(),
            Err(BikeshareError::InvalidFilterValue { field: "city", .. })
        ));
    }

    #[test]
    fn test_month_by_position_and_name() {
        assert_eq!(MonthFilter::parse("0").unwrap(), Selection::All);
        assert_eq!(MonthFilter::parse("n").unwrap(), Selection::All);
        assert_eq!(MonthFilter::parse("ALL").unwrap(), Selection::All);
        assert_eq!(
            MonthFilter::parse("3").unwrap(),
            Selection::Only(Month::March)
        );
        assert_eq!(
            MonthFilter::parse(" June ").unwrap(),
            Selection::Only(Month::June)
        );
    }

    #[test]
    fn test_month_outside_vocabulary() {
        assert!(MonthFilter::parse("7").is_err());
        assert!(MonthFilter::parse("july").is_err());
        assert!(MonthFilter::parse("").is_err());
        assert!(MonthFilter::parse("+3").is_err());
        assert!(MonthFilter::parse("-0").is_err());
        assert!(MonthFilter::parse("99999999999999999999999").is_err());
    }

    #[test]
    fn test_weekday_aliases() {
        assert_eq!(
            WeekdayFilter::parse("th").unwrap(),
            Selection::Only(Weekday::Thu)
        );
        assert_eq!(
            WeekdayFilter::parse("Sunday").unwrap(),
            Selection::Only(Weekday::Sun)
        );
        assert_eq!(WeekdayFilter::parse("n").unwrap(), Selection::All);
        assert!(WeekdayFilter::parse("thu").is_err());
    }

    #[test]
    fn test_filter_description() {
        let spec = FilterSpec::parse("new york city", "2", "fri").unwrap();
        assert_eq!(
            spec.to_string(),
            "(filter -> City: New York City, Month: February, Day: Friday)"
        );

        let spec = FilterSpec::parse("washington", "all", "all").unwrap();
        assert_eq!(
            spec.to_string(),
            "(filter -> City: Washington, Month: All, Day: All)"
        );
    }
}
