use tracing::debug;

use crate::error::{BikeshareError, Result};
use crate::filter::FilteredView;
use crate::stats::tally::Tally;
use crate::stats::types::{FrequencyTable, StatEntry, StatResult, StatValue};

pub const USER_TYPES_HEADER: &str = "- Counts of user types -";
pub const GENDERS_HEADER: &str = "- Counts of genders -";
pub const BIRTH_YEAR_HEADING: &str = "- Stats on birth year -";
pub const EARLIEST_BIRTH_YEAR: &str = "Earliest birth year:";
pub const LATEST_BIRTH_YEAR: &str = "Latest birth year:";
pub const MOST_COMMON_BIRTH_YEAR: &str = "Most common birth year:";

/// User type counts, plus gender counts and birth-year extremes when the
/// dataset carries those columns. Blank cells are not counted. A birth-year
/// block with no values is reported as unavailable; the tables still stand.
pub fn user_stats(view: &FilteredView<'_>) -> Result<Vec<StatEntry>> {
    let dataset = view.dataset();
    let mut entries = Vec::new();

    let user_types: Tally<&str> = view
        .iter()
        .map(|r| r.user_type())
        .filter(|t| !t.trim().is_empty())
        .collect();
    entries.push(StatEntry::Table(table(USER_TYPES_HEADER, &user_types)));

    if dataset.has_gender() {
        let genders: Tally<&str> = view.iter().filter_map(|r| r.gender()).collect();
        entries.push(StatEntry::Table(table(GENDERS_HEADER, &genders)));
    }

    if dataset.has_birth_year() {
        entries.push(StatEntry::Heading(BIRTH_YEAR_HEADING));
        match birth_year_stats(view) {
            Ok(lines) => entries.extend(lines),
            Err(e) => {
                debug!(error = %e, "Birth year block skipped");
                entries.push(StatEntry::Unavailable(e.to_string()));
            }
        }
    }

    Ok(entries)
}

fn birth_year_stats(view: &FilteredView<'_>) -> Result<Vec<StatEntry>> {
    let years: Tally<i32> = view.iter().filter_map(|r| r.birth_year()).collect();

    let earliest = years.keys().min().copied();
    let latest = years.keys().max().copied();
    let (earliest, latest, (&common, _)) = match (earliest, latest, years.smallest_mode()) {
        (Some(e), Some(l), Some(m)) => (e, l, m),
        _ => return Err(BikeshareError::empty("birth year statistics")),
    };

    Ok(vec![
        StatEntry::Line(StatResult::new(EARLIEST_BIRTH_YEAR, StatValue::Year(earliest))),
        StatEntry::Line(StatResult::new(LATEST_BIRTH_YEAR, StatValue::Year(latest))),
        StatEntry::Line(StatResult::new(
            MOST_COMMON_BIRTH_YEAR,
            StatValue::Year(common),
        )),
    ])
}

fn table(header: &'static str, tally: &Tally<&str>) -> FrequencyTable {
    FrequencyTable {
        header,
        rows: tally
            .ranked()
            .into_iter()
            .map(|(k, n)| (k.to_string(), n))
            .collect(),
    }
}
