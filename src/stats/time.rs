use crate::error::{BikeshareError, Result};
use crate::filter::FilteredView;
use crate::filters::{FilterSpec, WEEK};
use crate::stats::tally::Tally;
use crate::stats::types::{StatEntry, StatResult, StatValue};

pub const MOST_COMMON_MONTH: &str = "Most common month of ride:";
pub const MOST_COMMON_DAY: &str = "Most common day of ride:";
pub const MOST_COMMON_HOUR: &str = "Most common hour:";

/// Most frequent month, weekday and start hour.
///
/// Month and weekday are only reported when the corresponding filter is
/// `all`; a pinned dimension has a single value and nothing to report.
/// Ties go to the earliest month, the earliest weekday (Monday first) and
/// the earliest hour.
pub fn time_stats(view: &FilteredView<'_>, spec: &FilterSpec) -> Result<Vec<StatEntry>> {
    if view.is_empty() {
        return Err(BikeshareError::empty("most common start hour"));
    }
    let total = view.len() as u64;
    let mut entries = Vec::new();

    if spec.month.is_all() {
        let months: Tally<u32> = view.iter().map(|r| r.month()).collect();
        if let Some((&month, count)) = months.smallest_mode() {
            entries.push(StatEntry::Line(
                StatResult::new(MOST_COMMON_MONTH, StatValue::Month(month))
                    .with_count(count, total),
            ));
        }
    }

    if spec.weekday.is_all() {
        let days: Tally<u32> = view
            .iter()
            .map(|r| r.weekday().num_days_from_monday())
            .collect();
        if let Some((&day, count)) = days.smallest_mode() {
            entries.push(StatEntry::Line(
                StatResult::new(MOST_COMMON_DAY, StatValue::Weekday(WEEK[day as usize]))
                    .with_count(count, total),
            ));
        }
    }

    let hours: Tally<u32> = view.iter().map(|r| r.start_hour()).collect();
    let (&hour, count) = hours
        .smallest_mode()
        .ok_or_else(|| BikeshareError::empty("most common start hour"))?;
    entries.push(StatEntry::Line(
        StatResult::new(MOST_COMMON_HOUR, StatValue::Hour(hour)).with_count(count, total),
    ));

    Ok(entries)
}
