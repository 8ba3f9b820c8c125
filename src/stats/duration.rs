use crate::error::{BikeshareError, Result};
use crate::filter::FilteredView;
use crate::stats::types::{StatEntry, StatResult, StatValue};

pub const TOTAL_TRAVEL_TIME: &str = "Total travel time:";
pub const AVERAGE_TRAVEL_TIME: &str = "Average travel time:";

/// Sum of trip durations in seconds.
pub fn total_duration(view: &FilteredView<'_>) -> u64 {
    view.iter().map(|r| r.duration_secs()).sum()
}

/// Mean trip duration in whole seconds, truncated.
pub fn average_duration(view: &FilteredView<'_>) -> Result<u64> {
    if view.is_empty() {
        return Err(BikeshareError::empty("average trip duration"));
    }
    Ok(total_duration(view) / view.len() as u64)
}

pub fn duration_stats(view: &FilteredView<'_>) -> Result<Vec<StatEntry>> {
    let average = average_duration(view)?;
    let total = total_duration(view);

    Ok(vec![
        StatEntry::Line(StatResult::new(
            TOTAL_TRAVEL_TIME,
            StatValue::TotalDuration(total),
        )),
        StatEntry::Line(StatResult::new(
            AVERAGE_TRAVEL_TIME,
            StatValue::AverageDuration(average),
        )),
    ])
}
