use crate::error::{BikeshareError, Result};
use crate::filter::FilteredView;
use crate::stats::tally::Tally;
use crate::stats::types::{StatEntry, StatResult, StatValue};

pub const MOST_USED_START: &str = "Most used start station:";
pub const MOST_USED_END: &str = "Most used end station:";
pub const MOST_FREQUENT_TRIP: &str = "Most frequent start end trip:";

/// Most used start station, end station and start/end pair.
///
/// Ties go to whichever candidate appears first in dataset row order.
pub fn station_stats(view: &FilteredView<'_>) -> Result<Vec<StatEntry>> {
    let total = view.len() as u64;

    let starts: Tally<&str> = view.iter().map(|r| r.start_station()).collect();
    let ends: Tally<&str> = view.iter().map(|r| r.end_station()).collect();
    let trips: Tally<(&str, &str)> = view
        .iter()
        .map(|r| (r.start_station(), r.end_station()))
        .collect();

    let (&start, start_count) = starts
        .first_mode()
        .ok_or_else(|| BikeshareError::empty("most used start station"))?;
    let (&end, end_count) = ends
        .first_mode()
        .ok_or_else(|| BikeshareError::empty("most used end station"))?;
    let (&(trip_start, trip_end), trip_count) = trips
        .first_mode()
        .ok_or_else(|| BikeshareError::empty("most frequent trip"))?;

    Ok(vec![
        StatEntry::Line(
            StatResult::new(MOST_USED_START, StatValue::Station(start.to_string()))
                .with_count(start_count, total),
        ),
        StatEntry::Line(
            StatResult::new(MOST_USED_END, StatValue::Station(end.to_string()))
                .with_count(end_count, total),
        ),
        StatEntry::Line(
            StatResult::new(
                MOST_FREQUENT_TRIP,
                StatValue::Trip {
                    start: trip_start.to_string(),
                    end: trip_end.to_string(),
                },
            )
            .with_count(trip_count, total),
        ),
    ])
}
