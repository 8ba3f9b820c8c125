//! Descriptive statistics over a filtered trip view.
//!
//! Each group is a pure pass over a [`FilteredView`]. Groups that need at
//! least one record fail with
//! [`BikeshareError::EmptyDataset`](crate::error::BikeshareError::EmptyDataset)
//! instead of reporting a placeholder.

pub mod duration;
pub mod station;
pub mod tally;
pub mod time;
pub mod types;
pub mod user;

use tracing::debug;

use crate::error::Result;
use crate::filter::FilteredView;
use crate::filters::FilterSpec;
use types::{StatGroup, StatKind};

/// Computes one statistic group.
#[tracing::instrument(skip(view, spec), fields(records = view.len()))]
pub fn compute(
    kind: StatKind,
    view: &FilteredView<'_>,
    spec: &FilterSpec,
) -> Result<StatGroup> {
    let entries = match kind {
        StatKind::TimeOfTravel => time::time_stats(view, spec)?,
        StatKind::Stations => station::station_stats(view)?,
        StatKind::TripDuration => duration::duration_stats(view)?,
        StatKind::Users => user::user_stats(view)?,
    };
    debug!(entries = entries.len(), "Statistic group computed");
    Ok(StatGroup { kind, entries })
}

/// Computes every group in reporting order. A failing group does not stop
/// the ones after it.
pub fn compute_all(
    view: &FilteredView<'_>,
    spec: &FilterSpec,
) -> Vec<(StatKind, Result<StatGroup>)> {
    StatKind::ALL
        .into_iter()
        .map(|kind| (kind, compute(kind, view, spec)))
        .collect()
}
