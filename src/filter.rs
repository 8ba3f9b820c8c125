//! Month/weekday predicates over a loaded [`Dataset`].

use crate::filters::{MonthFilter, Selection, WeekdayFilter};
use crate::loader::{Dataset, TripRecord};

/// A read-only subset of a dataset, stored as row indices in file order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    rows: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// View over every record of `dataset`.
    pub fn all(dataset: &'a Dataset) -> Self {
        FilteredView {
            dataset,
            rows: (0..dataset.len()).collect(),
        }
    }

    /// Narrows this view further. Both predicates must hold.
    pub fn filter(&self, month: MonthFilter, weekday: WeekdayFilter) -> FilteredView<'a> {
        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&i| matches(&self.dataset.records()[i], month, weekday))
            .collect();
        FilteredView {
            dataset: self.dataset,
            rows,
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Row indices into the underlying dataset.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TripRecord> + '_ {
        let records = self.dataset.records();
        self.rows.iter().map(move |&i| &records[i])
    }
}

impl PartialEq for FilteredView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.dataset, other.dataset) && self.rows == other.rows
    }
}

impl Eq for FilteredView<'_> {}

/// Applies the month and weekday predicates to the whole dataset.
pub fn filter<'a>(
    dataset: &'a Dataset,
    month: MonthFilter,
    weekday: WeekdayFilter,
) -> FilteredView<'a> {
    FilteredView::all(dataset).filter(month, weekday)
}

fn matches(record: &TripRecord, month: MonthFilter, weekday: WeekdayFilter) -> bool {
    let month_ok = match month {
        Selection::All => true,
        Selection::Only(m) => record.month() == m.number(),
    };
    let weekday_ok = match weekday {
        Selection::All => true,
        Selection::Only(d) => record.weekday() == d,
    };
    month_ok && weekday_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{City, Month};
    use chrono::{NaiveDate, Weekday};

    fn trip(y: i32, m: u32, d: u32, h: u32, secs: u64) -> TripRecord {
        let start = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap();
        TripRecord::new(start, start, secs, "A", "B", "Subscriber")
    }

    fn dataset() -> Dataset {
        Dataset::new(
            City::Chicago,
            vec![
                trip(2017, 1, 2, 8, 100),  // Monday
                trip(2017, 1, 3, 9, 200),  // Tuesday
                trip(2017, 2, 6, 8, 300),  // Monday
                trip(2017, 3, 7, 17, 400), // Tuesday
                trip(2017, 6, 5, 8, 500),  // Monday
            ],
            false,
            false,
        )
    }

    const MONTHS: [MonthFilter; 7] = [
        Selection::All,
        Selection::Only(Month::January),
        Selection::Only(Month::February),
        Selection::Only(Month::March),
        Selection::Only(Month::April),
        Selection::Only(Month::May),
        Selection::Only(Month::June),
    ];

    const DAYS: [WeekdayFilter; 8] = [
        Selection::All,
        Selection::Only(Weekday::Mon),
        Selection::Only(Weekday::Tue),
        Selection::Only(Weekday::Wed),
        Selection::Only(Weekday::Thu),
        Selection::Only(Weekday::Fri),
        Selection::Only(Weekday::Sat),
        Selection::Only(Weekday::Sun),
    ];

    #[test]
    fn test_all_keeps_every_record() {
        let ds = dataset();
        let view = filter(&ds, Selection::All, Selection::All);
        assert_eq!(view.rows(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_month_and_weekday_compose() {
        let ds = dataset();
        let view = filter(&ds, Selection::Only(Month::January), Selection::Only(Weekday::Mon));
        assert_eq!(view.rows(), &[0]);

        let mondays = filter(&ds, Selection::All, Selection::Only(Weekday::Mon));
        assert_eq!(mondays.rows(), &[0, 2, 4]);
    }

    #[test]
    fn test_filter_is_commutative() {
        let ds = dataset();
        for month in MONTHS {
            for day in DAYS {
                let direct = filter(&ds, month, day);
                let month_first = filter(&ds, month, Selection::All).filter(Selection::All, day);
                let day_first = filter(&ds, Selection::All, day).filter(month, Selection::All);
                assert_eq!(direct, month_first);
                assert_eq!(direct, day_first);
            }
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let ds = dataset();
        for month in MONTHS {
            for day in DAYS {
                let once = filter(&ds, month, day);
                let twice = once.filter(month, day);
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_empty_result_is_valid() {
        let ds = dataset();
        let view = filter(&ds, Selection::Only(Month::April), Selection::All);
        assert!(view.is_empty());
        assert_eq!(view.iter().count(), 0);
    }

    #[test]
    fn test_source_is_untouched() {
        let ds = dataset();
        let before = ds.records().to_vec();
        let _ = filter(&ds, Selection::Only(Month::March), Selection::Only(Weekday::Tue));
        assert_eq!(ds.records(), before.as_slice());
    }
}
