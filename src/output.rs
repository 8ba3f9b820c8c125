//! Text rendering of statistics and raw trip records.
//!
//! Statistic lines put the value at a fixed column so a report reads as two
//! aligned columns. Records are exported as ordered JSON objects or as a
//! plain text table.

use std::io::{self, Write};
use std::time::Instant;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::warn;

use crate::filter::FilteredView;
use crate::filters::{FilterSpec, weekday_name};
use crate::loader::{
    self, BIRTH_YEAR, Dataset, END_STATION, END_TIME, GENDER, START_STATION, START_TIME,
    TRIP_DURATION, TripRecord, USER_TYPE,
};
use crate::stats;
use crate::stats::types::{CountInfo, FrequencyTable, StatEntry, StatGroup, StatKind, StatResult};

/// Column at which statistic values start.
pub const MSG_LENGTH: usize = 50;
/// Width of the line separating report sections.
pub const DIVIDER_LENGTH: usize = 150;
/// Records shown per page in the raw view.
pub const RAW_PAGE_SIZE: usize = 5;

pub const MONTH: &str = "Month";
pub const DAY_OF_WEEK: &str = "Day of week";

pub fn divider() -> String {
    "-".repeat(DIVIDER_LENGTH)
}

pub fn section_header(kind: StatKind) -> String {
    format!("- - - {} - - -", kind.title())
}

/// `count: <n> (<pct>%)   total: <m>`, pct with two decimals.
pub fn count_info(info: &CountInfo) -> String {
    format!(
        "count: {} ({:.2}%)   total: {}",
        info.count,
        info.pct(),
        info.total
    )
}

/// Pads `label` to [`MSG_LENGTH`] characters and appends the value. A label
/// at or over that width is followed directly by the value.
pub fn format_line(label: &str, value: &str, annotation: Option<&CountInfo>) -> String {
    let mut line = String::from(label);
    let width = label.chars().count();
    if width < MSG_LENGTH {
        line.push_str(&" ".repeat(MSG_LENGTH - width));
    }
    line.push_str(value);
    if let Some(info) = annotation {
        line.push_str("    ");
        line.push_str(&count_info(info));
    }
    line
}

pub fn format_result(result: &StatResult) -> String {
    format_line(
        result.label,
        &result.value.to_string(),
        result.count.as_ref(),
    )
}

/// Header line followed by one `# of <category>s:` line per row.
pub fn format_table(table: &FrequencyTable) -> Vec<String> {
    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(table.header.to_string());
    for (category, count) in &table.rows {
        lines.push(format_line(
            &format!("# of {category}s:"),
            &count.to_string(),
            None,
        ));
    }
    lines
}

/// Renders a group's entries. Tables and headings after the first entry are
/// preceded by a blank line.
pub fn format_group(group: &StatGroup) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, entry) in group.entries.iter().enumerate() {
        match entry {
            StatEntry::Line(result) => lines.push(format_result(result)),
            StatEntry::Table(table) => {
                if i > 0 {
                    lines.push(String::new());
                }
                lines.extend(format_table(table));
            }
            StatEntry::Heading(heading) => {
                if i > 0 {
                    lines.push(String::new());
                }
                lines.push(heading.to_string());
            }
            StatEntry::Unavailable(reason) => lines.push(format!("Unavailable: {reason}")),
        }
    }
    lines
}

/// Writes all four statistic groups for `view`, each under its heading and
/// the filter description, followed by the time it took to compute. A group
/// that fails is reported by its error message and the rest still run.
pub fn write_report<W: Write>(
    out: &mut W,
    view: &FilteredView<'_>,
    spec: &FilterSpec,
) -> io::Result<()> {
    for kind in StatKind::ALL {
        writeln!(out)?;
        writeln!(out, "{}", section_header(kind))?;
        writeln!(out, "{spec}")?;
        writeln!(out)?;

        let started = Instant::now();
        match stats::compute(kind, view, spec) {
            Ok(group) => {
                for line in format_group(&group) {
                    writeln!(out, "{line}")?;
                }
            }
            Err(e) => {
                warn!(group = kind.title(), error = %e, "Statistic group failed");
                writeln!(out, "Unavailable: {e}")?;
            }
        }

        writeln!(out)?;
        writeln!(out, "This took {} seconds.", started.elapsed().as_secs_f64())?;
        writeln!(out, "{}", divider())?;
    }
    Ok(())
}

/// Column name to value mapping for one record, in source column order,
/// followed by the derived month and weekday. Optional columns appear only
/// when the dataset has them.
pub fn record_json(dataset: &Dataset, record: &TripRecord) -> Value {
    let mut map = Map::new();
    map.insert(
        START_TIME.into(),
        record
            .start_time()
            .format(loader::TIMESTAMP_OUTPUT_FORMAT)
            .to_string()
            .into(),
    );
    map.insert(
        END_TIME.into(),
        record
            .end_time()
            .format(loader::TIMESTAMP_OUTPUT_FORMAT)
            .to_string()
            .into(),
    );
    map.insert(TRIP_DURATION.into(), record.duration_secs().into());
    map.insert(START_STATION.into(), record.start_station().into());
    map.insert(END_STATION.into(), record.end_station().into());
    map.insert(USER_TYPE.into(), optional_text(record.user_type()));
    if dataset.has_gender() {
        map.insert(
            GENDER.into(),
            record.gender().map_or(Value::Null, Value::from),
        );
    }
    if dataset.has_birth_year() {
        map.insert(
            BIRTH_YEAR.into(),
            record.birth_year().map_or(Value::Null, Value::from),
        );
    }
    map.insert(MONTH.into(), record.month().into());
    map.insert(DAY_OF_WEEK.into(), weekday_name(record.weekday()).into());
    Value::Object(map)
}

fn optional_text(s: &str) -> Value {
    if s.is_empty() {
        Value::Null
    } else {
        Value::from(s)
    }
}

/// JSON with four-space indentation.
pub fn to_pretty_json(value: &impl Serialize) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    // serde_json only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Text table of `len` records of the view starting at `start`, with the
/// dataset row index in the first column.
pub fn format_raw_page(view: &FilteredView<'_>, start: usize, len: usize) -> Vec<String> {
    let dataset = view.dataset();

    let mut header: Vec<String> = vec![
        String::new(),
        START_TIME.into(),
        END_TIME.into(),
        TRIP_DURATION.into(),
        START_STATION.into(),
        END_STATION.into(),
        USER_TYPE.into(),
    ];
    if dataset.has_gender() {
        header.push(GENDER.into());
    }
    if dataset.has_birth_year() {
        header.push(BIRTH_YEAR.into());
    }
    header.push(MONTH.into());
    header.push(DAY_OF_WEEK.into());

    let mut rows = vec![header];
    for &i in view.rows().iter().skip(start).take(len) {
        let r = &dataset.records()[i];
        let mut row = vec![
            i.to_string(),
            r.start_time().format(loader::TIMESTAMP_OUTPUT_FORMAT).to_string(),
            r.end_time().format(loader::TIMESTAMP_OUTPUT_FORMAT).to_string(),
            r.duration_secs().to_string(),
            r.start_station().to_string(),
            r.end_station().to_string(),
            r.user_type().to_string(),
        ];
        if dataset.has_gender() {
            row.push(r.gender().unwrap_or("NaN").to_string());
        }
        if dataset.has_birth_year() {
            row.push(r.birth_year().map_or("NaN".to_string(), |y| y.to_string()));
        }
        row.push(r.month().to_string());
        row.push(weekday_name(r.weekday()).to_string());
        rows.push(row);
    }

    let columns = rows[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|c| rows.iter().map(|row| row[c].chars().count()).max().unwrap_or(0))
        .collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:>w$}"))
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter;
    use crate::filters::{City, Selection};
    use crate::stats::types::StatValue;
    use chrono::NaiveDate;

    fn record() -> TripRecord {
        let start = NaiveDate::from_ymd_opt(2017, 1, 2)
            .unwrap()
            .and_hms_opt(8, 5, 30)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2017, 1, 2)
            .unwrap()
            .and_hms_opt(8, 7, 30)
            .unwrap();
        TripRecord::new(start, end, 120, "Canal St", "Clark St", "Subscriber")
            .with_birth_year(1988)
    }

    #[test]
    fn test_count_info() {
        let info = CountInfo { count: 2, total: 3 };
        assert_eq!(count_info(&info), "count: 2 (66.67%)   total: 3");
        let info = CountInfo { count: 1, total: 8 };
        assert_eq!(count_info(&info), "count: 1 (12.50%)   total: 8");
    }

    #[test]
    fn test_format_line_pads_to_column() {
        let line = format_line("Most common hour:", "17", None);
        assert_eq!(line.len(), MSG_LENGTH + 2);
        assert!(line.starts_with("Most common hour:  "));
        assert_eq!(&line[MSG_LENGTH..], "17");
    }

    #[test]
    fn test_format_line_long_label_gets_no_padding() {
        let label = "x".repeat(MSG_LENGTH + 3);
        assert_eq!(format_line(&label, "v", None), format!("{label}v"));
        let label = "y".repeat(MSG_LENGTH);
        assert_eq!(format_line(&label, "v", None), format!("{label}v"));
    }

    #[test]
    fn test_format_result_with_annotation() {
        let result = StatResult::new("Most common month of ride:", StatValue::Month(1))
            .with_count(2, 3);
        let line = format_result(&result);
        assert_eq!(
            &line[MSG_LENGTH..],
            "January    count: 2 (66.67%)   total: 3"
        );
    }

    #[test]
    fn test_format_table() {
        let table = FrequencyTable {
            header: "- Counts of user types -",
            rows: vec![("Subscriber".into(), 5), ("Customer".into(), 2)],
        };
        let lines = format_table(&table);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "- Counts of user types -");
        assert!(lines[1].starts_with("# of Subscribers:"));
        assert!(lines[1].ends_with(" 5"));
        assert!(lines[2].starts_with("# of Customers:"));
    }

    #[test]
    fn test_record_json_omits_absent_columns() {
        let ds = Dataset::new(City::Chicago, vec![record()], false, true);
        let json = record_json(&ds, &ds.records()[0]);
        let obj = json.as_object().unwrap();

        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                START_TIME,
                END_TIME,
                TRIP_DURATION,
                START_STATION,
                END_STATION,
                USER_TYPE,
                BIRTH_YEAR,
                MONTH,
                DAY_OF_WEEK
            ]
        );
        assert_eq!(obj[START_TIME], "2017-01-02 08:05:30");
        assert_eq!(obj[TRIP_DURATION], 120);
        assert_eq!(obj[BIRTH_YEAR], 1988);
        assert_eq!(obj[DAY_OF_WEEK], "Monday");
    }

    #[test]
    fn test_pretty_json_uses_four_spaces() {
        let ds = Dataset::new(City::Chicago, vec![record()], false, false);
        let text = to_pretty_json(&record_json(&ds, &ds.records()[0])).unwrap();
        assert!(text.starts_with("{\n    \"Start Time\": "));
    }

    #[test]
    fn test_report_sections_in_order() {
        let ds = Dataset::new(City::Chicago, vec![record()], false, true);
        let spec = FilterSpec::new(City::Chicago, Selection::All, Selection::All);
        let view = filter(&ds, spec.month, spec.weekday);

        let mut buf = Vec::new();
        write_report(&mut buf, &view, &spec).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let positions: Vec<usize> = StatKind::ALL
            .iter()
            .map(|k| text.find(k.title()).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(text.matches("(filter -> City: Chicago, Month: All, Day: All)").count(), 4);
        assert!(text.contains("Most used start station:"));
        assert!(text.contains("Most common birth year:"));
        assert_eq!(text.matches(&divider()).count(), 4);
    }

    #[test]
    fn test_report_shows_errors_for_empty_view() {
        let ds = Dataset::new(City::Chicago, vec![record()], false, false);
        let spec = FilterSpec::new(
            City::Chicago,
            Selection::Only(crate::filters::Month::June),
            Selection::All,
        );
        let view = filter(&ds, spec.month, spec.weekday);

        let mut buf = Vec::new();
        write_report(&mut buf, &view, &spec).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text.matches("Unavailable: cannot compute").count(), 3);
        assert!(text.contains("- Counts of user types -"));
    }

    #[test]
    fn test_raw_page() {
        let ds = Dataset::new(City::Chicago, vec![record(), record(), record()], true, true);
        let view = filter(&ds, Selection::All, Selection::All);
        let lines = format_raw_page(&view, 2, RAW_PAGE_SIZE);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Start Time"));
        assert!(lines[1].trim_start().starts_with('2'));
        assert!(lines[1].contains("NaN"));
        assert!(lines[1].ends_with("Monday"));
    }
}
