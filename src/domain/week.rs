// ISO week bucketing
use chrono::{DateTime, Datelike, Duration, FixedOffset};

/// `"<iso week-year>-<iso week>w"`, evaluated in the given offset.
pub fn week_label(ts: &DateTime<FixedOffset>, offset: &FixedOffset) -> String {
    let week = ts.with_timezone(offset).iso_week();
    format!("{}-{}w", week.year(), week.week())
}

/// One label per week from `start_at`, stepping a week at a time while the
/// cursor is strictly before `end_at`. A week starting exactly at `end_at` is
/// not included.
pub fn build_weeks(start_at: &DateTime<FixedOffset>, end_at: &DateTime<FixedOffset>) -> Vec<String> {
    let offset = *start_at.offset();
    let mut weeks = Vec::new();
    let mut cursor = *start_at;
    while cursor < *end_at {
        weeks.push(week_label(&cursor, &offset));
        cursor += Duration::weeks(1);
    }
    weeks
}
