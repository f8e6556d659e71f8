// Week-bucketed aggregation over raw log records
//
// Every weekly chart is the same pipeline: pick a category universe, lay out
// the week axis for the range, drop records outside either, and fold each
// remaining record's sample into its (category, week) slot with a reducer.
use super::logs::{MpLog, ProjectProgress, WeeklyRecord};
use super::series::SeriesByCategory;
use super::time_range::TimeRange;
use super::week::{build_weeks, week_label};
use crate::error::Result;
use chrono::{DateTime, FixedOffset};
use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;

impl<T: WeeklyRecord> WeeklyRecord for &T {
    fn category(&self) -> &str {
        (**self).category()
    }

    fn occurred_at(&self) -> &DateTime<FixedOffset> {
        (**self).occurred_at()
    }
}

/// Folds samples landing in one week slot into the value shown for that week.
pub trait WeekReducer {
    type Sample;
    type Acc: Default + Clone;
    type Output;

    fn push(&self, acc: &mut Self::Acc, sample: Self::Sample);
    fn finish(&self, acc: Self::Acc) -> Self::Output;
}

pub struct Count;

impl WeekReducer for Count {
    type Sample = ();
    type Acc = u64;
    type Output = u64;

    fn push(&self, acc: &mut u64, _sample: ()) {
        *acc += 1;
    }

    fn finish(&self, acc: u64) -> u64 {
        acc
    }
}

/// Arithmetic mean; a week without samples has no value.
pub struct Mean;

#[derive(Debug, Default, Clone)]
pub struct MeanAcc {
    sum: f64,
    samples: u32,
}

impl WeekReducer for Mean {
    type Sample = f64;
    type Acc = MeanAcc;
    type Output = Option<f64>;

    fn push(&self, acc: &mut MeanAcc, sample: f64) {
        acc.sum += sample;
        acc.samples += 1;
    }

    fn finish(&self, acc: MeanAcc) -> Option<f64> {
        (acc.samples > 0).then(|| acc.sum / acc.samples as f64)
    }
}

/// Category universe: the allow-list in its own order, or every category
/// seen in `records` sorted.
fn category_universe<T: WeeklyRecord>(records: &[T], allow_list: Option<&[String]>) -> Vec<String> {
    match allow_list {
        Some(list) => {
            let mut seen = BTreeSet::new();
            list.iter()
                .filter(|c| seen.insert(c.as_str()))
                .cloned()
                .collect()
        }
        None => records
            .iter()
            .map(|r| r.category().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
    }
}

/// Aggregate `records` into one series per category over the range's week axis.
///
/// Records outside the category universe or whose week is not on the axis are
/// skipped. `sample` extracts the value to fold; returning `Ok(None)` skips the
/// record, an error aborts the aggregation. Samplers that cannot fail use
/// `Infallible` as their error type.
pub fn aggregate_weekly<T, R, F, E>(
    records: &[T],
    range: &TimeRange,
    allow_list: Option<&[String]>,
    reducer: &R,
    mut sample: F,
) -> std::result::Result<Vec<SeriesByCategory<R::Output>>, E>
where
    T: WeeklyRecord,
    R: WeekReducer,
    F: FnMut(&T) -> std::result::Result<Option<R::Sample>, E>,
{
    let categories = category_universe(records, allow_list);
    let weeks = build_weeks(&range.start_at, &range.end_at);
    let week_index: HashMap<&str, usize> = weeks
        .iter()
        .enumerate()
        .map(|(i, w)| (w.as_str(), i))
        .collect();

    let mut slots: HashMap<&str, Vec<R::Acc>> = categories
        .iter()
        .map(|c| (c.as_str(), vec![R::Acc::default(); weeks.len()]))
        .collect();

    let offset = range.start_at.offset();
    for record in records {
        let Some(category_slots) = slots.get_mut(record.category()) else {
            continue;
        };

        let label = week_label(record.occurred_at(), offset);
        let Some(&index) = week_index.get(label.as_str()) else {
            continue;
        };

        if let Some(value) = sample(record)? {
            reducer.push(&mut category_slots[index], value);
        }
    }

    let series = categories
        .iter()
        .map(|category| {
            let values = slots
                .remove(category.as_str())
                .unwrap_or_default()
                .into_iter()
                .map(|acc| reducer.finish(acc))
                .collect();
            SeriesByCategory::new(category.clone(), weeks.clone(), values)
        })
        .collect();

    Ok(series)
}

/// Number of records per category per week.
pub fn count_per_week<T: WeeklyRecord>(
    records: &[T],
    range: &TimeRange,
    allow_list: Option<&[String]>,
) -> Vec<SeriesByCategory<u64>> {
    let Ok(counted) = aggregate_weekly(records, range, allow_list, &Count, |_| Ok::<_, Infallible>(Some(())));
    counted
}

/// Mean project duration in hours per IC per week. Zero durations count as
/// missing data and are left out of both the sum and the sample count.
pub fn average_duration_per_week(
    progress: &[ProjectProgress],
    range: &TimeRange,
    allow_list: Option<&[String]>,
) -> Result<Vec<SeriesByCategory<Option<f64>>>> {
    aggregate_weekly(progress, range, allow_list, &Mean, |p| -> Result<Option<f64>> {
        let hours = p.duration_hours()?;
        Ok((hours != 0.0).then_some(hours))
    })
}

/// Selects MP logs by IC or by firmware version prefix.
#[derive(Debug, Clone, Default)]
pub struct MpLogFilter {
    pub ics: Vec<String>,
    pub fw_prefixes: Vec<String>,
}

impl MpLogFilter {
    pub fn matches(&self, log: &MpLog) -> bool {
        self.ics.iter().any(|ic| *ic == log.ic)
            || self
                .fw_prefixes
                .iter()
                .any(|prefix| log.fw_version.starts_with(prefix.as_str()))
    }
}

/// MP runs per IC per week for the logs passing `filter`.
pub fn mp_count_per_week(logs: &[MpLog], range: &TimeRange, filter: &MpLogFilter) -> Vec<SeriesByCategory<u64>> {
    let selected: Vec<&MpLog> = logs.iter().filter(|log| filter.matches(log)).collect();
    count_per_week(&selected, range, None)
}
