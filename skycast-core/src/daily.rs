//! Day bucketing of the 3-hourly forecast series and the derived statistics
//! the forecast panel renders.
//!
//! Pure transforms: no clock reads, no state. The caller chooses the time
//! zone the calendar is cut in (the viewer's local zone in production, fixed
//! offsets in tests).

use chrono::{NaiveDate, TimeZone, Timelike};

use crate::model::ForecastSample;

/// Number of distinct calendar dates the dashboard shows.
pub const HORIZON_DAYS: usize = 5;

/// One calendar day of forecast samples.
#[derive(Debug, Clone)]
pub struct DailyBucket {
    pub date: NaiveDate,
    /// Every sample of the day, input order preserved.
    pub samples: Vec<ForecastSample>,
    /// The "noon-ish" display sample: the middle daytime sample, or the
    /// day's first sample when the day has no daytime coverage (the horizon's
    /// partial first and last days).
    pub representative: ForecastSample,
    /// Min of `temp_min` over all of the day's samples, not just daytime.
    pub min_temp: f64,
    /// Max of `temp_max` over all of the day's samples.
    pub max_temp: f64,
}

/// Group a forecast series into at most [`HORIZON_DAYS`] buckets, one per
/// calendar date present in the input, ascending by date.
///
/// No gap filling: a date with no samples gets no bucket.
pub fn group_by_day<Tz: TimeZone>(series: &[ForecastSample], tz: &Tz) -> Vec<DailyBucket> {
    let mut days: Vec<(NaiveDate, Vec<ForecastSample>)> = Vec::new();

    for sample in series {
        let Some(local) = tz.timestamp_opt(sample.dt, 0).single() else {
            continue;
        };
        let date = local.date_naive();
        match days.iter_mut().find(|(day, _)| *day == date) {
            Some((_, samples)) => samples.push(sample.clone()),
            None => days.push((date, vec![sample.clone()])),
        }
    }

    days.sort_by_key(|(date, _)| *date);
    days.truncate(HORIZON_DAYS);

    days.into_iter()
        .filter_map(|(date, samples)| build_bucket(date, samples, tz))
        .collect()
}

fn build_bucket<Tz: TimeZone>(
    date: NaiveDate,
    samples: Vec<ForecastSample>,
    tz: &Tz,
) -> Option<DailyBucket> {
    let daytime: Vec<&ForecastSample> = samples
        .iter()
        .filter(|sample| {
            tz.timestamp_opt(sample.dt, 0)
                .single()
                .is_some_and(|local| (6..=18).contains(&local.hour()))
        })
        .collect();

    let representative = daytime
        .get(daytime.len() / 2)
        .map(|sample| (*sample).clone())
        .or_else(|| samples.first().cloned())?;

    let min_temp = samples
        .iter()
        .map(|s| s.main.temp_min)
        .fold(f64::INFINITY, f64::min);
    let max_temp = samples
        .iter()
        .map(|s| s.main.temp_max)
        .fold(f64::NEG_INFINITY, f64::max);

    Some(DailyBucket {
        date,
        samples,
        representative,
        min_temp,
        max_temp,
    })
}

/// Mean of each bucket's representative temperature over the visible
/// horizon, rounded to the nearest integer for display.
pub fn average_temp(buckets: &[DailyBucket]) -> Option<i64> {
    if buckets.is_empty() {
        return None;
    }

    let sum: f64 = buckets.iter().map(|b| b.representative.main.temp).sum();
    Some((sum / buckets.len() as f64).round() as i64)
}
