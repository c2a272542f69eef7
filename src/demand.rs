use crate::error::{Error, Result};
use crate::hour::Hour;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

pub type LocationId = Arc<str>;

/// One service event as delivered by the data-access layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub location: LocationId,
    #[serde(default)]
    pub started_at: Option<String>,
}

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| {
            TIMESTAMP_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        })
}

/// Average arrivals per hour over a contiguous range of hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HourlyDemand {
    values: BTreeMap<Hour, f64>,
}

impl HourlyDemand {
    pub fn new(values: BTreeMap<Hour, f64>) -> Result<Self> {
        if let (Some(first), Some(last)) = (values.keys().next(), values.keys().next_back()) {
            if *last > Hour::LAST {
                return Err(Error::InvalidHourRange { open: first.0, close: last.0 });
            }
        }
        let mut expected: Option<Hour> = None;
        for (hour, value) in &values {
            if let Some(expected) = expected {
                if *hour != expected {
                    return Err(Error::NonContiguousHours { expected, found: *hour });
                }
            }
            if !value.is_finite() {
                return Err(Error::NonFiniteDemand { hour: *hour });
            }
            if *value < 0.0 {
                return Err(Error::NegativeDemand { hour: *hour, value: *value });
            }
            expected = Some(*hour + 1);
        }
        Ok(HourlyDemand { values })
    }

    /// Demand starting at `first`, one value per consecutive hour.
    pub fn from_values(first: Hour, values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Ok(HourlyDemand::default());
        }
        let last = u8::try_from(values.len() - 1)
            .ok()
            .and_then(|offset| first.0.checked_add(offset))
            .filter(|last| *last <= Hour::LAST.0)
            .ok_or(Error::InvalidHourRange {
                open: first.0,
                close: u8::try_from(first.0 as usize + values.len() - 1).unwrap_or(u8::MAX),
            })?;
        HourlyDemand::new(Hour::span(first, Hour(last)).zip(values.iter().copied()).collect())
    }

    pub fn get(&self, hour: Hour) -> f64 {
        self.values.get(&hour).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Hour, f64)> + '_ {
        self.values.iter().map(|(h, v)| (*h, *v))
    }

    pub fn hours(&self) -> impl Iterator<Item = Hour> + '_ {
        self.values.keys().copied()
    }

    pub fn first(&self) -> Option<Hour> {
        self.values.keys().next().copied()
    }

    pub fn last(&self) -> Option<Hour> {
        self.values.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }

    pub fn peak(&self) -> Option<(Hour, f64)> {
        self.iter().fold(None, |best, (h, v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((h, v)),
        })
    }
}

/// Builds the average hourly demand for `first..=last` from event timestamps.
///
/// Events are counted per calendar day and hour, and each hour's counts are
/// averaged over the days on which that hour saw traffic. Hours without any
/// event are zero. Missing or unparsable timestamps are dropped.
pub fn aggregate<'a>(events: impl IntoIterator<Item = &'a Event>, first: Hour, last: Hour) -> Result<HourlyDemand> {
    if first > last || last > Hour::LAST {
        return Err(Error::InvalidHourRange { open: first.0, close: last.0 });
    }

    let mut discarded = 0usize;
    let mut daily = BTreeMap::<(NaiveDate, Hour), u32>::new();
    for event in events {
        match event.started_at.as_deref().and_then(parse_timestamp) {
            Some(ts) => *daily.entry((ts.date(), Hour(ts.hour() as u8))).or_default() += 1,
            None => discarded += 1,
        }
    }
    if discarded > 0 {
        warn!(discarded, "dropped events without a usable timestamp");
    }

    let mut per_hour = BTreeMap::<Hour, (u32, u32)>::new();
    for ((_, hour), count) in daily {
        let (sum, days) = per_hour.entry(hour).or_default();
        *sum += count;
        *days += 1;
    }

    HourlyDemand::new(
        Hour::span(first, last)
            .map(|hour| {
                let avg = per_hour
                    .get(&hour)
                    .map(|(sum, days)| *sum as f64 / *days as f64)
                    .unwrap_or(0.0);
                (hour, avg)
            })
            .collect(),
    )
}

/// One demand curve per location, ordered by location id.
pub fn aggregate_by_location(events: &[Event], first: Hour, last: Hour) -> Result<BTreeMap<LocationId, HourlyDemand>> {
    let mut grouped = BTreeMap::<LocationId, Vec<&Event>>::new();
    events
        .iter()
        .for_each(|e| grouped.entry(e.location.clone()).or_default().push(e));

    grouped
        .into_iter()
        .map(|(location, events)| Ok((location, aggregate(events, first, last)?)))
        .collect()
}
