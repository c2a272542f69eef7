use crate::error::{Error, Result};
use crate::hour::Hour;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShiftKind {
    FullTime,
    PartTime,
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ShiftKind::FullTime => write!(f, "FT"),
            ShiftKind::PartTime => write!(f, "PT"),
        }
    }
}

/// Lookup key of a shift: its kind and start hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShiftId {
    pub kind: ShiftKind,
    pub start: Hour,
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{:02}", self.kind, self.start.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    pub id: ShiftId,
    pub duration: u8,
}

impl ShiftDefinition {
    pub fn new(kind: ShiftKind, start: Hour, duration: u8) -> Self {
        ShiftDefinition {
            id: ShiftId { kind, start },
            duration,
        }
    }

    pub fn kind(&self) -> ShiftKind {
        self.id.kind
    }

    pub fn start(&self) -> Hour {
        self.id.start
    }

    /// Last hour worked, inclusive.
    pub fn end(&self) -> Hour {
        self.id.start + (self.duration - 1)
    }

    pub fn covers(&self, hour: Hour) -> bool {
        hour.is_within(&(self.start(), self.end()))
    }

    pub fn hours(&self) -> impl Iterator<Item = Hour> {
        Hour::span(self.start(), self.end())
    }
}

/// Every shift offered to the model for one operating window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftCatalog {
    full_time: Vec<ShiftDefinition>,
    part_time: Vec<ShiftDefinition>,
}

impl ShiftCatalog {
    /// Enumerates one shift per start hour for both durations, keeping only
    /// shifts that finish by `last`.
    pub fn build(first: Hour, last: Hour, full_time_hours: u8, part_time_hours: u8) -> Result<Self> {
        if first > last || last > Hour::LAST {
            return Err(Error::InvalidHourRange { open: first.0, close: last.0 });
        }
        if full_time_hours == 0 || part_time_hours == 0 {
            return Err(Error::InvalidPolicy(format!(
                "shift durations must be positive, got {} and {}",
                full_time_hours, part_time_hours
            )));
        }
        let enumerate = |kind: ShiftKind, duration: u8| {
            Hour::span(first, last)
                .filter(|start| start.0 as u16 + duration as u16 - 1 <= last.0 as u16)
                .map(|start| ShiftDefinition::new(kind, start, duration))
                .collect::<Vec<_>>()
        };
        Ok(ShiftCatalog {
            full_time: enumerate(ShiftKind::FullTime, full_time_hours),
            part_time: enumerate(ShiftKind::PartTime, part_time_hours),
        })
    }

    /// Catalog from explicit definitions, sorted by start hour.
    pub fn from_definitions(shifts: Vec<ShiftDefinition>) -> Result<Self> {
        if let Some(shift) = shifts.iter().find(|s| s.duration == 0) {
            return Err(Error::InvalidPolicy(format!("shift {} has zero duration", shift.id)));
        }
        if let Some(shift) = shifts.iter().find(|s| s.start().0 as u16 + s.duration as u16 - 1 > Hour::LAST.0 as u16) {
            return Err(Error::InvalidPolicy(format!("shift {} runs past midnight", shift.id)));
        }
        let (mut full_time, mut part_time): (Vec<_>, Vec<_>) = shifts
            .into_iter()
            .partition(|s| s.kind() == ShiftKind::FullTime);
        full_time.sort_by_key(|s| s.id);
        part_time.sort_by_key(|s| s.id);
        Ok(ShiftCatalog { full_time, part_time })
    }

    pub fn full_time(&self) -> &[ShiftDefinition] {
        &self.full_time
    }

    pub fn part_time(&self) -> &[ShiftDefinition] {
        &self.part_time
    }

    /// Full-time shifts first, then part-time; the order decision variables use.
    pub fn iter(&self) -> impl Iterator<Item = &ShiftDefinition> {
        self.full_time.iter().chain(self.part_time.iter())
    }

    pub fn len(&self) -> usize {
        self.full_time.len() + self.part_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops shifts that would leave the `(first, last)` window.
    pub(crate) fn within(&self, window: (Hour, Hour)) -> ShiftCatalog {
        let keep = |shifts: &[ShiftDefinition]| {
            shifts
                .iter()
                .filter(|s| s.start().is_within(&window) && s.end().is_within(&window))
                .cloned()
                .collect()
        };
        ShiftCatalog {
            full_time: keep(&self.full_time),
            part_time: keep(&self.part_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_window() {
        let catalog = ShiftCatalog::build(Hour(6), Hour(18), 8, 4).unwrap();

        let ft = catalog.full_time().iter().map(|s| s.start()).collect::<Vec<_>>();
        let pt = catalog.part_time().iter().map(|s| s.start()).collect::<Vec<_>>();
        assert_eq!(Hour::span(Hour(6), Hour(11)).collect::<Vec<_>>(), ft);
        assert_eq!(Hour::span(Hour(6), Hour(15)).collect::<Vec<_>>(), pt);
        assert_eq!(Hour(18), catalog.full_time().last().unwrap().end());
    }

    #[test]
    fn test_window_shorter_than_shifts() {
        let catalog = ShiftCatalog::build(Hour(6), Hour(8), 8, 4).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_single_hour_shift_fits_single_hour_window() {
        let catalog = ShiftCatalog::build(Hour(9), Hour(9), 8, 1).unwrap();
        assert_eq!(0, catalog.full_time().len());
        assert_eq!(1, catalog.part_time().len());
        assert_eq!(vec![Hour(9)], catalog.part_time()[0].hours().collect::<Vec<_>>());
    }

    #[test]
    fn test_rejects_zero_duration() {
        assert!(ShiftCatalog::build(Hour(6), Hour(18), 0, 4).is_err());
        assert!(ShiftCatalog::from_definitions(vec![ShiftDefinition::new(ShiftKind::PartTime, Hour(7), 0)]).is_err());
    }

    #[test]
    fn test_names_are_stable() {
        let catalog = ShiftCatalog::build(Hour(6), Hour(13), 8, 4).unwrap();
        let names = catalog.iter().map(|s| s.id.to_string()).collect::<Vec<_>>();
        assert_eq!(vec!["FT_06", "PT_06", "PT_07", "PT_08", "PT_09", "PT_10"], names);
    }

    #[test]
    fn test_covered_hours() {
        let shift = ShiftDefinition::new(ShiftKind::PartTime, Hour(7), 2);
        assert!(!shift.covers(Hour(6)));
        assert!(shift.covers(Hour(7)));
        assert!(shift.covers(Hour(8)));
        assert!(!shift.covers(Hour(9)));
        assert_eq!(Hour(8), shift.end());
    }

    #[test]
    fn test_within_drops_overhanging_shifts() {
        let catalog = ShiftCatalog::from_definitions(vec![
            ShiftDefinition::new(ShiftKind::PartTime, Hour(7), 2),
            ShiftDefinition::new(ShiftKind::PartTime, Hour(8), 2),
            ShiftDefinition::new(ShiftKind::FullTime, Hour(5), 8),
        ])
        .unwrap();

        let trimmed = catalog.within((Hour(6), Hour(8)));
        assert_eq!(1, trimmed.len());
        assert_eq!(Hour(7), trimmed.part_time()[0].start());
    }
}
