use crate::error::{Error, Result};
use crate::hour::Hour;
use crate::shift::ShiftKind;
use serde::{Deserialize, Serialize};

/// Staffing policy for one optimization run.
///
/// Every field has a default, so a scenario file only needs to list the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub open_hour: Hour,
    /// Last operating hour, inclusive.
    pub close_hour: Hour,
    pub full_time_hours: u8,
    pub part_time_hours: u8,
    pub cost_full: f64,
    pub cost_part: f64,
    /// Arrivals one staff member serves per hour.
    pub capacity: f64,
    /// Ceiling on staff present in any hour (service positions).
    pub max_staff: u32,
    /// Fraction of an hour's demand that may roll over into the next hour.
    pub leakage_cap: f64,
    /// Hourly capacity must be at least this fraction of hourly demand.
    pub wait_ratio: f64,
    /// Require at least one staff member present in every hour.
    pub min_presence: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            open_hour: Hour(6),
            close_hour: Hour(18),
            full_time_hours: 8,
            part_time_hours: 4,
            cost_full: 120.0,
            cost_part: 70.0,
            capacity: 4.0,
            max_staff: 6,
            leakage_cap: 0.3,
            wait_ratio: 0.1,
            min_presence: false,
        }
    }
}

impl Policy {
    pub fn cost_of(&self, kind: ShiftKind) -> f64 {
        match kind {
            ShiftKind::FullTime => self.cost_full,
            ShiftKind::PartTime => self.cost_part,
        }
    }

    pub fn duration_of(&self, kind: ShiftKind) -> u8 {
        match kind {
            ShiftKind::FullTime => self.full_time_hours,
            ShiftKind::PartTime => self.part_time_hours,
        }
    }

    pub fn window(&self) -> (Hour, Hour) {
        (self.open_hour, self.close_hour)
    }

    pub fn validate(&self) -> Result<()> {
        if self.open_hour > self.close_hour || self.close_hour > Hour::LAST {
            return Err(Error::InvalidHourRange {
                open: self.open_hour.0,
                close: self.close_hour.0,
            });
        }
        if !self.capacity.is_finite() || self.capacity <= 0.0 {
            return Err(invalid("capacity", self.capacity));
        }
        if self.max_staff == 0 {
            return Err(invalid("max_staff", self.max_staff));
        }
        if self.full_time_hours == 0 {
            return Err(invalid("full_time_hours", self.full_time_hours));
        }
        if self.part_time_hours == 0 {
            return Err(invalid("part_time_hours", self.part_time_hours));
        }
        for (name, cost) in [("cost_full", self.cost_full), ("cost_part", self.cost_part)] {
            if !cost.is_finite() || cost < 0.0 {
                return Err(invalid(name, cost));
            }
        }
        for (name, ratio) in [("leakage_cap", self.leakage_cap), ("wait_ratio", self.wait_ratio)] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(invalid(name, ratio));
            }
        }
        Ok(())
    }

    /// Overrides a single field from its textual name and value.
    pub fn set(&mut self, field: &str, value: &str) -> Result<()> {
        let mut next = self.clone();
        match field {
            "open_hour" => next.open_hour = Hour(parse(field, value)?),
            "close_hour" => next.close_hour = Hour(parse(field, value)?),
            "full_time_hours" => next.full_time_hours = parse(field, value)?,
            "part_time_hours" => next.part_time_hours = parse(field, value)?,
            "cost_full" => next.cost_full = parse(field, value)?,
            "cost_part" => next.cost_part = parse(field, value)?,
            "capacity" => next.capacity = parse(field, value)?,
            "max_staff" => next.max_staff = parse(field, value)?,
            "leakage_cap" => next.leakage_cap = parse(field, value)?,
            "wait_ratio" => next.wait_ratio = parse(field, value)?,
            "min_presence" => next.min_presence = parse(field, value)?,
            _ => return Err(Error::InvalidPolicy(format!("unknown field `{}`", field))),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

fn invalid(field: &str, value: impl std::fmt::Display) -> Error {
    Error::InvalidPolicy(format!("{} = {}", field, value))
}

fn parse<T: std::str::FromStr>(field: &str, value: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|_| Error::InvalidPolicy(format!("cannot parse `{}` for {}", value, field)))
}
