use crate::demand::{HourlyDemand, LocationId};
use crate::hour::Hour;
use crate::shift::{ShiftId, ShiftKind};
use crate::staffing::solution::StaffingSolution;
use tabled::Tabled;

fn two_places(value: &f64) -> String {
    format!("{:.2}", value)
}

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct LocationRow {
    pub location: LocationId,
    #[tabled(rename = "total/day", display = "two_places")]
    pub total: f64,
    #[tabled(rename = "peak hour")]
    pub peak_hour: Hour,
    #[tabled(display = "two_places")]
    pub peak: f64,
}

impl LocationRow {
    pub fn new(location: &LocationId, demand: &HourlyDemand) -> Option<Self> {
        demand.peak().map(|(peak_hour, peak)| LocationRow {
            location: location.clone(),
            total: demand.total(),
            peak_hour,
            peak,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct DemandRow {
    pub hour: Hour,
    #[tabled(display = "two_places")]
    pub demand: f64,
}

pub fn demand_rows(demand: &HourlyDemand) -> Vec<DemandRow> {
    demand.iter().map(|(hour, demand)| DemandRow { hour, demand }).collect()
}

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct HourRow {
    pub hour: Hour,
    #[tabled(display = "two_places")]
    pub demand: f64,
    #[tabled(rename = "FT")]
    pub full_time: u32,
    #[tabled(rename = "PT")]
    pub part_time: u32,
    #[tabled(display = "two_places")]
    pub capacity: f64,
    #[tabled(rename = "FT cost", display = "two_places")]
    pub full_time_cost: f64,
    #[tabled(rename = "PT cost", display = "two_places")]
    pub part_time_cost: f64,
    #[tabled(rename = "cost", display = "two_places")]
    pub total_cost: f64,
    #[tabled(display = "two_places")]
    pub leakage: f64,
}

pub fn hour_rows(solution: &StaffingSolution) -> Vec<HourRow> {
    solution
        .hours()
        .iter()
        .map(|h| HourRow {
            hour: h.hour,
            demand: h.demand,
            full_time: h.full_time_staff,
            part_time: h.part_time_staff,
            capacity: h.capacity,
            full_time_cost: h.full_time_cost,
            part_time_cost: h.part_time_cost,
            total_cost: h.cost(),
            leakage: h.leakage,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct ShiftRow {
    pub shift: ShiftId,
    pub kind: ShiftKind,
    pub start: Hour,
    pub end: Hour,
    pub count: u32,
}

/// Shifts with at least one assigned instance.
pub fn shift_rows(solution: &StaffingSolution) -> Vec<ShiftRow> {
    solution
        .assignments()
        .iter()
        .filter(|a| a.count > 0)
        .map(|a| ShiftRow {
            shift: a.shift.id,
            kind: a.shift.kind(),
            start: a.shift.start(),
            end: a.shift.end(),
            count: a.count,
        })
        .collect()
}
