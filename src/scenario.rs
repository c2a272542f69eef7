use crate::demand::{aggregate_by_location, Event, HourlyDemand, LocationId};
use crate::error::Result;
use crate::policy::Policy;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Raw events plus the policy to plan them with, as stored in a scenario file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub policy: Policy,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Scenario {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(data)?;
        scenario.policy.validate()?;
        Ok(scenario)
    }

    /// Demand curve per location over the policy's operating window.
    pub fn demand(&self) -> Result<BTreeMap<LocationId, HourlyDemand>> {
        aggregate_by_location(&self.events, self.policy.open_hour, self.policy.close_hour)
    }
}
