//! Named scalar pressures driving growth and era transitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named scalars in [0, 1] biasing template eligibility and system
/// behavior. Reads of unknown names return zero; writes clamp.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PressureMap {
    values: BTreeMap<String, f64>,
}

impl PressureMap {
    pub fn new(initial: BTreeMap<String, f64>) -> Self {
        let mut map = Self::default();
        for (name, value) in initial {
            map.set(name, value);
        }
        map
    }

    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value.clamp(0.0, 1.0));
    }

    /// Add `delta` to a pressure, clamping the result to [0, 1]
    pub fn adjust(&mut self, name: &str, delta: f64) {
        let next = (self.get(name) + delta).clamp(0.0, 1.0);
        self.values.insert(name.to_string(), next);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_pressure_reads_zero() {
        let map = PressureMap::default();
        assert_eq!(map.get("ambition"), 0.0);
    }

    #[test]
    fn test_adjust_clamps() {
        let mut map = PressureMap::default();
        map.set("unrest", 0.9);
        map.adjust("unrest", 0.5);
        assert_eq!(map.get("unrest"), 1.0);
        map.adjust("unrest", -2.0);
        assert_eq!(map.get("unrest"), 0.0);
    }

    #[test]
    fn test_initial_values_clamped() {
        let map = PressureMap::new(BTreeMap::from([("x".to_string(), 3.0)]));
        assert_eq!(map.get("x"), 1.0);
    }
}
