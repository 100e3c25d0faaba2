//! Fleet manifests.
//!
//! A manifest describes the trucks for one run:
//!
//! ```toml
//! [[truck]]
//! id = "NT1"
//! kind = "normal"
//!
//! [[truck]]
//! id = "ET1"
//! kind = "electric"
//! battery = 100.0
//! handling_ms = 250
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{ElectricTruck, NormalTruck, TruckRef};
use crate::registry::{FleetManager, TruckManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruckKind {
    Normal,
    Electric,
}

/// One `[[truck]]` entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TruckSpec {
    pub id: String,
    pub kind: TruckKind,
    #[serde(default)]
    pub cargo: u32,
    /// Electric only.
    #[serde(default = "default_battery")]
    pub battery: f64,
    #[serde(default = "default_load_cost")]
    pub load_cost: f64,
    #[serde(default = "default_unload_cost")]
    pub unload_cost: f64,
    /// Simulated time spent before each operation.
    #[serde(default)]
    pub handling_ms: u64,
}

fn default_battery() -> f64 {
    100.0
}

fn default_load_cost() -> f64 {
    ElectricTruck::DEFAULT_LOAD_COST
}

fn default_unload_cost() -> f64 {
    ElectricTruck::DEFAULT_UNLOAD_COST
}

impl TruckSpec {
    pub fn normal(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: TruckKind::Normal,
            cargo: 0,
            battery: default_battery(),
            load_cost: default_load_cost(),
            unload_cost: default_unload_cost(),
            handling_ms: 0,
        }
    }

    pub fn electric(id: impl Into<String>, battery: f64) -> Self {
        Self {
            kind: TruckKind::Electric,
            battery,
            ..Self::normal(id)
        }
    }

    /// Battery and costs must be finite and not negative.
    fn check_battery(&self) -> Result<()> {
        for (field, value) in [
            ("battery", self.battery),
            ("load_cost", self.load_cost),
            ("unload_cost", self.unload_cost),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Manifest(format!(
                    "truck {}: {field} must be a finite number >= 0, got {value}",
                    self.id
                )));
            }
        }
        Ok(())
    }

    pub fn build(&self) -> TruckRef {
        let handling = (self.handling_ms > 0).then(|| Duration::from_millis(self.handling_ms));
        match self.kind {
            TruckKind::Normal => {
                let truck = NormalTruck::new(&self.id, self.cargo);
                Box::new(match handling {
                    Some(d) => truck.handling_time(d),
                    None => truck,
                })
            }
            TruckKind::Electric => {
                let truck = ElectricTruck::new(&self.id, self.cargo, self.battery)
                    .costs(self.load_cost, self.unload_cost);
                Box::new(match handling {
                    Some(d) => truck.handling_time(d),
                    None => truck,
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FleetManifest {
    #[serde(rename = "truck", default)]
    pub trucks: Vec<TruckSpec>,
}

impl FleetManifest {
    /// The four-truck demo fleet: two normal, two electric at full battery.
    pub fn demo() -> Self {
        Self {
            trucks: vec![
                TruckSpec::normal("NT1"),
                TruckSpec::electric("ET1", 100.0),
                TruckSpec::normal("NT2"),
                TruckSpec::electric("ET2", 100.0),
            ],
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Manifest(format!("cannot read manifest {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Manifest(msg) => Error::Manifest(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse and validate. Truck ids must be non-empty and unique.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)
            .map_err(|e| Error::Manifest(format!("bad manifest: {e}")))?;

        let mut seen = HashSet::new();
        for spec in &manifest.trucks {
            if spec.id.is_empty() {
                return Err(Error::Manifest("truck id must not be empty".to_string()));
            }
            if !seen.insert(spec.id.as_str()) {
                return Err(Error::Manifest(format!("duplicate truck id {}", spec.id)));
            }
            spec.check_battery()?;
        }
        Ok(manifest)
    }

    pub fn into_trucks(self) -> Vec<TruckRef> {
        self.trucks.iter().map(TruckSpec::build).collect()
    }

    /// Register every truck with its starting cargo.
    pub fn register(&self, manager: &TruckManager) -> Result<()> {
        for spec in &self.trucks {
            manager.add_truck(&spec.id, spec.cargo)?;
        }
        Ok(())
    }
}
