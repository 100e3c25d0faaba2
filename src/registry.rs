//! Truck registry.
//!
//! A single owner for the id → truck mapping, guarded by a reader/writer
//! lock: any number of concurrent readers, one writer at a time. The map
//! itself is never handed out.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A truck as the registry records it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredTruck {
    pub id: String,
    pub cargo: u32,
}

/// Fleet management operations.
pub trait FleetManager {
    fn add_truck(&self, id: &str, cargo: u32) -> Result<()>;
    fn get_truck(&self, id: &str) -> Result<RegisteredTruck>;
    fn remove_truck(&self, id: &str) -> Result<()>;
    fn update_truck_cargo(&self, id: &str, cargo: u32) -> Result<()>;
}

/// In-memory [`FleetManager`].
#[derive(Debug, Default)]
pub struct TruckManager {
    trucks: RwLock<HashMap<String, RegisteredTruck>>,
}

impl TruckManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all trucks, sorted by id.
    pub fn list_trucks(&self) -> Result<Vec<RegisteredTruck>> {
        let mut trucks: Vec<_> = self.read()?.values().cloned().collect();
        trucks.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(trucks)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, RegisteredTruck>>> {
        self.trucks.read().map_err(|_| Error::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, RegisteredTruck>>> {
        self.trucks.write().map_err(|_| Error::LockPoisoned)
    }
}

impl FleetManager for TruckManager {
    fn add_truck(&self, id: &str, cargo: u32) -> Result<()> {
        let mut trucks = self.write()?;
        if trucks.contains_key(id) {
            return Err(Error::AlreadyExists(id.to_string()));
        }
        trucks.insert(
            id.to_string(),
            RegisteredTruck {
                id: id.to_string(),
                cargo,
            },
        );
        Ok(())
    }

    fn get_truck(&self, id: &str) -> Result<RegisteredTruck> {
        self.read()?
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn remove_truck(&self, id: &str) -> Result<()> {
        self.write()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn update_truck_cargo(&self, id: &str, cargo: u32) -> Result<()> {
        let mut trucks = self.write()?;
        let truck = trucks
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        truck.cargo = cargo;
        Ok(())
    }
}
