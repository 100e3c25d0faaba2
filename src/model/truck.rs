//! Truck kinds and the load/unload capability they share.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CargoError;

/// Units of cargo added by a single load.
pub const CARGO_BATCH: u32 = 100;

pub type TruckRef = Box<dyn Truck>;

/// Anything that can be loaded and unloaded.
///
/// New kinds are added by implementing this trait; the engine never looks at
/// the concrete type. Each operation is called at most once per processing
/// pass.
#[async_trait]
pub trait Truck: Send + Sync + std::fmt::Debug {
    fn id(&self) -> &str;

    fn cargo(&self) -> u32;

    /// Remaining battery, for kinds that have one.
    fn battery_level(&self) -> Option<f64> {
        None
    }

    async fn load_cargo(&mut self) -> Result<(), CargoError>;

    async fn unload_cargo(&mut self) -> Result<(), CargoError>;
}

async fn handle(handling_time: Option<Duration>) {
    if let Some(d) = handling_time {
        tokio::time::sleep(d).await;
    }
}

// ---------------------------------------------------------------------------
// Normal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NormalTruck {
    id: String,
    cargo: u32,
    handling_time: Option<Duration>,
}

impl NormalTruck {
    pub fn new(id: impl Into<String>, cargo: u32) -> Self {
        Self {
            id: id.into(),
            cargo,
            handling_time: None,
        }
    }

    /// Time spent before each load and unload.
    pub fn handling_time(mut self, d: Duration) -> Self {
        self.handling_time = Some(d);
        self
    }
}

#[async_trait]
impl Truck for NormalTruck {
    fn id(&self) -> &str {
        &self.id
    }

    fn cargo(&self) -> u32 {
        self.cargo
    }

    async fn load_cargo(&mut self) -> Result<(), CargoError> {
        handle(self.handling_time).await;
        self.cargo = self.cargo.saturating_add(CARGO_BATCH);
        Ok(())
    }

    async fn unload_cargo(&mut self) -> Result<(), CargoError> {
        handle(self.handling_time).await;
        self.cargo = 0;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Electric
// ---------------------------------------------------------------------------

/// A truck that spends battery on every operation. Battery is never
/// recharged, and an operation the battery cannot cover is refused before
/// any state changes.
#[derive(Debug, Clone)]
pub struct ElectricTruck {
    id: String,
    cargo: u32,
    battery_level: f64,
    load_cost: f64,
    unload_cost: f64,
    handling_time: Option<Duration>,
}

impl ElectricTruck {
    pub const DEFAULT_LOAD_COST: f64 = 10.0;
    pub const DEFAULT_UNLOAD_COST: f64 = 5.0;

    pub fn new(id: impl Into<String>, cargo: u32, battery_level: f64) -> Self {
        Self {
            id: id.into(),
            cargo,
            battery_level,
            load_cost: Self::DEFAULT_LOAD_COST,
            unload_cost: Self::DEFAULT_UNLOAD_COST,
            handling_time: None,
        }
    }

    /// Battery spent per load and per unload. Negative costs count as zero,
    /// so an operation can never add charge.
    pub fn costs(mut self, load_cost: f64, unload_cost: f64) -> Self {
        self.load_cost = load_cost.max(0.0);
        self.unload_cost = unload_cost.max(0.0);
        self
    }

    pub fn handling_time(mut self, d: Duration) -> Self {
        self.handling_time = Some(d);
        self
    }

    fn draw(&mut self, cost: f64) -> Result<(), CargoError> {
        let cost = cost.max(0.0);
        // A NaN battery covers nothing.
        if self.battery_level.is_nan() || self.battery_level < cost {
            return Err(CargoError::BatteryDepleted {
                required: cost,
                available: self.battery_level,
            });
        }
        self.battery_level -= cost;
        Ok(())
    }
}

#[async_trait]
impl Truck for ElectricTruck {
    fn id(&self) -> &str {
        &self.id
    }

    fn cargo(&self) -> u32 {
        self.cargo
    }

    fn battery_level(&self) -> Option<f64> {
        Some(self.battery_level)
    }

    async fn load_cargo(&mut self) -> Result<(), CargoError> {
        handle(self.handling_time).await;
        self.draw(self.load_cost)?;
        self.cargo = self.cargo.saturating_add(CARGO_BATCH);
        Ok(())
    }

    async fn unload_cargo(&mut self) -> Result<(), CargoError> {
        handle(self.handling_time).await;
        self.draw(self.unload_cost)?;
        self.cargo = 0;
        Ok(())
    }
}
