//! Power Supply
//!
//! Shared energy pool of one ship. Generators register production rates,
//! subsystems (thrust, brakes, turning, turbo) register consumption rates,
//! and guns draw one-off costs. Batteries raise the storage cap.
//!
//! Consumers are evaluated in key order every tick, so a consumer earlier
//! in that order may leave too little for a later one. A consumer that
//! cannot be paid is reported as starved instead of failing the tick.

use std::collections::BTreeMap;
use std::fmt;

use super::component::ComponentRef;

/// Identifies one production or consumption entry.
///
/// The derived ordering (subsystems first, then generators, then named
/// entries) is the order consumers are charged in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PowerKey {
    Thrust,
    Brakes,
    Turning,
    Turbo,
    Generator(ComponentRef),
    Named(String),
}

impl PowerKey {
    pub fn named(name: impl Into<String>) -> Self {
        PowerKey::Named(name.into())
    }
}

impl fmt::Display for PowerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerKey::Thrust => write!(f, "engine"),
            PowerKey::Brakes => write!(f, "brakes"),
            PowerKey::Turning => write!(f, "turning"),
            PowerKey::Turbo => write!(f, "turbo"),
            PowerKey::Generator(r) => write!(f, "generator {}#{}", r.block, r.index),
            PowerKey::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Outcome of one [`PowerSupply::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerReport {
    pub produced: f64,
    pub consumed: f64,
    /// Consumers that could not be paid this tick, in evaluation order.
    pub starved: Vec<PowerKey>,
}

impl PowerReport {
    pub fn has_shortfall(&self) -> bool {
        !self.starved.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerSupply {
    max_storage: f64,
    power: f64,
    production: BTreeMap<PowerKey, f64>,
    consumption: BTreeMap<PowerKey, f64>,
}

impl Default for PowerSupply {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl PowerSupply {
    /// Empty supply that can hold at most `max_storage`.
    pub fn new(max_storage: f64) -> Self {
        Self {
            max_storage: max_storage.max(0.0),
            power: 0.0,
            production: BTreeMap::new(),
            consumption: BTreeMap::new(),
        }
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    /// Sets stored power, clamped to `[0, max_storage]`.
    pub fn set_power(&mut self, power: f64) {
        self.power = power.clamp(0.0, self.max_storage);
    }

    pub fn max_storage(&self) -> f64 {
        self.max_storage
    }

    pub fn add_capacity(&mut self, storage: f64) {
        self.max_storage = (self.max_storage + storage).max(0.0);
        self.power = self.power.min(self.max_storage);
    }

    /// Replaces the production rate registered under `key`; a rate of zero
    /// removes the entry.
    pub fn set_production(&mut self, key: PowerKey, rate: f64) {
        if rate == 0.0 {
            self.production.remove(&key);
        } else {
            self.production.insert(key, rate);
        }
    }

    /// Replaces the consumption rate registered under `key`; a rate of zero
    /// removes the entry.
    pub fn set_consumption(&mut self, key: PowerKey, rate: f64) {
        if rate == 0.0 {
            self.consumption.remove(&key);
        } else {
            self.consumption.insert(key, rate);
        }
    }

    pub fn production(&self, key: &PowerKey) -> f64 {
        self.production.get(key).copied().unwrap_or(0.0)
    }

    pub fn consumption(&self, key: &PowerKey) -> f64 {
        self.consumption.get(key).copied().unwrap_or(0.0)
    }

    pub fn total_production(&self) -> f64 {
        self.production.values().sum()
    }

    pub fn total_consumption(&self) -> f64 {
        self.consumption.values().sum()
    }

    pub fn may_consume(&self, amount: f64) -> bool {
        self.power >= amount
    }

    /// Deducts a one-off `amount`; returns false (and deducts nothing) when
    /// there is not enough stored power.
    pub fn consume(&mut self, amount: f64) -> bool {
        if !self.may_consume(amount) {
            return false;
        }
        self.power -= amount;
        true
    }

    /// Advances the supply by `dt` seconds.
    ///
    /// Production is added first, then each consumer is charged
    /// `rate * dt` in key order; a consumer that cannot be charged is
    /// skipped and reported once in [`PowerReport::starved`]. Stored power is
    /// clamped to capacity after all consumers have been charged.
    pub fn tick(&mut self, dt: f64) -> PowerReport {
        let mut report = PowerReport::default();
        if dt <= 0.0 {
            return report;
        }

        report.produced = self.total_production() * dt;
        self.power += report.produced;

        for (key, rate) in &self.consumption {
            let amount = rate * dt;
            if amount <= 0.0 {
                continue;
            }
            if self.power >= amount {
                self.power -= amount;
                report.consumed += amount;
            } else {
                report.starved.push(key.clone());
            }
        }

        self.power = self.power.clamp(0.0, self.max_storage);
        report
    }
}
