use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::drones::DroneFuelState;
use crate::locations::{Base, City, GraphError};
use crate::pathfinding::{Path, shortest_path};
use crate::weather::WeatherSnapshot;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SetupError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("No targets selected")]
    EmptySelection,
    #[error("The home base cannot be a target")]
    HomeSelected,
    #[error("Base {0} selected more than once")]
    DuplicateTarget(usize),
    #[error("Unknown target: {0}")]
    UnknownTarget(String),
    #[error("A mission is already running; reset first")]
    MissionInProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetStatus {
    Pending,
    /// Committed and in flight.
    Engaged,
    Destroyed,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    NoPath,
    NoReturnPath,
    InsufficientFuel { required: f32, available: f32 },
}

impl SkipReason {
    pub fn describe(&self) -> String {
        match self {
            SkipReason::NoPath => "no path from home".to_string(),
            SkipReason::NoReturnPath => "no path back to home".to_string(),
            SkipReason::InsufficientFuel { required, available } => {
                format!("insufficient fuel ({required:.1} needed, {available:.1} left)")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionTarget {
    /// Node index within the city's base list.
    pub base: usize,
    pub name: String,
    /// Copied at selection time.
    pub priority: u32,
    pub status: TargetStatus,
}

/// Max-priority queue over target slots; equal priorities leave in selection order.
#[derive(Debug, Clone, Default)]
pub struct MissionQueue {
    heap: BinaryHeap<(u32, Reverse<usize>)>,
}

impl MissionQueue {
    pub fn push(&mut self, priority: u32, slot: usize) {
        self.heap.push((priority, Reverse(slot)));
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|(_, Reverse(slot))| slot)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// A committed strike: the outbound path plus the fuel budgeted for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sortie {
    pub slot: usize,
    pub path: Path,
    pub fuel_to_target: f32,
    pub fuel_to_return: f32,
    /// What the commit actually deducted (weather may override the path cost).
    pub charged: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Engage(Sortie),
    Skip { slot: usize, reason: SkipReason },
}

#[derive(Debug, Clone)]
pub struct MissionScheduler {
    home: usize,
    targets: Vec<MissionTarget>,
    queue: MissionQueue,
}

impl MissionScheduler {
    pub fn new(city: &City, selection: &[usize]) -> Result<Self, SetupError> {
        city.validate()?;
        if selection.is_empty() {
            return Err(SetupError::EmptySelection);
        }
        let home = city.home_index()?;
        let mut targets: Vec<MissionTarget> = Vec::with_capacity(selection.len());
        let mut queue = MissionQueue::default();
        for &index in selection {
            let base = city.base(index)?;
            if index == home {
                return Err(SetupError::HomeSelected);
            }
            if targets.iter().any(|t| t.base == index) {
                return Err(SetupError::DuplicateTarget(index));
            }
            queue.push(base.priority, targets.len());
            targets.push(MissionTarget {
                base: index,
                name: base.name.clone(),
                priority: base.priority,
                status: TargetStatus::Pending,
            });
        }
        Ok(Self { home, targets, queue })
    }

    pub fn home(&self) -> usize {
        self.home
    }

    pub fn targets(&self) -> &[MissionTarget] {
        &self.targets
    }

    pub fn target(&self, slot: usize) -> Option<&MissionTarget> {
        self.targets.get(slot)
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn set_status(&mut self, slot: usize, status: TargetStatus) {
        if let Some(t) = self.targets.get_mut(slot) {
            t.status = status;
        }
    }

    pub fn count(&self, status: TargetStatus) -> usize {
        self.targets.iter().filter(|t| t.status == status).count()
    }

    /// Pops the highest-priority target and decides whether it can be flown.
    ///
    /// A target is engaged only if the tank covers the round trip; the
    /// outbound cost is deducted on commit and the return leg stays budgeted.
    pub fn next_decision(
        &mut self,
        bases: &[Base],
        drone: &mut DroneFuelState,
        weather: &WeatherSnapshot,
    ) -> Result<Option<Decision>, GraphError> {
        let Some(slot) = self.queue.pop() else {
            return Ok(None);
        };
        let target = self.targets[slot].base;
        let name = self.targets[slot].name.clone();

        let outbound = shortest_path(bases, self.home, target)?;
        if outbound.is_empty() {
            warn!("skipping {name}: no path from home");
            return Ok(Some(self.skip(slot, SkipReason::NoPath)));
        }
        let inbound = shortest_path(bases, target, self.home)?;
        if inbound.is_empty() {
            warn!("skipping {name}: no path back to home");
            return Ok(Some(self.skip(slot, SkipReason::NoReturnPath)));
        }

        let fuel_to_target = outbound.cost;
        let fuel_to_return = inbound.cost;
        let required = fuel_to_target + fuel_to_return;
        let available = drone.remaining_fuel();
        if available < required {
            warn!("skipping {name}: needs {required:.1} fuel for the round trip, {available:.1} left");
            return Ok(Some(self.skip(slot, SkipReason::InsufficientFuel { required, available })));
        }

        if !drone.consume_fuel(fuel_to_target, weather.wind_speed, weather.has_alert()) {
            let charge = DroneFuelState::consumption_rate(weather.wind_speed, weather.has_alert());
            warn!("skipping {name}: weather surcharge {charge:.1} exceeds {available:.1} left");
            return Ok(Some(self.skip(
                slot,
                SkipReason::InsufficientFuel { required: charge, available },
            )));
        }
        let charged = available - drone.remaining_fuel();

        info!(
            "engaging {name} (priority {}): out {fuel_to_target:.1}, back {fuel_to_return:.1}, charged {charged:.1}",
            self.targets[slot].priority
        );
        self.targets[slot].status = TargetStatus::Engaged;
        Ok(Some(Decision::Engage(Sortie {
            slot,
            path: outbound,
            fuel_to_target,
            fuel_to_return,
            charged,
        })))
    }

    fn skip(&mut self, slot: usize, reason: SkipReason) -> Decision {
        self.targets[slot].status = TargetStatus::Skipped;
        Decision::Skip { slot, reason }
    }
}
