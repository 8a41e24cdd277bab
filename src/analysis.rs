//! Mission events and the report built from them.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scheduler::SkipReason;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MissionEvent {
    Assigned { target: String },
    Completed { target: String, fuel_used: f32 },
    Failed { target: String, reason: SkipReason },
    FuelSnapshot { starting: f32, current: f32 },
    Finished { destroyed: usize, skipped: usize },
}

pub trait MissionObserver {
    fn on_event(&mut self, event: &MissionEvent);
}

/// Discards every event.
impl MissionObserver for () {
    fn on_event(&mut self, _event: &MissionEvent) {}
}

/// Records every event in order.
impl MissionObserver for Vec<MissionEvent> {
    fn on_event(&mut self, event: &MissionEvent) {
        self.push(event.clone());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub sequence: u32,
    pub target: String,
    pub status: LogStatus,
    pub fuel_used: f32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    entries: Vec<ReportEntry>,
    assigned: u32,
    completed: u32,
    failed: u32,
    starting_fuel: f32,
    current_fuel: f32,
    started_at: DateTime<Utc>,
    finished: Option<(usize, usize)>,
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

impl AnalysisReport {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            assigned: 0,
            completed: 0,
            failed: 0,
            starting_fuel: 0.0,
            current_fuel: 0.0,
            started_at: Utc::now(),
            finished: None,
        }
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn totals(&self) -> (u32, u32, u32) {
        (self.assigned, self.completed, self.failed)
    }

    pub fn fuel_consumed(&self) -> f32 {
        self.starting_fuel - self.current_fuel
    }

    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }

    fn pending_mut(&mut self, target: &str) -> Option<&mut ReportEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.target == target && e.status == LogStatus::Pending)
    }

    pub fn generate_report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "===== ANALYSIS REPORT =====");
        let _ = writeln!(out, "Mission Start Time: {}", self.started_at.format(TIME_FORMAT));
        let _ = writeln!(out);
        let _ = writeln!(out, "Total Missions Assigned: {}", self.assigned);
        let _ = writeln!(out, "Total Missions Completed: {}", self.completed);
        let _ = writeln!(out, "Total Missions Failed: {}", self.failed);
        let _ = writeln!(out);
        let _ = writeln!(out, "Starting Fuel: {:.1}%", self.starting_fuel);
        let _ = writeln!(out, "Current Fuel: {:.1}%", self.current_fuel);
        let _ = writeln!(out, "Total Fuel Consumed: {:.1}%", self.fuel_consumed());
        if let Some((destroyed, skipped)) = self.finished {
            let _ = writeln!(out, "Outcome: {destroyed} destroyed, {skipped} skipped");
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "----- Mission History -----");
        for e in &self.entries {
            let status = match e.status {
                LogStatus::Pending => "Pending",
                LogStatus::Completed => "Completed",
                LogStatus::Failed => "Failed",
            };
            let _ = writeln!(
                out,
                "#{} | Base: {} | Status: {} | Fuel Used: {:.1} | Time: {}",
                e.sequence,
                e.target,
                status,
                e.fuel_used,
                e.timestamp.format(TIME_FORMAT)
            );
        }
        let _ = writeln!(out, "===========================");
        out
    }
}

impl Default for AnalysisReport {
    fn default() -> Self {
        Self::new()
    }
}

impl MissionObserver for AnalysisReport {
    fn on_event(&mut self, event: &MissionEvent) {
        match event {
            MissionEvent::Assigned { target } => {
                self.assigned += 1;
                self.entries.push(ReportEntry {
                    sequence: self.assigned,
                    target: target.clone(),
                    status: LogStatus::Pending,
                    fuel_used: 0.0,
                    timestamp: Utc::now(),
                });
            }
            MissionEvent::Completed { target, fuel_used } => {
                self.completed += 1;
                if let Some(e) = self.pending_mut(target) {
                    e.status = LogStatus::Completed;
                    e.fuel_used = *fuel_used;
                }
            }
            MissionEvent::Failed { target, .. } => {
                self.failed += 1;
                if let Some(e) = self.pending_mut(target) {
                    e.status = LogStatus::Failed;
                }
            }
            MissionEvent::FuelSnapshot { starting, current } => {
                self.starting_fuel = *starting;
                self.current_fuel = *current;
            }
            MissionEvent::Finished { destroyed, skipped } => {
                self.finished = Some((*destroyed, *skipped));
            }
        }
    }
}
