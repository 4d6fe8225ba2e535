//! Notifications emitted by the simulation loop.

use crate::agent::StopReason;
use crate::planner::Strategy;
use robomaze_data::{Cell, Coord};
use serde::{Deserialize, Serialize};

/// What changed, sent over the channel returned by `Simulation::subscribe`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Planned {
        agent: usize,
        strategy: Strategy,
        length: usize,
    },
    Moved {
        agent: usize,
        from: Coord,
        to: Coord,
        energy: f64,
        speed: f64,
    },
    Blocked {
        agent: usize,
        at: Coord,
    },
    Stopped {
        agent: usize,
        reason: StopReason,
    },
    GridChanged {
        at: Coord,
        cell: Cell,
    },
    EndpointsChanged {
        start: Coord,
        goal: Coord,
    },
    HazardInjected {
        at: Coord,
    },
    ReplanScheduled {
        due_tick: u64,
    },
    ReplanPerformed {
        tick: u64,
        agents: usize,
    },
    Cleared,
}
