//! Serializable summaries printed by the CLI.

use robomaze_core::{AgentMetrics, AgentPhase, AgentState, Simulation, Strategy};
use robomaze_data::Coord;
use serde::{Deserialize, Serialize};

/// One engine's answer on a fixed maze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineResult {
    pub strategy: Strategy,
    pub reached: bool,
    /// Moves, one less than the number of cells.
    pub steps: usize,
    pub cost: f64,
    pub hazards_on_path: usize,
    pub elapsed_us: u64,
    pub path: Vec<Coord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareReport {
    pub seed: u64,
    pub rows: usize,
    pub cols: usize,
    pub start: Coord,
    pub goal: Coord,
    pub config_fingerprint: String,
    pub results: Vec<EngineResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReport {
    pub id: usize,
    pub strategy: Strategy,
    pub phase: AgentPhase,
    pub position: Coord,
    pub energy: f64,
    pub speed: f64,
    pub metrics: AgentMetrics,
}

impl From<&AgentState> for AgentReport {
    fn from(agent: &AgentState) -> Self {
        Self {
            id: agent.id,
            strategy: agent.strategy,
            phase: agent.phase,
            position: agent.position,
            energy: agent.energy,
            speed: agent.speed,
            metrics: agent.metrics.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: u64,
    pub config_fingerprint: String,
    pub ticks: u64,
    pub replans: u64,
    pub hazards_injected: u64,
    pub events: usize,
    pub agents: Vec<AgentReport>,
}

impl RunReport {
    #[must_use]
    pub fn from_simulation(sim: &Simulation, events: usize) -> Self {
        Self {
            seed: sim.seed(),
            config_fingerprint: sim.config().fingerprint(),
            ticks: sim.tick_count(),
            replans: sim.metrics().replan_count(),
            hazards_injected: sim.metrics().hazard_count(),
            events,
            agents: sim.agents().iter().map(AgentReport::from).collect(),
        }
    }
}
