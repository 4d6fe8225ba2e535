//! Tick-driven simulation of several agents sharing one mutable maze.
//!
//! Each tick runs four phases in order: hazard injection, the debounced
//! replan (when due), one step per advancing agent, and the stop checks.
//! Grid edits never replan immediately; they arm a deadline a fixed number
//! of ticks ahead so that a burst of edits costs a single replan.

use crate::agent::{AgentPhase, AgentState, StopReason};
use crate::config::AppConfig;
use crate::error::{CoreError, Result};
use crate::events::SimEvent;
use crate::fuzzy::{
    adjust_speed, distance_membership, energy_membership, layer_density, obstacle_density, Signals,
};
use crate::metrics::RunMetrics;
use crate::planner::{planner_for, PlanRequest};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use robomaze_data::{Cell, Coord, Maze};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Instant;

const SEED_MIX: u64 = 0x517CC1B727220A95;

pub struct Simulation {
    config: AppConfig,
    maze: Maze,
    agents: Vec<AgentState>,
    tick: u64,
    replan_due: Option<u64>,
    seed: u64,
    rng: ChaCha8Rng,
    subscribers: Vec<Sender<SimEvent>>,
    metrics: RunMetrics,
}

impl Simulation {
    /// One agent per configured strategy, all idle at the maze start.
    pub fn new(config: AppConfig, maze: Maze) -> Result<Self> {
        config
            .validate()
            .map_err(|e| CoreError::invalid_config(e.to_string()))?;
        let seed = config.simulation.seed.unwrap_or_else(rand::random);
        let agents = config
            .simulation
            .strategies
            .iter()
            .enumerate()
            .map(|(id, &strategy)| {
                AgentState::new(
                    id,
                    strategy,
                    maze.start(),
                    &config.agent,
                    config.fuzzy.memory_capacity,
                )
            })
            .collect();
        Ok(Self {
            config,
            maze,
            agents,
            tick: 0,
            replan_due: None,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            subscribers: Vec::new(),
            metrics: RunMetrics::new(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn agents(&self) -> &[AgentState] {
        &self.agents
    }

    pub fn agent(&self, id: usize) -> Result<&AgentState> {
        self.agents.get(id).ok_or(CoreError::UnknownAgent(id))
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Tick at which the pending replan fires, if one is armed.
    pub fn replan_due(&self) -> Option<u64> {
        self.replan_due
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// True once every agent has stopped.
    pub fn is_finished(&self) -> bool {
        self.agents.iter().all(|a| a.phase.is_stopped())
    }

    /// New event receiver. Dropping it is harmless.
    pub fn subscribe(&mut self) -> Receiver<SimEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: SimEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Resets every agent to the start and plans its first route.
    pub fn start(&mut self) -> Result<()> {
        if let Err(e) = self.maze.grid().validate_endpoints() {
            tracing::warn!(error = %e, "Refusing to start");
            return Err(CoreError::invalid_config(e.to_string()));
        }
        let start = self.maze.start();
        for agent in &mut self.agents {
            agent.reset(start, &self.config.agent);
        }
        self.replan_due = None;

        tracing::info!(
            agents = self.agents.len(),
            start = ?start,
            goal = ?self.maze.goal(),
            seed = self.seed,
            "Simulation started"
        );
        for idx in 0..self.agents.len() {
            self.agents[idx].phase = AgentPhase::Planning;
            self.plan_agent(idx);
        }
        Ok(())
    }

    fn planner_seed(&self, idx: usize) -> u64 {
        self.seed.wrapping_add(self.tick).wrapping_mul(SEED_MIX) ^ idx as u64
    }

    fn plan_agent(&mut self, idx: usize) {
        let goal = self.maze.goal();
        let path = {
            let agent = &self.agents[idx];
            let request = PlanRequest {
                maze: &self.maze,
                from: agent.position,
                goal,
                energy: agent.energy,
                speed: agent.speed,
                memory: &agent.memory,
            };
            let mut planner = planner_for(agent.strategy, &self.config, self.planner_seed(idx));
            planner.plan(&request)
        };

        let agent = &mut self.agents[idx];
        let strategy = agent.strategy;
        let length = path.len();
        let usable = path.first() == Some(&agent.position);
        agent.set_plan(if usable { path } else { Vec::new() });

        self.emit(SimEvent::Planned {
            agent: idx,
            strategy,
            length,
        });

        let agent = &self.agents[idx];
        if agent.position == goal {
            self.stop(idx, StopReason::ReachedGoal);
        } else if !usable || agent.remaining_steps() == 0 {
            tracing::warn!(agent = idx, %strategy, "No route to goal");
            self.stop(idx, StopReason::Unreachable);
        } else {
            self.agents[idx].phase = AgentPhase::Advancing;
        }
    }

    fn stop(&mut self, idx: usize, reason: StopReason) {
        let agent = &mut self.agents[idx];
        agent.phase = AgentPhase::Stopped(reason);
        self.metrics
            .increment_counter(&format!("stopped.{}.{}", agent.strategy, reason.key()));
        tracing::info!(
            agent = idx,
            strategy = %agent.strategy,
            %reason,
            steps = agent.metrics.steps_taken,
            energy = agent.energy,
            "Agent stopped"
        );
        self.emit(SimEvent::Stopped { agent: idx, reason });
    }

    /// Moves running agents to `Replanning` and pushes the deadline out.
    fn schedule_replan(&mut self) {
        let mut any = false;
        for agent in &mut self.agents {
            if agent.is_running() {
                agent.phase = AgentPhase::Replanning;
                any = true;
            }
        }
        if !any {
            return;
        }
        let due = self.tick + self.config.simulation.debounce_ticks();
        self.replan_due = Some(due);
        self.emit(SimEvent::ReplanScheduled { due_tick: due });
    }

    /// Advances the world by one tick. Returns the number of agents still running.
    pub fn tick(&mut self) -> usize {
        let started = Instant::now();
        self.tick += 1;

        self.maybe_inject_hazard();

        if self.replan_due.is_some_and(|due| self.tick >= due) {
            self.replan_running();
        }

        for idx in 0..self.agents.len() {
            if self.agents[idx].phase == AgentPhase::Advancing {
                self.step_agent(idx);
            }
        }

        let running = self.agents.iter().filter(|a| a.is_running()).count();
        self.metrics.record_tick(started.elapsed(), running);
        running
    }

    /// Ticks until every agent stops or `max_ticks` elapse. Returns ticks run.
    pub fn run(&mut self, max_ticks: u64) -> u64 {
        let mut ticks = 0;
        while ticks < max_ticks && !self.is_finished() {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    fn replan_running(&mut self) {
        self.replan_due = None;
        let mut replanned = 0;
        for idx in 0..self.agents.len() {
            if !self.agents[idx].is_running() {
                continue;
            }
            self.agents[idx].metrics.replans += 1;
            self.metrics
                .increment_counter(&format!("replans.{}", self.agents[idx].strategy));
            self.plan_agent(idx);
            replanned += 1;
        }
        self.metrics.record_replan();
        tracing::debug!(tick = self.tick, agents = replanned, "Replanned");
        self.emit(SimEvent::ReplanPerformed {
            tick: self.tick,
            agents: replanned,
        });
    }

    fn maybe_inject_hazard(&mut self) {
        let chance = self.config.simulation.hazard_injection_chance;
        if chance <= 0.0 || self.rng.gen::<f64>() >= chance {
            return;
        }
        let grid = self.maze.grid();
        let (start, goal) = (grid.start(), grid.goal());
        let candidates: Vec<Coord> = grid
            .coords()
            .filter(|c| grid.is_open(*c) && *c != start && *c != goal)
            .filter(|c| self.agents.iter().all(|a| a.position != *c))
            .collect();
        if candidates.is_empty() {
            return;
        }
        let at = candidates[self.rng.gen_range(0..candidates.len())];
        if self.maze.set_cell(at, Cell::Hazard).is_err() {
            return;
        }
        self.metrics.record_hazard();
        tracing::debug!(tick = self.tick, at = ?at, "Hazard injected");
        self.emit(SimEvent::HazardInjected { at });
        self.schedule_replan();
    }

    fn step_agent(&mut self, idx: usize) {
        let goal = self.maze.goal();
        let Some(next) = self.agents[idx].next_cell() else {
            let reason = if self.agents[idx].position == goal {
                StopReason::ReachedGoal
            } else {
                StopReason::Unreachable
            };
            self.stop(idx, reason);
            return;
        };

        if self.maze.grid().is_wall(next) {
            let at = self.agents[idx].position;
            self.emit(SimEvent::Blocked { agent: idx, at });
            if self.replan_due.is_none() {
                self.schedule_replan();
            } else {
                self.agents[idx].phase = AgentPhase::Replanning;
            }
            return;
        }

        let agent_cfg = &self.config.agent;
        let hazard = self.maze.grid().is_hazard(next);
        let cost = if hazard {
            agent_cfg.hazard_cost
        } else {
            agent_cfg.step_cost
        };
        let interval = self.config.simulation.tick_interval();

        let agent = &mut self.agents[idx];
        let from = agent.position;
        let before = agent.energy;
        agent.advance_to(next);
        let depleted = agent.drain(cost);
        agent
            .metrics
            .record_step(before - agent.energy, from.euclidean(next), interval);
        if hazard {
            agent.metrics.hazard_collisions += 1;
        }

        let signals = Signals {
            distance: distance_membership(next.euclidean(goal)),
            obstacle_density: obstacle_density(self.maze.grid(), next),
            energy: energy_membership(agent.energy),
            danger: layer_density(self.maze.danger(), next),
            safety: layer_density(self.maze.safety(), next),
            ..Default::default()
        };
        agent.speed = adjust_speed(agent.speed, &signals, agent_cfg);
        let (energy, speed, exhausted_plan) = (agent.energy, agent.speed, agent.remaining_steps() == 0);

        self.emit(SimEvent::Moved {
            agent: idx,
            from,
            to: next,
            energy,
            speed,
        });

        if next == goal {
            self.stop(idx, StopReason::ReachedGoal);
        } else if depleted {
            self.stop(idx, StopReason::OutOfEnergy);
        } else if exhausted_plan {
            self.stop(idx, StopReason::Unreachable);
        }
    }

    fn edited(&mut self, at: Coord, cell: Cell) {
        self.emit(SimEvent::GridChanged { at, cell });
        self.schedule_replan();
    }

    pub fn toggle_wall(&mut self, at: Coord) -> Result<Cell> {
        let cell = self.maze.toggle_wall(at)?;
        self.edited(at, cell);
        Ok(cell)
    }

    pub fn toggle_hazard(&mut self, at: Coord) -> Result<Cell> {
        let cell = self.maze.toggle_hazard(at)?;
        self.edited(at, cell);
        Ok(cell)
    }

    pub fn set_start(&mut self, at: Coord) -> Result<()> {
        self.maze.set_start(at)?;
        self.endpoints_changed();
        Ok(())
    }

    pub fn set_goal(&mut self, at: Coord) -> Result<()> {
        self.maze.set_goal(at)?;
        self.endpoints_changed();
        Ok(())
    }

    fn endpoints_changed(&mut self) {
        let (start, goal) = (self.maze.start(), self.maze.goal());
        self.emit(SimEvent::EndpointsChanged { start, goal });
        self.schedule_replan();
    }

    /// Opens the whole field and returns every agent to an idle start.
    pub fn clear(&mut self) {
        self.maze.clear();
        let start = self.maze.start();
        for agent in &mut self.agents {
            agent.reset(start, &self.config.agent);
        }
        self.replan_due = None;
        self.emit(SimEvent::Cleared);
    }

    /// Restores every agent's energy. Agents that ran dry resume after the
    /// next replan.
    pub fn reset_agents(&mut self) {
        let mut revived = false;
        for agent in &mut self.agents {
            agent.restore_energy(&self.config.agent);
            if agent.phase == AgentPhase::Stopped(StopReason::OutOfEnergy) {
                agent.phase = AgentPhase::Replanning;
                revived = true;
            }
        }
        if revived {
            self.schedule_replan();
        }
    }
}
