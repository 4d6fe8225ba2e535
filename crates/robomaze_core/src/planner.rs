//! Common seam between the simulation loop and the three decision engines.

use crate::astar::AStar;
use crate::colony::ColonyOptimizer;
use crate::config::AppConfig;
use crate::fuzzy::{FuzzyEngine, OscillationMemory};
use robomaze_data::{Coord, Maze};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered cells from a start towards a goal. Empty means no route.
pub type Path = Vec<Coord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    AStar,
    Colony,
    Fuzzy,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::AStar, Strategy::Colony, Strategy::Fuzzy];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Strategy::AStar => "astar",
            Strategy::Colony => "colony",
            Strategy::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "astar" | "a*" => Ok(Strategy::AStar),
            "colony" | "aco" => Ok(Strategy::Colony),
            "fuzzy" => Ok(Strategy::Fuzzy),
            other => Err(format!("unknown strategy '{other}'")),
        }
    }
}

/// Everything an engine may look at when planning.
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    pub maze: &'a Maze,
    pub from: Coord,
    pub goal: Coord,
    /// Current energy of the requesting agent.
    pub energy: f64,
    /// Current speed of the requesting agent.
    pub speed: f64,
    /// Cells the requesting agent entered most recently.
    pub memory: &'a OscillationMemory,
}

pub trait PathPlanner: Send {
    fn strategy(&self) -> Strategy;

    /// Produces a path from `request.from` to `request.goal`, or an empty
    /// path when the engine found none.
    fn plan(&mut self, request: &PlanRequest<'_>) -> Path;
}

/// Builds the engine for `strategy`. `seed` feeds the stochastic engines
/// that have no fixed seed configured.
#[must_use]
pub fn planner_for(strategy: Strategy, config: &AppConfig, seed: u64) -> Box<dyn PathPlanner> {
    match strategy {
        Strategy::AStar => Box::new(AStar::new(config.astar.clone())),
        Strategy::Colony => Box::new(ColonyOptimizer::new(
            config.colony.clone(),
            config.colony.seed.unwrap_or(seed),
        )),
        Strategy::Fuzzy => Box::new(FuzzyEngine::new(
            config.fuzzy.clone(),
            config.agent.clone(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parse_and_display() {
        for s in Strategy::ALL {
            assert_eq!(s.to_string().parse::<Strategy>(), Ok(s));
        }
        assert_eq!("ACO".parse::<Strategy>(), Ok(Strategy::Colony));
        assert!("dijkstra".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_planner_for_reports_strategy() {
        let config = AppConfig::default();
        for s in Strategy::ALL {
            assert_eq!(planner_for(s, &config, 1).strategy(), s);
        }
    }
}
