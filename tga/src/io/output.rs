use serde::{Deserialize, Serialize};

use textile_ga::io::ext_repr::{ExtInstance, ExtSolution};
use textile_ga::textile::TextileGAStats;

use crate::config::TGAConfig;

/// Everything written to `results.json` at the end of a run
#[derive(Serialize, Deserialize, Clone)]
pub struct TGAOutput {
    #[serde(flatten)]
    pub instance: ExtInstance,
    pub solution: ExtSolution,
    /// Fitness of the best gene after every generation
    pub best_scores: Vec<f64>,
    /// Fitness of the final elite, best first
    pub elite_scores: Vec<f64>,
    pub stats: TextileGAStats,
}

/// Effective configuration of a run, written to `config.json`
#[derive(Serialize, Deserialize, Clone)]
pub struct ConfigDump {
    pub input_file: String,
    pub config: TGAConfig,
}
