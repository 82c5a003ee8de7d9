use serde::{Deserialize, Serialize};

use textile_ga::textile::TextileGAConfig;

use crate::io::svg::SvgDrawOptions;

/// Configuration for the tga runner
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct TGAConfig {
    /// Configuration of the genetic algorithm and its operators
    pub textile: TextileGAConfig,
    /// Number of generations to compute
    pub n_generations: usize,
    /// SVG drawing options of the best layout
    pub svg_draw_options: SvgDrawOptions,
}

impl Default for TGAConfig {
    fn default() -> Self {
        Self {
            textile: TextileGAConfig {
                prng_seed: Some(0),
                ..TextileGAConfig::default()
            },
            n_generations: 50,
            svg_draw_options: SvgDrawOptions::default(),
        }
    }
}
