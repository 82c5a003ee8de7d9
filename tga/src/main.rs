use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{info, warn};
use thousands::Separable;

use textile_ga::io::export::export;
use textile_ga::io::ext_repr::ExtInstance;
use textile_ga::io::import::import;
use textile_ga::textile::TextileGA;
use tga::config::TGAConfig;
use tga::io;
use tga::io::cli::Cli;
use tga::io::output::{ConfigDump, TGAOutput};
use tga::io::svg::gene_to_svg;

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = match args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            TGAConfig::default()
        }
        Some(config_file) => {
            let file = File::open(&config_file)
                .with_context(|| format!("could not open config file: {}", config_file.display()))?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).context("incorrect config file format")?
        }
    };

    info!("[MAIN] Successfully parsed TGAConfig: {config:?}");

    let input_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input file has no valid name")?
        .to_owned();
    let output_folder = io::solution_folder(args.solution_folder, &input_stem)?;

    io::write_json(
        &ConfigDump {
            input_file: args.input_file.display().to_string(),
            config,
        },
        &output_folder.join("config.json"),
    )?;

    let ext_instance = io::read_instance(&args.input_file)?;
    main_tga(ext_instance, config, &output_folder)
}

fn main_tga(ext_instance: ExtInstance, config: TGAConfig, output_folder: &Path) -> Result<()> {
    let (fabric, shapes) = import(&ext_instance)?;
    let mut tga = TextileGA::new(fabric, shapes, config.textile)?;
    tga.evolve(config.n_generations)?;

    let best = tga.best_gene();
    let n_evaluations = config.textile.ga.population_size * (config.n_generations + 1);
    info!(
        "[MAIN] finished {} generations (~{} genes scored) in {:.3}s, best fitness: {:.5}",
        config.n_generations,
        n_evaluations.separate_with_commas(),
        tga.stats().run_time.total,
        best.peek_fitness()
    );

    {
        let output = TGAOutput {
            instance: ext_instance,
            solution: export(best),
            best_scores: tga.best_scores(),
            elite_scores: tga.elite_scores(),
            stats: tga.stats().clone(),
        };
        io::write_json(&output, &output_folder.join("results.json"))?;
    }

    {
        let svg = gene_to_svg(best, config.svg_draw_options, "best");
        io::write_svg(&svg, &output_folder.join("best.svg"))?;
    }

    Ok(())
}
