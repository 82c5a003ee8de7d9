use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jiff::Zoned;
use log::{LevelFilter, info};
use serde::Serialize;
use ::svg::Document;

use textile_ga::io::ext_repr::ExtInstance;

use crate::EPOCH;

pub mod cli;
pub mod output;
pub mod svg;

pub fn read_instance(path: &Path) -> Result<ExtInstance> {
    let file = File::open(path).with_context(|| format!("could not open instance file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("not a valid instance file: {}", path.display()))
}

pub fn write_json(json: &impl Serialize, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("could not open file: {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, json).with_context(|| format!("could not write file: {}", path.display()))?;

    info!("[IO] json written to file://{}", fs::canonicalize(path)?.display());
    Ok(())
}

pub fn write_svg(document: &Document, path: &Path) -> Result<()> {
    ::svg::save(path, document).with_context(|| format!("could not write svg file: {}", path.display()))?;
    info!("[IO] svg written to file://{}", fs::canonicalize(path)?.display());
    Ok(())
}

/// The given folder, or a new folder in the working directory named after the instance and the current time
pub fn solution_folder(folder: Option<PathBuf>, input_stem: &str) -> Result<PathBuf> {
    let folder = match folder {
        Some(folder) => folder,
        None => PathBuf::from(format!(
            "output_{input_stem}_{}",
            Zoned::now().strftime("%Y-%m-%d_%H-%M-%S")
        )),
    };
    if !folder.exists() {
        fs::create_dir_all(&folder).with_context(|| format!("could not create solution folder: {}", folder.display()))?;
    }
    Ok(folder)
}

pub fn init_logger(level_filter: LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        // Perform allocation-free log formatting
        .format(|out, message, record| {
            let handle = std::thread::current();
            let thread_name = handle.name().unwrap_or("-");

            let duration = EPOCH.elapsed();
            let sec = duration.as_secs() % 60;
            let min = (duration.as_secs() / 60) % 60;
            let hours = (duration.as_secs() / 60) / 60;

            let prefix = format!(
                "[{}] [{:0>2}:{:0>2}:{:0>2}] <{}>",
                record.level(),
                hours,
                min,
                sec,
                thread_name,
            );

            out.finish(format_args!("{prefix:<27}{message}"))
        })
        // Add blanket level filter -
        .level(level_filter)
        .chain(std::io::stdout())
        .apply()?;
    info!("[MAIN] epoch: {}", Zoned::now());
    Ok(())
}
