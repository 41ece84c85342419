use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::LevelFilter;

pub const LOG_DIR: &str = "logs";

/// Log file for the named logger, e.g. `./logs/yt2spotify.log`.
pub fn log_file_path(name: &str) -> PathBuf {
    Path::new(".").join(LOG_DIR).join(format!("{}.log", name))
}

pub fn format_line(level: log::Level, message: &std::fmt::Arguments) -> String {
    format!("{} - {}", level, message)
}

fn dispatch(level: LevelFilter) -> fern::Dispatch {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("{}", format_line(record.level(), message)))
        })
        .level(level)
}

/// Sends every record to stderr and appends it to `log_file`, creating the
/// parent directory when needed.
pub fn setup_logging(level: LevelFilter, log_file: &Path) -> Result<(), anyhow::Error> {
    if let Some(dir) = log_file.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("could not create log directory {}", dir.display()))?;
    }
    let file = fern::log_file(log_file)
        .with_context(|| format!("could not open log file {}", log_file.display()))?;

    dispatch(level)
        .chain(std::io::stderr())
        .chain(file)
        .apply()
        .context("logger already initialised")?;
    Ok(())
}
