//! log4rs setup. Log output goes to stderr (and optionally a file) so that
//! stdout carries only the banner and report lines.

use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

const LOGGING_PATTERN: &str = "{d} {l} {f}:{L} - {m}\n";

/// Install the global logger.
///
/// `level` filters stderr. When `file_path` is given, everything down to
/// `level` is also appended to that file.
pub fn initialize_logger(level: LevelFilter, file_path: Option<&str>) -> Result<()> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
        .build();

    let mut config_builder = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(level)))
            .build("stderr", Box::new(stderr)),
    );
    let mut root = Root::builder().appender("stderr");

    if let Some(path) = file_path {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
            .build(path)
            .with_context(|| format!("cannot open log file {path}"))?;
        config_builder =
            config_builder.appender(Appender::builder().build("logfile", Box::new(logfile)));
        root = root.appender("logfile");
    }

    let config = config_builder
        .build(root.build(level))
        .context("invalid logging configuration")?;
    log4rs::init_config(config).context("logger already initialised")?;

    Ok(())
}
