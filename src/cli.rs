//! Command-line arguments for the headless runner.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "wain",
    version,
    about = "Run the page enhancements headlessly and print the resulting markup"
)]
pub struct Cli {
    /// HTML page to load.
    #[arg(value_name = "PAGE")]
    pub page: PathBuf,

    /// TOML file overriding selectors, timings and labels.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Advance virtual time by this many milliseconds (default: until no timers remain).
    #[arg(long, value_name = "MS")]
    pub advance: Option<u64>,

    /// Viewport size as WIDTHxHEIGHT.
    #[arg(long, value_name = "WxH", value_parser = parse_viewport, default_value = "1280x720")]
    pub viewport: (f32, f32),

    /// Minimum log level; overrides RUST_LOG when given.
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

fn parse_viewport(value: &str) -> Result<(f32, f32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{value}`"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f32>()
            .ok()
            .filter(|v| *v > 0.0 && v.is_finite())
            .ok_or_else(|| format!("invalid viewport dimension `{s}`"))
    };
    Ok((parse(w)?, parse(h)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_viewport_sizes() {
        assert_eq!(parse_viewport("800x600"), Ok((800.0, 600.0)));
        assert_eq!(parse_viewport("1024X768"), Ok((1024.0, 768.0)));
        assert!(parse_viewport("800").is_err());
        assert!(parse_viewport("0x600").is_err());
        assert!(parse_viewport("wide x tall").is_err());
    }

    #[test]
    fn accepts_full_command_line() {
        let cli = Cli::try_parse_from([
            "wain",
            "index.html",
            "--config",
            "enhance.toml",
            "--advance",
            "1000",
            "--viewport",
            "390x844",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.page, PathBuf::from("index.html"));
        assert_eq!(cli.advance, Some(1000));
        assert_eq!(cli.viewport, (390.0, 844.0));
        assert!(matches!(cli.log_level, Some(LogLevelArg::Debug)));
    }
}
