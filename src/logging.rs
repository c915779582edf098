use log::LevelFilter;

/// Sets up `env_logger` on stderr.
///
/// `RUST_LOG` is honored; an explicit `level` takes precedence over it.
pub fn init(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None);
    // A second init (tests) is harmless.
    let _ = builder.try_init();
}
