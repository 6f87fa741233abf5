use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// `-v` asks for at least `info`, `-vv` for `debug`, `-vvv` for `trace`. A
/// configured level that is already more verbose is kept. A configured
/// directive that is not a bare level gives way to the requested one.
pub fn level_directive(configured: &str, verbose: u8) -> String {
    let requested = match verbose {
        0 => return configured.to_string(),
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    match configured.trim().parse::<LevelFilter>() {
        Ok(level) if level >= requested => configured.to_string(),
        _ => requested.to_string(),
    }
}

/// Logs go to stderr so JSON on stdout stays parseable. `RUST_LOG` wins over
/// both the config and `-v`.
pub fn init(configured: &str, verbose: u8) {
    let directive = level_directive(configured, verbose);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directive))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
    {
        eprintln!("devtree: logging already initialized: {err}");
    }
}
