use log::LevelFilter;

/// Installs the process-wide logger. `RUST_LOG` is honoured; `verbose` raises the
/// level to debug. Later calls are no-ops.
pub fn init(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    );
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}
