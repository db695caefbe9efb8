use log::LevelFilter;

/// Installs `pretty_env_logger` at `level`, still honouring `RUST_LOG`.
/// Later calls are ignored so tests can call this freely.
pub fn init_logging(level: LevelFilter) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    let _ = builder.try_init();
}
