use crate::errors::PowError;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes `tracing` as the logger for the verifier and the
/// `mainchain-pow` binary.
///
/// # Parameters
///
/// - `level`: Default level, usually from [`verbosity_to_level_filter`]
///   applied to `--verbose`. `None` (verbosity 0) logs nothing unless
///   `RUST_LOG` enables it. `RUST_LOG` directives always take precedence,
///   e.g. `RUST_LOG=mainchain_pow::window=debug` to see window construction.
///
/// Output is JSON if `JSON_LOGS` is set.
///
/// # Returns
///
/// Returns `Err` if `tracing` can't be initialized. A second call keeps the
/// first subscriber and returns `Ok(())`.
pub fn initialize_logger(level: Option<LevelFilter>) -> Result<(), PowError> {
    let filter = level.map_or_else(EnvFilter::from_default_env, |level| {
        EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy()
    });
    let registry = tracing_subscriber::registry().with(filter);

    let res = if std::env::var_os("JSON_LOGS").is_some() {
        registry
            .with(fmt::layer().with_test_writer().json())
            .try_init()
    } else {
        registry.with(fmt::layer().with_test_writer()).try_init()
    };

    match res {
        Ok(()) => Ok(()),
        Err(e) if e.to_string() == "a global default trace dispatcher has already been set" => {
            tracing::trace!("Tracing is already initialized, skipping without errors...");
            Ok(())
        }
        Err(e) => Err(PowError::ConfigError(e.to_string())),
    }
}

/// Maps a `-v` count from 0 (none) to 5 (trace) onto a level filter.
pub fn verbosity_to_level_filter(verbose: u8) -> Option<LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(LevelFilter::ERROR),
        2 => Some(LevelFilter::WARN),
        3 => Some(LevelFilter::INFO),
        4 => Some(LevelFilter::DEBUG),
        _ => Some(LevelFilter::TRACE),
    }
}
