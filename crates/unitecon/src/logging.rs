use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(level: &str) -> String {
    format!("unitecon={level},unitecon_core=warn")
}

/// Initialize logging to stderr so reports on stdout stay clean.
///
/// The log level can be controlled via the `level` parameter or the
/// `RUST_LOG` environment variable, which takes precedence.
pub fn init_logging(level: &str) -> color_eyre::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(level)))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()?;

    tracing::debug!(level, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_quiets_engine() {
        assert_eq!(default_filter("debug"), "unitecon=debug,unitecon_core=warn");
        assert!(EnvFilter::try_new(default_filter("info")).is_ok());
    }
}
