use subattr_rs_errors::{attr_error, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global tracing subscriber. `RUST_LOG` wins; the
/// configured level is the fallback. Errors if a subscriber is already
/// installed.
pub fn init(config: &Config) -> Result<()> {
    let filter = match config.log_level {
        Some(level) => EnvFilter::new(level.to_string()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| attr_error!("unable to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use claims::*;

    use super::*;

    #[test]
    fn test_init_twice_errors() {
        let config = Config::default();

        // Whichever test binary gets here first installs the
        // subscriber; the second call must fail either way.
        let _ = init(&config);

        let result = init(&config);
        assert_err!(result);
    }
}
