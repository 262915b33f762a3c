use std::{collections::HashMap, path::Path, sync::Arc};

use derive_builder::Builder;
use once_cell::sync::Lazy;
use subattr_rs_core::DEFAULT_PACKAGE;
use tracing::info;
use ustr::{ustr, Ustr};

static SHARED_DEFAULT: Lazy<Arc<Config>> = Lazy::new(|| Config::default().into());

/// The main struct that handles runtime use configurations.
#[derive(Debug, Builder)]
#[builder(build_fn(error = "subattr_rs_errors::AttrError"))]
#[readonly::make]
pub struct Config {
    /// The package that unqualified names resolve into
    #[builder(setter(into), default = "ustr(DEFAULT_PACKAGE)")]
    pub default_package: Ustr,

    /// Emit a warning when an alias or a signal registration displaces
    /// an existing binding
    #[builder(default = "true")]
    pub warn_on_clobber: bool,

    /// Upper bound on each memoization cache, in entries. `None` means
    /// unbounded, and nothing is ever evicted.
    #[builder(setter(into, strip_option), default = "None")]
    pub memoize_cache_capacity: Option<usize>,

    #[builder(setter(strip_option), default = "None")]
    pub log_level: Option<tracing::Level>,
}

impl Config {
    /// The process-shared default configuration.
    pub fn shared_default() -> Arc<Config> {
        SHARED_DEFAULT.clone()
    }
}

impl ConfigBuilder {
    /// Set config values from a `dotenv` file. If `env_path` is `None`, the default `.env` is used.
    pub fn load_env<P>(&mut self, env_path: Option<P>) -> &mut Self
    where
        P: AsRef<Path>,
    {
        let _ = match env_path {
            Some(p) => {
                dotenvy::from_filename(p).map_err(|e| info!(".env not loaded: {}", e.to_string()))
            }
            None => dotenvy::dotenv().map_err(|e| info!(".env not loaded: {}", e.to_string())),
        };

        let env = std::env::vars()
            .map(|(k, v)| {
                let key = k.to_uppercase();

                (key, v)
            })
            .collect::<HashMap<_, _>>();

        let s = Self {
            default_package: env
                .get("SUBATTR_DEFAULT_PACKAGE")
                .or_else(|| env.get("DEFAULT_PACKAGE"))
                .map(|x| ustr(x))
                .or(self.default_package),
            warn_on_clobber: env
                .get("SUBATTR_WARN_ON_CLOBBER")
                .or_else(|| env.get("WARN_ON_CLOBBER"))
                .map(|x| x.parse::<bool>().unwrap())
                .or(self.warn_on_clobber),
            memoize_cache_capacity: env
                .get("SUBATTR_MEMOIZE_CACHE_CAPACITY")
                .or_else(|| env.get("MEMOIZE_CACHE_CAPACITY"))
                .map(|x| Some(x.parse::<usize>().unwrap()))
                .or(self.memoize_cache_capacity),
            log_level: env
                .get("SUBATTR_LOG_LEVEL")
                .or_else(|| env.get("LOG_LEVEL"))
                .map(|x| Some(x.parse::<tracing::Level>().unwrap()))
                .or(self.log_level),
        };

        let new = self;

        *new = s;

        new
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_package: ustr(DEFAULT_PACKAGE),
            warn_on_clobber: true,
            memoize_cache_capacity: None,
            log_level: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use claims::*;

    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::default().build();
        assert_ok!(config.as_ref());

        let config = config.unwrap();
        assert_eq!(config.default_package.as_str(), DEFAULT_PACKAGE);
        assert!(config.warn_on_clobber);
        assert_eq!(config.memoize_cache_capacity, None);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConfigBuilder::default()
            .default_package("Dog")
            .warn_on_clobber(false)
            .memoize_cache_capacity(128_usize)
            .build()
            .unwrap();

        assert_eq!(config.default_package.as_str(), "Dog");
        assert!(!config.warn_on_clobber);
        assert_eq!(config.memoize_cache_capacity, Some(128));
    }

    #[test]
    fn test_shared_default_is_shared() {
        let a = Config::shared_default();
        let b = Config::shared_default();

        assert!(Arc::ptr_eq(&a, &b));
    }
}
