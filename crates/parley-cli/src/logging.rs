//! Log subscriber setup.
//!
//! The subscriber goes in before the config is read so loader messages and
//! startup failures are not lost. The level from the config file is applied
//! afterwards through a reload handle.

use tracing::warn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use crate::settings::default_log_filter;

pub(crate) struct Logging {
    handle: reload::Handle<EnvFilter, Registry>,
    /// `RUST_LOG` was set; it wins over the config file.
    from_env: bool,
}

impl Logging {
    /// Install the global stderr subscriber at `RUST_LOG`, or `info` when unset.
    pub(crate) fn init() -> Self {
        let (filter, from_env) = match EnvFilter::try_from_default_env() {
            Ok(filter) => (filter, true),
            Err(_) => (EnvFilter::new(default_log_filter("info")), false),
        };
        let (layer, logging) = Self::layer(filter, from_env);
        let _ = tracing_subscriber::registry()
            .with(layer)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init();
        logging
    }

    fn layer(filter: EnvFilter, from_env: bool) -> (reload::Layer<EnvFilter, Registry>, Self) {
        let (layer, handle) = reload::Layer::new(filter);
        (layer, Self { handle, from_env })
    }

    /// Switch to the level from `logging.level`, unless `RUST_LOG` is in charge.
    pub(crate) fn apply_level(&self, level: &str) {
        if self.from_env {
            return;
        }
        if let Err(e) = self.handle.reload(EnvFilter::new(default_log_filter(level))) {
            warn!(error = %e, level, "Could not apply configured log level");
        }
    }
}
