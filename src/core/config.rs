mod parsing;
pub(crate) mod reference;
mod secret;
mod settings;
mod types;

pub(crate) use reference::ReferenceData;
pub(crate) use settings::DEFAULT_SEED_ADMIN_PASSWORD;
pub(crate) use types::{
    ConfigError, GradingSettings, SecuritySettings, SeedSettings, Settings, TelemetrySettings,
};
