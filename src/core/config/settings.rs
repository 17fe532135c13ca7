use std::path::Path;

use super::parsing::{
    env_optional, env_or_default, parse_bool, parse_cors_origins, parse_environment, parse_i64,
    parse_u32, parse_u64,
};
use super::reference::ReferenceData;
use super::secret::load_or_create_secret_key;
use super::types::{
    ApiSettings, ConfigError, CorsSettings, DatabaseSettings, GradingSettings, RuntimeSettings,
    SecuritySettings, SeedSettings, ServerHost, ServerPort, ServerSettings, Settings,
    TelemetrySettings,
};

pub(crate) const DEFAULT_SEED_ADMIN_USERNAME: &str = "admin";
pub(crate) const DEFAULT_SEED_ADMIN_PASSWORD: &str = "admin";

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("RECORDS_HOST", "0.0.0.0");
        let port = env_or_default("RECORDS_PORT", "8000");

        let environment =
            parse_environment(env_optional("RECORDS_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config =
            env_optional("RECORDS_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "Academic Records API");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let api_v1_str = env_or_default("API_V1_STR", "/api/v1");

        let explicit_secret = env_optional("SECRET_KEY");
        let secret_key_configured = explicit_secret.is_some();
        let secret_key = match explicit_secret {
            Some(value) => value,
            None => load_or_create_secret_key(),
        };

        let access_token_expire_minutes = parse_u64(
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            env_or_default("ACCESS_TOKEN_EXPIRE_MINUTES", "720"),
        )?;
        let algorithm = env_or_default("ALGORITHM", "HS256");

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let database_url = env_or_default("DATABASE_URL", "sqlite://academic_records.db");
        let max_connections =
            parse_u32("DATABASE_MAX_CONNECTIONS", env_or_default("DATABASE_MAX_CONNECTIONS", "5"))?;
        let busy_timeout_seconds = parse_u64(
            "DATABASE_BUSY_TIMEOUT_SECONDS",
            env_or_default("DATABASE_BUSY_TIMEOUT_SECONDS", "5"),
        )?;

        let admin_username = env_or_default("SEED_ADMIN_USERNAME", DEFAULT_SEED_ADMIN_USERNAME);
        let admin_password = env_or_default("SEED_ADMIN_PASSWORD", DEFAULT_SEED_ADMIN_PASSWORD);
        let admin_full_name = env_or_default("SEED_ADMIN_FULL_NAME", "Адміністратор");
        let admin_group_link = env_or_default("SEED_ADMIN_GROUP_LINK", "Staff");

        let min_grade = parse_i64("GRADE_MIN", env_or_default("GRADE_MIN", "0"))?;
        let max_grade = parse_i64("GRADE_MAX", env_or_default("GRADE_MAX", "100"))?;

        let reference = match env_optional("REFERENCE_DATA_PATH") {
            Some(path) => ReferenceData::load(Path::new(&path))?,
            None => ReferenceData::default(),
        };

        let log_level = env_or_default("RECORDS_LOG_LEVEL", "info");
        let json = env_optional("RECORDS_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, api_v1_str },
            security: SecuritySettings { secret_key, access_token_expire_minutes, algorithm },
            cors: CorsSettings { origins: cors_origins },
            database: DatabaseSettings { database_url, max_connections, busy_timeout_seconds },
            seed: SeedSettings { admin_username, admin_password, admin_full_name, admin_group_link },
            grading: GradingSettings { min_grade, max_grade },
            reference,
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate(secret_key_configured)?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn security(&self) -> &SecuritySettings {
        &self.security
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn seed(&self) -> &SeedSettings {
        &self.seed
    }

    pub(crate) fn grading(&self) -> &GradingSettings {
        &self.grading
    }

    pub(crate) fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self, secret_key_configured: bool) -> Result<(), ConfigError> {
        if self.grading.min_grade > self.grading.max_grade {
            return Err(ConfigError::InvalidValue {
                field: "GRADE_MIN",
                value: format!("{} > {}", self.grading.min_grade, self.grading.max_grade),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "DATABASE_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        if self.seed.admin_username.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "SEED_ADMIN_USERNAME",
                value: String::from("<empty>"),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if !secret_key_configured {
            return Err(ConfigError::MissingSecret("SECRET_KEY"));
        }
        if self.seed.admin_password == DEFAULT_SEED_ADMIN_PASSWORD {
            return Err(ConfigError::InsecureDefault("SEED_ADMIN_PASSWORD"));
        }

        Ok(())
    }
}
