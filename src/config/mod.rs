use anyhow::Context;

#[derive(Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database_url: String,
    pub cors_allowed_origins: Vec<String>,
    pub environment: Environment,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("server", &self.server)
            .field("database_url", &"[REDACTED]")
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("environment", &self.environment)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Controls how much detail 500 responses carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn from_env_value(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "development" | "dev" => Self::Development,
            _ => Self::Production,
        }
    }
}

impl AppConfig {
    /// Resolve the full configuration from environment variables once at
    /// process start. `DATABASE_URL` is the only required variable.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let server = ServerConfig {
            host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5005),
        };

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let environment = std::env::var("APP_ENV")
            .map(|v| Environment::from_env_value(&v))
            .unwrap_or(Environment::Production);

        Ok(AppConfig {
            server,
            database_url,
            cors_allowed_origins,
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_known_values() {
        assert_eq!(
            Environment::from_env_value("development"),
            Environment::Development
        );
        assert_eq!(Environment::from_env_value("DEV"), Environment::Development);
        assert_eq!(
            Environment::from_env_value("production"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_env_value("staging"),
            Environment::Production
        );
    }
}
