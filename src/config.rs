use std::env;

/// Configuration de l'application, chargée une seule fois au démarrage.
/// Les secrets obligatoires (BD, JWT, SMTP) font échouer le démarrage
/// s'ils sont absents: aucune valeur par défaut embarquée dans le code.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub email_from: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable '{0}'")]
    Missing(String),

    #[error("invalid value for '{0}': {1}")]
    Invalid(String, String),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let required =
            |name: &str| env::var(name).map_err(|_| ConfigError::Missing(name.to_string()));

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid("PORT".to_string(), e.to_string()))?;
        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid("SMTP_PORT".to_string(), e.to_string()))?;

        Ok(Self {
            host,
            port,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            smtp_host: required("SMTP_HOST")?,
            smtp_port,
            smtp_username: required("SMTP_USERNAME")?,
            smtp_password: required("SMTP_PASSWORD")?,
            email_from: required("EMAIL_FROM")?,
        })
    }
}
