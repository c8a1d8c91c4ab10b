use config::{Config, ConfigError, Environment, File};

const CONFIG_FILE: &str = "config/default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl Settings {
    /// Layers built-in defaults, the optional `config/default.toml` file and
    /// the process environment (`DATABASE_URL`, `HOST`, `PORT`).
    ///
    /// The connection string is read from `DATABASE_URL` first and falls back
    /// to the `database.url` key of the config file.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::default())
            .build()?;
        Self::from_config(&config)
    }

    fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let database_url = config
            .get_string("database_url")
            .or_else(|_| config.get_string("database.url"))
            .map_err(|_| {
                ConfigError::NotFound(
                    "DATABASE_URL is not set and config/default.toml has no database.url".into(),
                )
            })?;
        let port = config.get_int("port")?;
        let port = u16::try_from(port)
            .map_err(|_| ConfigError::Message(format!("PORT must be a valid number, got {port}")))?;

        Ok(Self {
            database_url,
            host: config.get_string("host")?,
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use config::{Config, FileFormat};

    use super::Settings;

    fn from_toml(toml: &str) -> Result<Settings, config::ConfigError> {
        let config = Config::builder()
            .set_default("host", "0.0.0.0")
            .unwrap()
            .set_default("port", 8080)
            .unwrap()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap();
        Settings::from_config(&config)
    }

    #[test]
    fn file_key_is_used_when_env_is_absent() {
        let settings = from_toml("[database]\nurl = \"postgres://file/db\"").unwrap();

        assert_eq!(settings.database_url, "postgres://file/db");
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8080);
    }

    #[test]
    fn flat_database_url_wins_over_file_key() {
        let settings = from_toml(
            "database_url = \"postgres://env/db\"\nport = 9000\n[database]\nurl = \"postgres://file/db\"",
        )
        .unwrap();

        assert_eq!(settings.database_url, "postgres://env/db");
        assert_eq!(settings.port, 9000);
    }

    #[test]
    fn missing_connection_string_is_an_error() {
        assert!(from_toml("host = \"127.0.0.1\"").is_err());
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        assert!(from_toml("database_url = \"postgres://x\"\nport = 70000").is_err());
    }
}
