use crate::services::upload_service::NamingPolicy;
use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use std::{env, path::PathBuf};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub upload_naming: NamingPolicy,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Drone registry and video upload API")]
pub struct Args {
    /// Host to bind to (overrides DRONE_FEEDER_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides DRONE_FEEDER_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides DRONE_FEEDER_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Directory where uploaded videos are written (overrides DRONE_FEEDER_UPLOAD_DIR)
    #[arg(long)]
    pub upload_dir: Option<PathBuf>,

    /// How uploaded files are named on disk (overrides DRONE_FEEDER_UPLOAD_NAMING)
    #[arg(long, value_enum)]
    pub upload_naming: Option<NamingPolicy>,

    /// Apply the database schema and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        Ok((Self::resolve(args, |key| env::var(key))?, migrate))
    }

    /// Merge CLI values over environment values over defaults.
    fn resolve<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let var = |key: &str| -> Result<Option<String>> {
            match lookup(key) {
                Ok(value) => Ok(Some(value)),
                Err(env::VarError::NotPresent) => Ok(None),
                Err(err) => Err(err).with_context(|| format!("reading {}", key)),
            }
        };

        let env_host = var("DRONE_FEEDER_HOST")?.unwrap_or_else(|| "0.0.0.0".into());
        let env_port = match var("DRONE_FEEDER_PORT")? {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing DRONE_FEEDER_PORT value `{}`", value))?,
            None => 3000,
        };
        let env_db = var("DRONE_FEEDER_DATABASE_URL")?
            .unwrap_or_else(|| "sqlite://./data/drone_feeder.db".into());
        let env_upload_dir = var("DRONE_FEEDER_UPLOAD_DIR")?
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("videos-uploads"));
        let env_naming = match var("DRONE_FEEDER_UPLOAD_NAMING")? {
            Some(value) => NamingPolicy::from_str(&value, true).map_err(|err| {
                anyhow!("parsing DRONE_FEEDER_UPLOAD_NAMING value `{}`: {}", value, err)
            })?,
            None => NamingPolicy::default(),
        };

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            upload_dir: args.upload_dir.unwrap_or(env_upload_dir),
            upload_naming: args.upload_naming.unwrap_or(env_naming),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(
        vars: &[(&'static str, &'static str)],
    ) -> impl Fn(&str) -> Result<String, env::VarError> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| {
            vars.get(key)
                .map(|v| v.to_string())
                .ok_or(env::VarError::NotPresent)
        }
    }

    #[test]
    fn defaults_apply_without_env_or_flags() {
        let cfg = AppConfig::resolve(Args::default(), lookup(&[])).unwrap();
        assert_eq!(cfg.addr(), "0.0.0.0:3000");
        assert_eq!(cfg.upload_dir, PathBuf::from("videos-uploads"));
        assert_eq!(cfg.upload_naming, NamingPolicy::Verbatim);
        assert_eq!(cfg.database_url, "sqlite://./data/drone_feeder.db");
    }

    #[test]
    fn env_overrides_defaults_and_flags_override_env() {
        let env = lookup(&[
            ("DRONE_FEEDER_PORT", "8080"),
            ("DRONE_FEEDER_UPLOAD_NAMING", "randomized"),
            ("DRONE_FEEDER_UPLOAD_DIR", "/srv/videos"),
        ]);
        let args = Args {
            port: Some(9090),
            ..Args::default()
        };
        let cfg = AppConfig::resolve(args, env).unwrap();
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.upload_naming, NamingPolicy::Randomized);
        assert_eq!(cfg.upload_dir, PathBuf::from("/srv/videos"));
    }

    #[test]
    fn invalid_env_values_are_errors() {
        assert!(AppConfig::resolve(Args::default(), lookup(&[("DRONE_FEEDER_PORT", "x")])).is_err());
        assert!(
            AppConfig::resolve(
                Args::default(),
                lookup(&[("DRONE_FEEDER_UPLOAD_NAMING", "sometimes")])
            )
            .is_err()
        );
    }
}
