use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

use crate::parser::pages::DEFAULT_BANNER_LINE;

const DEFAULT_DB_PATH: &str = "data/tabu.sqlite";
const ENV_PREFIX: &str = "TABU";

/// Defaults, overridden by `TABU_*` environment variables, overridden in
/// turn by command-line flags.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: PathBuf,
    pub banner_line: usize,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_env(env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("banner_line", DEFAULT_BANNER_LINE as i64)?
            .add_source(env.try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn with_overrides(mut self, db_path: Option<PathBuf>, banner_line: Option<usize>) -> Self {
        if let Some(path) = db_path {
            self.db_path = path;
        }
        if let Some(line) = banner_line {
            self.banner_line = line;
        }
        self
    }
}
