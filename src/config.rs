use std::path::PathBuf;

use clap::Parser;

use crate::data::loader::SqliteStore;

/// Command-line / environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "power-pulse", version, about = "Household power-consumption dashboard")]
pub struct Config {
    /// SQLite database holding the readings table.
    #[arg(long = "db", env = "POWER_PULSE_DB", default_value = "power_pulse.db")]
    pub db_path: PathBuf,

    /// Name of the readings table.
    #[arg(
        long,
        env = "POWER_PULSE_TABLE",
        default_value = "power_consumption",
        value_parser = parse_table_name
    )]
    pub table: String,
}

impl Config {
    pub fn store(&self) -> SqliteStore {
        SqliteStore::new(&self.db_path, &self.table)
    }
}

/// Accept only plain SQL identifiers for the table name.
fn parse_table_name(s: &str) -> Result<String, String> {
    let mut chars = s.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(s.to_string())
    } else {
        Err(format!("'{s}' is not a plain table identifier"))
    }
}
