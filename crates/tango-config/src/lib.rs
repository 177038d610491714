use std::env;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the compiled search index and display table.
    pub tables_dir: String,
    /// Directory export batches are written to.
    pub export_dir: String,
}

impl Config {
    pub fn new() -> Self {
        let tables_dir = env::var("TANGO_TABLES_DIR").unwrap_or_else(|_| "tables".to_string());
        let export_dir = env::var("TANGO_EXPORT_DIR").unwrap_or_else(|_| ".".to_string());

        Config {
            tables_dir,
            export_dir,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
