use serde::{Deserialize, Serialize};

use crate::ledger::UrgencyThresholds;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub agency: Agency,
    #[serde(default)]
    pub ledger: LedgerSettings,
    #[serde(default)]
    pub urgency: UrgencyThresholds,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Agency {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LedgerSettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct StorageSettings {
    /// Where trip files live; relative paths resolve against the config dir.
    #[serde(default)]
    pub trips_dir: Option<String>,
}
