mod settings;
mod trip;

pub use settings::{Agency, Config, LedgerSettings, StorageSettings};
pub use trip::{AddOn, ExpenseRecord, Passenger, SelectionRecord, TripFile, TripInfo};

use crate::error::{Result, TripError};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, else ~/.tripledger/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "tripledger") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        TripError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".tripledger"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Directory holding trip files
pub fn trips_dir(config: &Config, cfg_dir: &Path) -> PathBuf {
    match config.storage.trips_dir.as_deref() {
        Some(dir) => {
            let path = expand_path(dir);
            if path.is_absolute() {
                path
            } else {
                cfg_dir.join(path)
            }
        }
        None => cfg_dir.join("trips"),
    }
}

/// Load the main config.toml
pub fn load_config(cfg_dir: &Path) -> Result<Config> {
    let path = cfg_dir.join("config.toml");
    if !path.exists() {
        return Err(TripError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| TripError::ConfigParse { path, source: e })
}

fn trip_path(trips_dir: &Path, trip_id: &str) -> PathBuf {
    trips_dir.join(format!("{trip_id}.toml"))
}

/// Load trips/<id>.toml
pub fn load_trip(trips_dir: &Path, trip_id: &str) -> Result<TripFile> {
    let path = trip_path(trips_dir, trip_id);
    if !path.exists() {
        return Err(TripError::TripNotFound(trip_id.to_string()));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| TripError::ConfigParse { path, source: e })
}

/// Save trips/<id>.toml
pub fn save_trip(trips_dir: &Path, trip_id: &str, trip: &TripFile) -> Result<()> {
    let path = trip_path(trips_dir, trip_id);
    let content = toml::to_string_pretty(trip).map_err(|e| TripError::ConfigWrite {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    fs::create_dir_all(trips_dir)?;
    fs::write(&path, content)?;
    tracing::info!(trip = trip_id, path = %path.display(), "saved trip");
    Ok(())
}

/// Trip ids (file stems) found in the trips directory, sorted
pub fn list_trips(trips_dir: &Path) -> Result<Vec<String>> {
    if !trips_dir.exists() {
        return Ok(Vec::new());
    }
    let mut ids = Vec::new();
    for entry in fs::read_dir(trips_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("toml") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            ids.push(stem.to_string());
        }
    }
    ids.sort();
    Ok(ids)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[agency]
name = "Your Travel Agency"
email = "trips@youragency.com"
# phone = "+55 11 4000-0000"    # optional

[ledger]
currency_symbol = "$"

[urgency]
critical_after_days = 7   # more than this many days overdue is critical
attention_from_days = 3   # from here up to critical is attention

# [storage]
# trips_dir = "~/trips"     # default: <config dir>/trips
"#;

/// Template content for trips/example-trip.toml
pub const EXAMPLE_TRIP_TEMPLATE: &str = r#"# One file per trip. The file name (e.g., example-trip.toml) is the trip id
# used by the other commands:
#
#   tripledger passengers example-trip
#   tripledger pay example-trip ana 50 --stream addons

[trip]
name = "Example Trip"
destination = "Serra Gaucha"
departure = "2026-11-20"

[[add_ons]]
id = "wine-tour"
name = "Wine Tour"
price = 50.00
cost = 30.00     # paid to the supplier per participant

[[add_ons]]
id = "dinner"
name = "Farewell Dinner"
price = 40.00
cost = 25.00

[[passengers]]
id = "ana"
name = "Ana Souza"
phone = "+55 11 98888-0001"
fare = 150.00
days_overdue = 2

[[passengers]]
id = "bruno"
name = "Bruno Lima"
phone = "+55 11 98888-0002"
fare = 150.00
discount = 20.00
days_overdue = 9

[[passengers]]
id = "carla"
name = "Carla Dias"
fare = 150.00
complimentary = true   # tour leader, exempt from every charge

[[selections]]
passenger = "ana"
add_on = "wine-tour"

[[selections]]
passenger = "ana"
add_on = "dinner"

[[selections]]
passenger = "carla"
add_on = "wine-tour"

[[payments]]
passenger = "ana"
amount = 150.00
stream = "fare"          # fare | addons | both
date = "2026-10-01"
method = "pix"

[[expenses]]
description = "Bus charter"
amount = 200.00
category = "transport"
"#;
