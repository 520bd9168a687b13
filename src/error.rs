use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TripError {
    #[error("Config directory not found at {0}. Run 'tripledger init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write {path}: {reason}")]
    ConfigWrite { path: PathBuf, reason: String },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Trip '{0}' not found. Use 'tripledger trips' to see available trips.")]
    TripNotFound(String),

    #[error("Passenger '{0}' not found on this trip")]
    PassengerNotFound(String),

    #[error("Invalid passenger index '{0}'. Use 'tripledger passengers <trip>' to see the roster.")]
    InvalidPassengerIndex(String),

    #[error("Invalid passenger format '{0}'. Expected 'id:name' or 'id:name:phone'")]
    InvalidPassengerFormat(String),

    #[error("No passengers specified. Use --passenger <id:name[:phone]> to enroll someone.")]
    NoPassengers,

    #[error("Invalid stream '{0}'. Use 'fare', 'addons', or 'both'.")]
    InvalidStream(String),

    #[error("Invalid category '{0}'. Use 'all', 'trip-only', 'add-ons-only', or 'both'.")]
    InvalidCategory(String),

    #[error("Invalid sort order '{0}'. Use 'name', 'owed', or 'pending'.")]
    InvalidSortOrder(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Payment amount must be greater than zero")]
    InvalidPaymentAmount,

    #[error("Passenger '{0}' is complimentary and cannot receive payments")]
    ComplimentaryPassenger(String),

    #[error("Enrollment failed for every passenger: {0}")]
    EnrollmentFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TripError>;
