use dotenvy::dotenv;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use strum_macros::{Display as StrumDisplay, EnumString};
use tracing::warn;

/// Which record store backs the handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, StrumDisplay, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StoreBackend {
    /// Google Sheets document (the kiosk deployment).
    Sheets,
    /// Process-local tables, lost on restart.
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub store_backend: StoreBackend,

    // Spreadsheet connector
    pub spreadsheet_id: String,
    pub credentials_file: String,
    pub sheets_api_base: String,
    pub attendance_sheet_name: String,
    pub http_timeout_secs: u64,

    // Rate limiting, 0 disables the limiter for that route
    pub rate_register_per_min: u32,
    pub rate_attendance_per_min: u32,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or unparsable keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:5000".to_string()),
            store_backend: parse_or(&lookup, "STORE_BACKEND", StoreBackend::Sheets),

            spreadsheet_id: lookup("SPREADSHEET_ID").unwrap_or_default(),
            credentials_file: lookup("GOOGLE_CREDENTIALS_FILE")
                .unwrap_or_else(|| "credentials.json".to_string()),
            sheets_api_base: lookup("SHEETS_API_BASE")
                .unwrap_or_else(|| "https://sheets.googleapis.com/v4".to_string()),
            attendance_sheet_name: lookup("ATTENDANCE_SHEET_NAME")
                .unwrap_or_else(|| "Attendance".to_string()),
            http_timeout_secs: parse_or(&lookup, "HTTP_TIMEOUT_SECS", 30),

            rate_register_per_min: parse_or(&lookup, "RATE_REGISTER_PER_MIN", 30),
            rate_attendance_per_min: parse_or(&lookup, "RATE_ATTENDANCE_PER_MIN", 120),

            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: parse_or(&lookup, "LOG_LEVEL", tracing::Level::DEBUG),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default {default}");
            default
        }),
        None => default,
    }
}
