//! Configuration module
//!
//! Loads configuration from environment variables.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use crate::domain::{CompanyId, OriginatorProfile, RoutingNumber};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Routing number of the ACH operator (file header)
    pub immediate_destination: RoutingNumber,

    /// Routing number of the sending point (file header)
    pub immediate_origin: RoutingNumber,

    /// Company name for the batch header
    pub company_name: String,

    /// 10-digit company identification
    pub company_id: CompanyId,

    /// Defaults to the immediate origin
    pub originating_dfi: RoutingNumber,

    pub destination_name: Option<String>,

    pub origin_name: Option<String>,

    pub discretionary_data: Option<String>,

    /// Bank closures on top of the federal holiday calendar
    pub additional_holidays: Vec<NaiveDate>,

    /// Where generated files are written
    pub output_dir: PathBuf,

    /// Persisted file sequence counter
    pub sequence_file: PathBuf,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an explicit set of variables.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingEnv(key))
        };
        let optional = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());

        let immediate_destination =
            parse_routing("ACH_IMMEDIATE_DESTINATION", &required("ACH_IMMEDIATE_DESTINATION")?)?;
        let immediate_origin =
            parse_routing("ACH_IMMEDIATE_ORIGIN", &required("ACH_IMMEDIATE_ORIGIN")?)?;
        let company_name = required("ACH_COMPANY_NAME")?;
        let company_id = CompanyId::parse(required("ACH_COMPANY_ID")?.trim())
            .map_err(|_| ConfigError::InvalidValue("ACH_COMPANY_ID"))?;

        let originating_dfi = match optional("ACH_ORIGINATING_DFI") {
            Some(raw) => parse_routing("ACH_ORIGINATING_DFI", &raw)?,
            None => immediate_origin.clone(),
        };

        let additional_holidays = match optional("ACH_ADDITIONAL_HOLIDAYS") {
            Some(raw) => parse_dates(&raw)?,
            None => Vec::new(),
        };

        let output_dir = optional("ACH_OUTPUT_DIR")
            .unwrap_or_else(|| "./nacha_files".to_string())
            .into();

        let sequence_file = optional("ACH_SEQUENCE_FILE")
            .unwrap_or_else(|| "./ach_sequence".to_string())
            .into();

        let environment = optional("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        Ok(Self {
            immediate_destination,
            immediate_origin,
            company_name,
            company_id,
            originating_dfi,
            destination_name: optional("ACH_DESTINATION_NAME"),
            origin_name: optional("ACH_ORIGIN_NAME"),
            discretionary_data: optional("ACH_COMPANY_DISCRETIONARY_DATA"),
            additional_holidays,
            output_dir,
            sequence_file,
            environment,
        })
    }

    /// Originator identity written into every file header and batch header.
    pub fn profile(&self) -> OriginatorProfile {
        let mut profile = OriginatorProfile::new(
            self.immediate_destination.clone(),
            self.immediate_origin.clone(),
            &self.company_name,
            self.company_id.clone(),
        )
        .with_originating_dfi(self.originating_dfi.clone());
        profile.destination_name = self.destination_name.clone();
        profile.origin_name = self.origin_name.clone();
        profile.discretionary_data = self.discretionary_data.clone();
        profile
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_routing(key: &'static str, raw: &str) -> Result<RoutingNumber, ConfigError> {
    RoutingNumber::parse(raw.trim()).map_err(|_| ConfigError::InvalidValue(key))
}

fn parse_dates(raw: &str) -> Result<Vec<NaiveDate>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| ConfigError::InvalidValue("ACH_ADDITIONAL_HOLIDAYS"))
        })
        .collect()
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
