use anyhow::{Context, Result};
use dotenvy::dotenv;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::{env, str::FromStr};
use utoipa::ToSchema;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub settings: Settings,
}

/// Business settings loaded once at startup. Every field has a default so a
/// bare environment still yields a usable configuration.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub payroll: PayrollSettings,
    pub procurement: ProcurementSettings,
    pub expense_types: Vec<String>,
    pub claim_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollSettings {
    pub total_working_days: i32,
    pub overtime_rate_multiplier: Decimal,
    /// Hours in a standard shift; beyond this a day counts as overtime.
    pub standard_shift_hours: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementSettings {
    /// Grand totals strictly above this need an admin decision.
    pub value_threshold: Decimal,
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            total_working_days: 26,
            overtime_rate_multiplier: dec!(1.5),
            standard_shift_hours: dec!(8),
        }
    }
}

impl Default for ProcurementSettings {
    fn default() -> Self {
        Self {
            value_threshold: dec!(100000),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            payroll: PayrollSettings::default(),
            procurement: ProcurementSettings::default(),
            expense_types: ["Travel", "Food", "Fuel", "Maintenance", "Office Supplies"]
                .into_iter()
                .map(String::from)
                .collect(),
            claim_types: ["Medical", "Travel", "Overtime Meal", "Other"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = Settings::default();
        let settings = Settings {
            payroll: PayrollSettings {
                total_working_days: parse_var(
                    "PAYROLL_TOTAL_WORKING_DAYS",
                    defaults.payroll.total_working_days,
                )?,
                overtime_rate_multiplier: parse_var(
                    "PAYROLL_OVERTIME_MULTIPLIER",
                    defaults.payroll.overtime_rate_multiplier,
                )?,
                standard_shift_hours: parse_var(
                    "STANDARD_SHIFT_HOURS",
                    defaults.payroll.standard_shift_hours,
                )?,
            },
            procurement: ProcurementSettings {
                value_threshold: parse_var(
                    "PROCUREMENT_VALUE_THRESHOLD",
                    defaults.procurement.value_threshold,
                )?,
            },
            expense_types: list_var("EXPENSE_TYPES").unwrap_or(defaults.expense_types),
            claim_types: list_var("CLAIM_TYPES").unwrap_or(defaults.claim_types),
        };

        if settings.payroll.total_working_days <= 0 {
            anyhow::bail!("PAYROLL_TOTAL_WORKING_DAYS must be greater than 0");
        }

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: parse_var("SERVER_PORT", 3000)?,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_expiry_hours: parse_var("JWT_EXPIRY_HOURS", 24)?,
            settings,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn list_var(key: &str) -> Option<Vec<String>> {
    let raw = env::var(key).ok()?;
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    (!items.is_empty()).then_some(items)
}
