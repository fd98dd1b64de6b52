// Runtime configuration loaded from environment variables

use rust_decimal::Decimal;
use std::str::FromStr;

/// Errors raised while reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Pricing and code formatting knobs shared by the services
#[derive(Debug, Clone, PartialEq)]
pub struct PricingSettings {
    /// Tax percentage applied to every line (e.g. 19 for 19%)
    pub tax_percent: Decimal,
    pub quote_code_prefix: String,
    pub order_code_prefix: String,
    /// Zero-padding width of the sequence part of a code
    pub code_width: usize,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            tax_percent: Decimal::from(19),
            quote_code_prefix: "COT".to_string(),
            order_code_prefix: "ORD".to_string(),
            code_width: 6,
        }
    }
}

/// Full application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub pricing: PricingSettings,
}

impl AppConfig {
    /// Reads configuration from the process environment
    ///
    /// Only `DATABASE_URL` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from any key lookup (environment, map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let defaults = PricingSettings::default();

        let tax_percent: Decimal = parse_or(&lookup, "TAX_PERCENT", defaults.tax_percent)?;
        if tax_percent.is_sign_negative() || tax_percent > Decimal::ONE_HUNDRED {
            return Err(ConfigError::Invalid {
                name: "TAX_PERCENT",
                value: tax_percent.to_string(),
            });
        }

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            pricing: PricingSettings {
                tax_percent,
                quote_code_prefix: lookup("QUOTE_CODE_PREFIX").unwrap_or(defaults.quote_code_prefix),
                order_code_prefix: lookup("ORDER_CODE_PREFIX").unwrap_or(defaults.order_code_prefix),
                code_width: parse_or(&lookup, "CODE_PAD_WIDTH", defaults.code_width)?,
            },
        })
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}
