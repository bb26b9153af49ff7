//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_PAGE_LIMIT_MAX: u32 = 1000;
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {var}='{value}': {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Tax rate applied to new orders that do not name one.
    pub sales_tax_rate: f64,
    /// Largest page any listing may return.
    pub page_limit_max: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            sales_tax_rate: 0.0,
            page_limit_max: DEFAULT_PAGE_LIMIT_MAX,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr.parse::<SocketAddr>().map_err(|e| ConfigError {
            var: "BIND_ADDR",
            value: bind_addr.clone(),
            reason: e.to_string(),
        })?;

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
        };

        let sales_tax_rate = match lookup("SALES_TAX_RATE") {
            None => 0.0,
            Some(raw) => {
                let rate = raw.trim().parse::<f64>().map_err(|e| ConfigError {
                    var: "SALES_TAX_RATE",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
                    return Err(ConfigError {
                        var: "SALES_TAX_RATE",
                        value: raw,
                        reason: "must be a fraction between 0 and 1".to_string(),
                    });
                }
                rate
            }
        };

        let page_limit_max = match lookup("PAGE_LIMIT_MAX") {
            None => DEFAULT_PAGE_LIMIT_MAX,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError {
                        var: "PAGE_LIMIT_MAX",
                        value: raw,
                        reason: "must be greater than 0".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError {
                        var: "PAGE_LIMIT_MAX",
                        value: raw.clone(),
                        reason: e.to_string(),
                    });
                }
            },
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            sales_tax_rate,
            page_limit_max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults() {
        assert_eq!(load(&[]).unwrap(), ApiConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let cfg = load(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("JWT_SECRET", "s3cret"),
            ("SALES_TAX_RATE", "0.0825"),
            ("PAGE_LIMIT_MAX", "50"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(cfg.jwt_secret, "s3cret");
        assert_eq!(cfg.sales_tax_rate, 0.0825);
        assert_eq!(cfg.page_limit_max, 50);
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(load(&[("SALES_TAX_RATE", "1.5")]).unwrap_err().var, "SALES_TAX_RATE");
        assert_eq!(load(&[("SALES_TAX_RATE", "abc")]).unwrap_err().var, "SALES_TAX_RATE");
        assert_eq!(load(&[("PAGE_LIMIT_MAX", "0")]).unwrap_err().var, "PAGE_LIMIT_MAX");
        assert_eq!(load(&[("PAGE_LIMIT_MAX", "-1")]).unwrap_err().var, "PAGE_LIMIT_MAX");
        assert_eq!(load(&[("BIND_ADDR", "nowhere")]).unwrap_err().var, "BIND_ADDR");
    }
}
