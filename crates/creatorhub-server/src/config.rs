use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Run the incoming message simulator.
    pub realtime: bool,
    pub sim_interval: Duration,
    pub typing_duration: Duration,
    pub delivery_delay: Duration,
    pub delivery_failure_rate: f64,
    pub seed: u64,
    pub gemini_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = get("CREATORHUB_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&get, "CREATORHUB_PORT", 3000)?;
        let realtime = match get("CREATORHUB_REALTIME") {
            Some(v) => parse_flag(&v).with_context(|| format!("CREATORHUB_REALTIME={}", v))?,
            None => true,
        };
        let sim_secs: u64 = parse_or(&get, "CREATORHUB_SIM_INTERVAL_SECS", 8)?;
        let typing_secs: u64 = parse_or(&get, "CREATORHUB_TYPING_SECS", 3)?;
        let delay_ms: u64 = parse_or(&get, "CREATORHUB_DELIVERY_DELAY_MS", 1000)?;
        let failure_rate: f64 = parse_or(&get, "CREATORHUB_DELIVERY_FAILURE_RATE", 0.2)?;
        let seed: u64 = parse_or(&get, "CREATORHUB_SEED", 2025)?;
        let gemini_api_key = get("GEMINI_API_KEY").filter(|k| !k.trim().is_empty());

        if sim_secs == 0 {
            anyhow::bail!("CREATORHUB_SIM_INTERVAL_SECS must be at least 1");
        }
        if typing_secs >= sim_secs {
            anyhow::bail!(
                "CREATORHUB_TYPING_SECS ({}) must be shorter than CREATORHUB_SIM_INTERVAL_SECS ({})",
                typing_secs,
                sim_secs
            );
        }

        Ok(Self {
            host,
            port,
            realtime,
            sim_interval: Duration::from_secs(sim_secs),
            typing_duration: Duration::from_secs(typing_secs),
            delivery_delay: Duration::from_millis(delay_ms),
            delivery_failure_rate: failure_rate,
            seed,
            gemini_api_key,
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(v) => v.trim().parse().with_context(|| format!("{}={}", key, v)),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.realtime);
        assert_eq!(config.sim_interval, Duration::from_secs(8));
        assert_eq!(config.typing_duration, Duration::from_secs(3));
        assert_eq!(config.delivery_delay, Duration::from_millis(1000));
        assert_eq!(config.delivery_failure_rate, 0.2);
        assert_eq!(config.seed, 2025);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.addr().unwrap().port(), 3000);
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("CREATORHUB_PORT", "8080"),
            ("CREATORHUB_REALTIME", "off"),
            ("CREATORHUB_SEED", "7"),
            ("GEMINI_API_KEY", "abc"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(!config.realtime);
        assert_eq!(config.seed, 7);
        assert_eq!(config.gemini_api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn blank_api_key_is_unset() {
        let config = load(&[("GEMINI_API_KEY", "  ")]).unwrap();
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(load(&[("CREATORHUB_PORT", "http")]).is_err());
        assert!(load(&[("CREATORHUB_REALTIME", "maybe")]).is_err());
        assert!(load(&[("CREATORHUB_SIM_INTERVAL_SECS", "0")]).is_err());
    }

    #[test]
    fn typing_must_end_before_next_tick() {
        assert!(load(&[("CREATORHUB_TYPING_SECS", "8")]).is_err());
        assert!(load(&[("CREATORHUB_SIM_INTERVAL_SECS", "2"), ("CREATORHUB_TYPING_SECS", "5")]).is_err());
        assert!(load(&[("CREATORHUB_SIM_INTERVAL_SECS", "2"), ("CREATORHUB_TYPING_SECS", "1")]).is_ok());
    }
}
