//! Server settings read from `CLUELESS_*` environment variables.

use std::time::Duration;

const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_HANDSHAKE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `CLUELESS_BIND`
    pub bind: String,
    /// `CLUELESS_SKIP_TURN_ON_DISCONNECT`
    pub skip_turn_on_disconnect: bool,
    /// `CLUELESS_HANDSHAKE_TIMEOUT_SECS`
    pub handshake_timeout: Duration,
    /// `CLUELESS_IDLE_TIMEOUT_SECS`; unset means never.
    pub idle_timeout: Option<Duration>,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds settings from any variable source. Unset and empty
    /// variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind = get("CLUELESS_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());

        let skip_turn_on_disconnect = match get("CLUELESS_SKIP_TURN_ON_DISCONNECT") {
            Some(value) => parse_flag("CLUELESS_SKIP_TURN_ON_DISCONNECT", value)?,
            None => false,
        };

        let handshake_timeout = match get("CLUELESS_HANDSHAKE_TIMEOUT_SECS") {
            Some(value) => parse_secs("CLUELESS_HANDSHAKE_TIMEOUT_SECS", value)?,
            None => Duration::from_secs(DEFAULT_HANDSHAKE_TIMEOUT_SECS),
        };

        let idle_timeout = get("CLUELESS_IDLE_TIMEOUT_SECS")
            .map(|value| parse_secs("CLUELESS_IDLE_TIMEOUT_SECS", value))
            .transpose()?;

        Ok(Self {
            bind,
            skip_turn_on_disconnect,
            handshake_timeout,
            idle_timeout,
        })
    }
}

fn parse_flag(var: &'static str, value: String) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SettingsError::Invalid {
            var,
            expected: "true or false",
            value,
        }),
    }
}

fn parse_secs(var: &'static str, value: String) -> Result<Duration, SettingsError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(SettingsError::Invalid {
            var,
            expected: "a positive number of seconds",
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, SettingsError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings.bind, "0.0.0.0:8000");
        assert!(!settings.skip_turn_on_disconnect);
        assert_eq!(settings.handshake_timeout, Duration::from_secs(5));
        assert_eq!(settings.idle_timeout, None);
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            ("CLUELESS_BIND", "127.0.0.1:9000"),
            ("CLUELESS_SKIP_TURN_ON_DISCONNECT", "yes"),
            ("CLUELESS_HANDSHAKE_TIMEOUT_SECS", "10"),
            ("CLUELESS_IDLE_TIMEOUT_SECS", "600"),
        ])
        .unwrap();
        assert_eq!(settings.bind, "127.0.0.1:9000");
        assert!(settings.skip_turn_on_disconnect);
        assert_eq!(settings.handshake_timeout, Duration::from_secs(10));
        assert_eq!(settings.idle_timeout, Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_empty_values_take_defaults() {
        let settings = settings(&[("CLUELESS_BIND", ""), ("CLUELESS_IDLE_TIMEOUT_SECS", " ")]).unwrap();
        assert_eq!(settings.bind, "0.0.0.0:8000");
        assert_eq!(settings.idle_timeout, None);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = settings(&[("CLUELESS_SKIP_TURN_ON_DISCONNECT", "maybe")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "CLUELESS_SKIP_TURN_ON_DISCONNECT must be true or false, got 'maybe'"
        );
        assert!(settings(&[("CLUELESS_HANDSHAKE_TIMEOUT_SECS", "0")]).is_err());
        assert!(settings(&[("CLUELESS_IDLE_TIMEOUT_SECS", "soon")]).is_err());
    }
}
