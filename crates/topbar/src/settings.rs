//! Engine settings (time adjustment, URL base, referrer allow-list).

use chrono::Duration;

use surveybar_core::{TopbarError, TopbarResult};

pub const ENV_TIME_ADJUST: &str = "SURVEYBAR_TIMEADJUST";
pub const ENV_BASE_URL: &str = "SURVEYBAR_BASE_URL";
pub const ENV_ALLOWED_REFERRERS: &str = "SURVEYBAR_ALLOWED_REFERRERS";

/// Settings shared by every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopbarSettings {
    /// Offset applied to the current time before comparing survey start and
    /// expiry dates.
    pub time_adjust: Duration,
    /// Absolute (`https://host/app`) or path (`/app`) prefix for generated URLs.
    pub base_url: String,
    /// Extra origins (`scheme://host[:port]`) whose referrers may be used as
    /// a return target.
    pub allowed_referrer_origins: Vec<String>,
}

impl Default for TopbarSettings {
    fn default() -> Self {
        Self {
            time_adjust: Duration::zero(),
            base_url: String::new(),
            allowed_referrer_origins: Vec::new(),
        }
    }
}

impl TopbarSettings {
    pub fn with_time_adjust(mut self, adjust: Duration) -> Self {
        self.time_adjust = adjust;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_allowed_referrer_origin(mut self, origin: impl Into<String>) -> Self {
        self.allowed_referrer_origins.push(origin.into());
        self
    }

    /// Read settings from the process environment; unset variables keep their
    /// defaults.
    pub fn from_env() -> TopbarResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> TopbarResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(ENV_TIME_ADJUST) {
            settings.time_adjust = parse_time_adjust(&raw)?;
        }
        if let Some(base) = lookup(ENV_BASE_URL) {
            settings.base_url = base.trim().to_string();
        }
        if let Some(list) = lookup(ENV_ALLOWED_REFERRERS) {
            settings.allowed_referrer_origins = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(settings)
    }
}

/// Parse a relative time offset such as `"+2 hours"`, `"-90 minutes"`,
/// `"30 sec"` or `"0"`.
pub fn parse_time_adjust(raw: &str) -> TopbarResult<Duration> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(Duration::zero());
    }

    let invalid = || TopbarError::invalid_setting(format!("{ENV_TIME_ADJUST}: cannot parse '{raw}'"));

    let (negative, rest) = match s.as_bytes()[0] {
        b'+' => (false, &s[1..]),
        b'-' => (true, &s[1..]),
        _ => (false, s),
    };
    let rest = rest.trim_start();
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return Err(invalid());
    }

    let amount: i64 = rest[..digits_end].parse().map_err(|_| invalid())?;
    let amount = if negative { -amount } else { amount };
    let unit = rest[digits_end..].trim().to_ascii_lowercase();

    let duration = match unit.as_str() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => Duration::try_seconds(amount),
        "min" | "mins" | "minute" | "minutes" => Duration::try_minutes(amount),
        "h" | "hour" | "hours" => Duration::try_hours(amount),
        "day" | "days" => Duration::try_days(amount),
        _ => None,
    };

    duration.ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_offsets() {
        assert_eq!(parse_time_adjust("0").unwrap(), Duration::zero());
        assert_eq!(parse_time_adjust("").unwrap(), Duration::zero());
        assert_eq!(parse_time_adjust("+2 hours").unwrap(), Duration::hours(2));
        assert_eq!(parse_time_adjust("-90 minutes").unwrap(), Duration::minutes(-90));
        assert_eq!(parse_time_adjust("30 sec").unwrap(), Duration::seconds(30));
        assert_eq!(parse_time_adjust("1 day").unwrap(), Duration::days(1));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_time_adjust("soon").is_err());
        assert!(parse_time_adjust("+ hours").is_err());
        assert!(parse_time_adjust("5 fortnights").is_err());
    }

    #[test]
    fn reads_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_TIME_ADJUST, "-1 hour"),
            (ENV_BASE_URL, " https://surveys.example.org/index.php "),
            (ENV_ALLOWED_REFERRERS, "https://a.example.org, ,https://b.example.org"),
        ]);

        let settings = TopbarSettings::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(settings.time_adjust, Duration::hours(-1));
        assert_eq!(settings.base_url, "https://surveys.example.org/index.php");
        assert_eq!(
            settings.allowed_referrer_origins,
            vec!["https://a.example.org".to_string(), "https://b.example.org".to_string()]
        );
    }

    #[test]
    fn missing_variables_keep_defaults() {
        let settings = TopbarSettings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, TopbarSettings::default());
    }

    #[test]
    fn invalid_variable_is_reported() {
        let err = TopbarSettings::from_lookup(|k| (k == ENV_TIME_ADJUST).then(|| "later".to_string()))
            .unwrap_err();
        assert!(matches!(err, TopbarError::InvalidSetting(_)));
    }
}
