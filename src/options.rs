/// Configures per-attempt timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Maximum number of retries after the initial attempt.
    pub retry_count: u32,
    /// Linear backoff unit: retry `k` waits `k * retry_delay_unit_ms`.
    pub retry_delay_unit_ms: u64,
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            retry_count: 3,
            retry_delay_unit_ms: 500,
            timeout_ms: 30_000,
        }
    }
}

impl ClientOptions {
    /// Reads overrides from the environment, falling back to defaults.
    ///
    /// Reads (all optional):
    /// - `WASTE2MEALS_RETRY_COUNT`
    /// - `WASTE2MEALS_RETRY_DELAY_MS`
    /// - `WASTE2MEALS_TIMEOUT_MS`
    ///
    /// Returns an error if a variable is set but is not a non-negative integer.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        Ok(Self {
            retry_count: env_number("WASTE2MEALS_RETRY_COUNT", defaults.retry_count)?,
            retry_delay_unit_ms: env_number(
                "WASTE2MEALS_RETRY_DELAY_MS",
                defaults.retry_delay_unit_ms,
            )?,
            timeout_ms: env_number("WASTE2MEALS_TIMEOUT_MS", defaults.timeout_ms)?,
        })
    }
}

fn env_number<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match std::env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(default),
        Ok(raw) => parse_number(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, String> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| format!("{name} must be a non-negative integer, got '{raw}'"))
}
