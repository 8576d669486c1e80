// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::collections::BTreeMap;
use std::time::Duration;

/// A recognised parameter carried a value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigError {
    key: String,
    value: String,
}

impl ConfigError {
    #[inline]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid value '{}' for solver parameter '{}'",
            self.value, self.key
        )
    }
}

impl std::error::Error for ConfigError {}

/// Engine-wide knobs shared by the coordinator and the benchmark harness.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    seed: u64,
    bias: f64,
    max_iterations: u32,
    time_limit: Duration,
    workers: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            bias: 0.3,
            max_iterations: 1_000,
            time_limit: Duration::from_secs(30),
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl SolverConfig {
    /// Builds a configuration from a loose key/value map. Recognised keys
    /// are `seed`, `bias`, `max-iterations`, `time-limit-ms` and
    /// `workers`; anything else is ignored so callers can pass through a
    /// larger parameter bag untouched.
    pub fn from_params(params: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for (key, value) in params {
            match key.as_str() {
                "seed" => {
                    config.seed = value
                        .parse()
                        .map_err(|_| ConfigError::new(key.clone(), value.clone()))?;
                }
                "bias" => {
                    let bias: f64 = value
                        .parse()
                        .map_err(|_| ConfigError::new(key.clone(), value.clone()))?;
                    if !(0.0..=1.0).contains(&bias) {
                        return Err(ConfigError::new(key.clone(), value.clone()));
                    }
                    config.bias = bias;
                }
                "max-iterations" => {
                    config.max_iterations = value
                        .parse()
                        .map_err(|_| ConfigError::new(key.clone(), value.clone()))?;
                }
                "time-limit-ms" => {
                    let ms: u64 = value
                        .parse()
                        .map_err(|_| ConfigError::new(key.clone(), value.clone()))?;
                    config.time_limit = Duration::from_millis(ms);
                }
                "workers" => {
                    let workers: usize = value
                        .parse()
                        .map_err(|_| ConfigError::new(key.clone(), value.clone()))?;
                    if workers == 0 {
                        return Err(ConfigError::new(key.clone(), value.clone()));
                    }
                    config.workers = workers;
                }
                _ => {}
            }
        }
        Ok(config)
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    #[inline]
    pub fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias.clamp(0.0, 1.0);
        self
    }

    #[inline]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    #[inline]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_params_reads_known_keys() {
        let config = SolverConfig::from_params(&params(&[
            ("seed", "99"),
            ("bias", "0.5"),
            ("max-iterations", "250"),
            ("time-limit-ms", "1500"),
            ("workers", "2"),
        ]))
        .unwrap();
        assert_eq!(config.seed(), 99);
        assert_eq!(config.bias(), 0.5);
        assert_eq!(config.max_iterations(), 250);
        assert_eq!(config.time_limit(), Duration::from_millis(1500));
        assert_eq!(config.workers(), 2);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config =
            SolverConfig::from_params(&params(&[("seed", "7"), ("export-format", "csv")])).unwrap();
        assert_eq!(config.seed(), 7);
    }

    #[test]
    fn test_malformed_value_is_rejected() {
        let err = SolverConfig::from_params(&params(&[("seed", "not-a-number")])).unwrap_err();
        assert_eq!(err.key(), "seed");
        assert_eq!(err.value(), "not-a-number");
    }

    #[test]
    fn test_bias_out_of_range_is_rejected() {
        assert!(SolverConfig::from_params(&params(&[("bias", "1.5")])).is_err());
        assert!(SolverConfig::from_params(&params(&[("workers", "0")])).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit(), Duration::from_secs(30));
        assert!(config.workers() >= 1);
        assert!((0.0..=1.0).contains(&config.bias()));
    }
}
