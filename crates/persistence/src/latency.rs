//! Simulated network latency for gateway operations.

use rand::Rng;
use std::time::Duration;

/// Gateway operation, used for latency lookup and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Latency configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyConfig {
    pub enabled: bool,
    pub list_ms: u64,
    pub get_ms: u64,
    pub create_ms: u64,
    pub update_ms: u64,
    pub delete_ms: u64,
    /// Upper bound of uniform random jitter added to every delay.
    pub jitter_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            list_ms: 800,
            get_ms: 500,
            create_ms: 1000,
            update_ms: 800,
            delete_ms: 600,
            jitter_ms: 0,
        }
    }
}

impl LatencyConfig {
    /// No simulated delay at all.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Base delay for an operation, without jitter.
    pub fn base(&self, operation: Operation) -> Duration {
        if !self.enabled {
            return Duration::ZERO;
        }
        let ms = match operation {
            Operation::List => self.list_ms,
            Operation::Get => self.get_ms,
            Operation::Create => self.create_ms,
            Operation::Update => self.update_ms,
            Operation::Delete => self.delete_ms,
        };
        Duration::from_millis(ms)
    }

    /// Delay for one call of `operation`, jitter included.
    pub fn delay_for(&self, operation: Operation) -> Duration {
        let base = self.base(operation);
        if !self.enabled || self.jitter_ms == 0 {
            return base;
        }
        let jitter = rand::thread_rng().gen_range(0..=self.jitter_ms);
        base + Duration::from_millis(jitter)
    }

    /// Sleeps for the configured delay of `operation`.
    pub async fn simulate(&self, operation: Operation) {
        let delay = self.delay_for(operation);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delays() {
        let config = LatencyConfig::default();
        assert_eq!(config.base(Operation::List), Duration::from_millis(800));
        assert_eq!(config.base(Operation::Get), Duration::from_millis(500));
        assert_eq!(config.base(Operation::Create), Duration::from_millis(1000));
        assert_eq!(config.base(Operation::Delete), Duration::from_millis(600));
    }

    #[test]
    fn test_disabled_has_no_delay() {
        let config = LatencyConfig::disabled();
        assert_eq!(config.delay_for(Operation::Create), Duration::ZERO);
    }

    #[test]
    fn test_jitter_stays_in_bounds() {
        let config = LatencyConfig {
            jitter_ms: 50,
            ..Default::default()
        };
        for _ in 0..100 {
            let delay = config.delay_for(Operation::Update);
            assert!(delay >= Duration::from_millis(800));
            assert!(delay <= Duration::from_millis(850));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulate_sleeps_on_paused_clock() {
        let config = LatencyConfig::default();
        let start = tokio::time::Instant::now();
        config.simulate(Operation::Get).await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
