use std::time::Duration;

/// Budget and horizon for the minimax player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Full rounds (one move per player) searched ahead before the last deal.
    pub depth_rounds: usize,
    pub time_cap_ms: u64,
    /// Node limit that replaces the clock when set; keeps runs reproducible.
    pub step_cap: Option<usize>,
    /// Stop expanding a node one move above the horizon once no remaining
    /// move can beat the best immediate gain found so far.
    pub horizon_cutoff: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth_rounds: 2,
            time_cap_ms: 2_000,
            step_cap: None,
            horizon_cutoff: true,
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub fn time_cap(&self) -> Duration {
        Duration::from_millis(self.time_cap_ms)
    }

    pub fn with_depth(mut self, rounds: usize) -> Self {
        self.depth_rounds = rounds.max(1);
        self
    }

    pub fn with_time_cap_ms(mut self, millis: u64) -> Self {
        self.time_cap_ms = millis;
        self
    }

    pub fn with_step_cap(mut self, steps: Option<usize>) -> Self {
        self.step_cap = steps;
        self
    }

    pub fn with_horizon_cutoff(mut self, enabled: bool) -> Self {
        self.horizon_cutoff = enabled;
        self
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let depth_rounds = read("TABLIC_SEARCH_DEPTH")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|depth| *depth > 0)
            .unwrap_or(defaults.depth_rounds);
        let time_cap_ms = read("TABLIC_SEARCH_TIME_MS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(defaults.time_cap_ms);
        let step_cap = read("TABLIC_SEARCH_STEPS").and_then(|raw| raw.trim().parse::<usize>().ok());
        Self {
            depth_rounds,
            time_cap_ms,
            step_cap,
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SearchConfig;
    use std::collections::HashMap;

    fn reader(pairs: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_variables_keep_defaults() {
        let config = SearchConfig::from_reader(reader(&[]));
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = SearchConfig::from_reader(reader(&[
            ("TABLIC_SEARCH_DEPTH", "3"),
            ("TABLIC_SEARCH_TIME_MS", " 150 "),
            ("TABLIC_SEARCH_STEPS", "5000"),
        ]));
        assert_eq!(config.depth_rounds, 3);
        assert_eq!(config.time_cap_ms, 150);
        assert_eq!(config.step_cap, Some(5000));
    }

    #[test]
    fn nonsense_values_are_ignored() {
        let config = SearchConfig::from_reader(reader(&[
            ("TABLIC_SEARCH_DEPTH", "0"),
            ("TABLIC_SEARCH_TIME_MS", "soon"),
        ]));
        assert_eq!(config.depth_rounds, 2);
        assert_eq!(config.time_cap_ms, 2_000);
    }
}
