//! Autoplay configuration.
//!
//! Consolidates all environment variable reads into a validated config.

use freecell_core::{random_game_number, GameNumber};

/// Default cap on player moves per run
pub const DEFAULT_MAX_MOVES: usize = 500;

/// Autoplay configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoplayConfig {
    /// Game to deal
    pub game: GameNumber,
    /// Stop after this many player moves
    pub max_moves: usize,
    /// Print the final table as JSON
    pub dump_state: bool,
}

impl AutoplayConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let game = match lookup("FREECELL_GAME") {
            Some(raw) => raw.parse::<GameNumber>().map_err(|e| ConfigError::Invalid {
                var: "FREECELL_GAME".to_string(),
                reason: e.to_string(),
            })?,
            None => random_game_number(&mut rand::thread_rng()),
        };

        let max_moves = match lookup("FREECELL_MAX_MOVES") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "FREECELL_MAX_MOVES".to_string(),
                reason: format!("'{}' is not a move count", raw),
            })?,
            None => DEFAULT_MAX_MOVES,
        };

        let dump_state = lookup("FREECELL_DUMP_STATE")
            .map(|v| !matches!(v.to_lowercase().as_str(), "" | "0" | "false" | "no"))
            .unwrap_or(false);

        let config = AutoplayConfig {
            game,
            max_moves,
            dump_state,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_moves == 0 {
            return Err(ConfigError::Invalid {
                var: "FREECELL_MAX_MOVES".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AutoplayConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.max_moves, DEFAULT_MAX_MOVES);
        assert!(!config.dump_state);
    }

    #[test]
    fn test_explicit_values() {
        let config = AutoplayConfig::from_lookup(lookup_from(&[
            ("FREECELL_GAME", " 617 "),
            ("FREECELL_MAX_MOVES", "40"),
            ("FREECELL_DUMP_STATE", "1"),
        ]))
        .unwrap();
        assert_eq!(config.game.get(), 617);
        assert_eq!(config.max_moves, 40);
        assert!(config.dump_state);
    }

    #[test]
    fn test_dump_state_off_values() {
        for off in ["0", "false", "NO", ""] {
            let config =
                AutoplayConfig::from_lookup(lookup_from(&[("FREECELL_DUMP_STATE", off)])).unwrap();
            assert!(!config.dump_state, "{:?}", off);
        }
    }

    #[test]
    fn test_invalid_values() {
        for (var, value) in [
            ("FREECELL_GAME", "0"),
            ("FREECELL_GAME", "ten"),
            ("FREECELL_GAME", "10000000"),
            ("FREECELL_MAX_MOVES", "-3"),
            ("FREECELL_MAX_MOVES", "0"),
        ] {
            let err = AutoplayConfig::from_lookup(lookup_from(&[(var, value)])).unwrap_err();
            assert!(err.to_string().contains(var), "{}", err);
        }
    }
}
