//! Table configuration models.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::game::{
    constants::{DEFAULT_STACK, NUM_SEATS},
    entities::{Blinds, Chips, SeatIndex},
};

/// Table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Table name
    pub name: String,

    /// Blinds posted every hand
    pub blinds: Blinds,

    /// Stack every seat starts the first hand with
    pub starting_stack: Chips,

    /// Dealer seat for the first hand
    pub dealer_index: SeatIndex,

    /// Pause before each phase advance, for pacing a UI (0 disables)
    pub phase_delay_ms: u64,

    /// Seed for deterministic shuffles; `None` shuffles from the thread RNG
    pub deck_seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "Six Max".to_string(),
            blinds: Blinds::default(),
            starting_stack: DEFAULT_STACK,
            dealer_index: 0,
            phase_delay_ms: 0,
            deck_seed: None,
        }
    }
}

impl TableConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.blinds.small == 0 {
            return Err("Small blind must be greater than 0".to_string());
        }

        if self.blinds.small.checked_mul(2) != Some(self.blinds.big) {
            return Err("Big blind must be twice the small blind".to_string());
        }

        if self.starting_stack == 0 {
            return Err("Starting stack must be greater than 0".to_string());
        }

        if self.starting_stack > Chips::MAX / NUM_SEATS as Chips {
            return Err(format!(
                "Starting stack must be at most {}",
                Chips::MAX / NUM_SEATS as Chips
            ));
        }

        if self.dealer_index >= NUM_SEATS {
            return Err(format!("Dealer seat must be below {NUM_SEATS}"));
        }

        Ok(())
    }

    /// Starting stacks for all six seats
    pub fn starting_stacks(&self) -> Vec<Chips> {
        vec![self.starting_stack; NUM_SEATS]
    }

    pub fn phase_delay(&self) -> Duration {
        Duration::from_millis(self.phase_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TableConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.starting_stacks(), vec![1000; NUM_SEATS]);
        assert_eq!(config.phase_delay(), Duration::ZERO);
    }

    #[test]
    fn test_mismatched_blinds_rejected() {
        let config = TableConfig {
            blinds: Blinds { small: 20, big: 50 },
            ..TableConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_blind_and_bad_dealer_rejected() {
        let config = TableConfig {
            blinds: Blinds::from_small(0).unwrap(),
            ..TableConfig::default()
        };
        assert!(config.validate().is_err());

        let config = TableConfig {
            dealer_index: NUM_SEATS,
            ..TableConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_blinds_and_stacks_rejected() {
        let config = TableConfig {
            blinds: Blinds {
                small: 3_000_000_000,
                big: 1_705_032_704,
            },
            ..TableConfig::default()
        };
        assert!(config.validate().is_err());

        let config = TableConfig {
            starting_stack: 3_000_000_000,
            ..TableConfig::default()
        };
        assert!(config.validate().is_err());

        let config = TableConfig {
            starting_stack: Chips::MAX / NUM_SEATS as Chips,
            ..TableConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
