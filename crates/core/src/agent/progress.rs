//! Turn-based progress for running agents

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Percentage at or above which a run is shown as finishing soon
pub const FINISHING_SOON_PERCENT: u8 = 90;

/// Completion percentage of `turn` out of `max_turns`.
///
/// Rounds half up and clamps at 100 when `turn` overshoots the ceiling.
pub fn percent(turn: i64, max_turns: i64) -> Result<u8> {
    if max_turns <= 0 {
        return Err(Error::invalid_input(format!(
            "maxTurns must be greater than zero, got {}",
            max_turns
        )));
    }
    if turn < 0 {
        return Err(Error::invalid_input(format!(
            "turn must not be negative, got {}",
            turn
        )));
    }

    // round(turn / max * 100) == floor((200 * turn + max) / (2 * max))
    let turn = i128::from(turn);
    let max_turns = i128::from(max_turns);
    let scaled = (200 * turn + max_turns) / (2 * max_turns);
    Ok(scaled.min(100) as u8)
}

/// Human label for a progress value
pub fn progress_label(turn: i64, max_turns: i64, percent: u8) -> String {
    let mut label = format!("Turn {}/{} · {}% complete", turn, max_turns, percent);
    if percent >= FINISHING_SOON_PERCENT {
        label.push_str(" · Finishing soon");
    }
    label
}

/// Computed progress for one agent run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub turn: i64,
    pub max_turns: i64,
    pub percent: u8,
}

impl Progress {
    pub fn compute(turn: i64, max_turns: i64) -> Result<Self> {
        let percent = percent(turn, max_turns)?;
        Ok(Self {
            turn,
            max_turns,
            percent,
        })
    }

    pub fn is_finishing_soon(&self) -> bool {
        self.percent >= FINISHING_SOON_PERCENT
    }

    pub fn label(&self) -> String {
        progress_label(self.turn, self.max_turns, self.percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_known_values() {
        assert_eq!(percent(45, 50).unwrap(), 90);
        assert_eq!(percent(12, 50).unwrap(), 24);
        assert_eq!(percent(0, 50).unwrap(), 0);
        assert_eq!(percent(50, 50).unwrap(), 100);
    }

    #[test]
    fn test_percent_rounds_half_up() {
        // 1/8 = 12.5%
        assert_eq!(percent(1, 8).unwrap(), 13);
        // 1/3 = 33.33%
        assert_eq!(percent(1, 3).unwrap(), 33);
        // 2/3 = 66.67%
        assert_eq!(percent(2, 3).unwrap(), 67);
    }

    #[test]
    fn test_percent_clamps_overshoot() {
        assert_eq!(percent(75, 50).unwrap(), 100);
        assert_eq!(percent(i64::MAX, 1).unwrap(), 100);
    }

    #[test]
    fn test_percent_rejects_non_positive_max() {
        assert!(matches!(percent(1, 0), Err(Error::InvalidInput(_))));
        assert!(matches!(percent(1, -5), Err(Error::InvalidInput(_))));
        assert!(matches!(percent(-1, 10), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_percent_bounded_and_monotonic() {
        for max_turns in 1..=120 {
            let mut previous = 0;
            for turn in 0..=max_turns {
                let value = percent(turn, max_turns).unwrap();
                assert!(value <= 100);
                assert!(value >= previous, "turn {turn}/{max_turns} went backwards");
                previous = value;
            }
        }
    }

    #[test]
    fn test_label_finishing_soon() {
        let progress = Progress::compute(45, 50).unwrap();
        assert!(progress.is_finishing_soon());
        assert_eq!(progress.label(), "Turn 45/50 · 90% complete · Finishing soon");
    }

    #[test]
    fn test_label_in_progress() {
        let progress = Progress::compute(12, 50).unwrap();
        assert!(!progress.is_finishing_soon());
        assert_eq!(progress.label(), "Turn 12/50 · 24% complete");
        assert!(!progress.label().contains("Finishing soon"));
    }
}
