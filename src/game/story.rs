//! Story-mode stages
use crate::consts;
use crate::options::Difficulty;
use std::time::Duration;

/// A single stage of a story-mode game
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Stage {
    /// How much food must be eaten to clear the stage
    pub(crate) food_target: u32,
    /// The stage's tick period as a percentage of the difficulty's base
    /// period
    pub(crate) speed_percent: u32,
    /// Whether the board has hurdles
    pub(crate) hurdles: bool,
}

impl Stage {
    pub(crate) fn tick_period(self, difficulty: Difficulty) -> Duration {
        (difficulty.base_tick_period() * self.speed_percent / 100).max(consts::MIN_TICK_PERIOD)
    }
}

/// The stages of story mode, in order
pub(crate) static STAGES: [Stage; 5] = [
    Stage {
        food_target: 5,
        speed_percent: 100,
        hurdles: false,
    },
    Stage {
        food_target: 8,
        speed_percent: 100,
        hurdles: true,
    },
    Stage {
        food_target: 10,
        speed_percent: 90,
        hurdles: true,
    },
    Stage {
        food_target: 12,
        speed_percent: 80,
        hurdles: true,
    },
    Stage {
        food_target: 15,
        speed_percent: 70,
        hurdles: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Difficulty::Normal, 140)]
    #[case(2, Difficulty::Easy, 180)]
    #[case(4, Difficulty::Normal, 98)]
    #[case(4, Difficulty::Hard, 63)]
    fn test_tick_period(#[case] stage: usize, #[case] d: Difficulty, #[case] millis: u64) {
        assert_eq!(STAGES[stage].tick_period(d), Duration::from_millis(millis));
    }

    #[test]
    fn stages_get_harder() {
        for pair in STAGES.windows(2) {
            assert!(pair[0].food_target <= pair[1].food_target);
            assert!(pair[0].speed_percent >= pair[1].speed_percent);
        }
    }
}
