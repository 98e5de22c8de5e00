use crate::options::{Difficulty, GameMode};
use crate::util::{load_json, save_json, LoadError, SaveError};
use serde::{de::Deserializer, ser::Serializer, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::path::Path;

/// The best score achieved for each combination of game mode & difficulty
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct HighScores(BTreeMap<(GameMode, Difficulty), NonZeroU32>);

impl HighScores {
    pub(crate) fn save(&self, path: &Path) -> Result<(), SaveError> {
        save_json(path, self, "high scores")
    }

    /// Read high scores from a file.  If the file does not exist, an empty
    /// table is returned.
    pub(crate) fn load(path: &Path) -> Result<HighScores, LoadError> {
        Ok(load_json(path, "high scores")?.unwrap_or_default())
    }

    pub(crate) fn get(&self, mode: GameMode, difficulty: Difficulty) -> Option<NonZeroU32> {
        self.0.get(&(mode, difficulty)).copied()
    }

    /// Record a final score.  Returns `true` if it beats the previous best
    /// for `mode` & `difficulty`.
    pub(crate) fn record(&mut self, mode: GameMode, difficulty: Difficulty, score: u32) -> bool {
        let Some(score) = NonZeroU32::new(score) else {
            return false;
        };
        if self.get(mode, difficulty).is_some_and(|best| best >= score) {
            return false;
        }
        self.0.insert((mode, difficulty), score);
        true
    }

    fn to_json_array(&self) -> Vec<HighScoreEntry> {
        self.0
            .iter()
            .map(|(&(mode, difficulty), &score)| HighScoreEntry {
                mode,
                difficulty,
                score,
            })
            .collect()
    }

    fn from_json_array(array: Vec<HighScoreEntry>) -> HighScores {
        let mut scores = HighScores::default();
        for hse in array {
            // Keep the best entry if a hand-edited file lists a key twice
            let _ = scores.record(hse.mode, hse.difficulty, hse.score.get());
        }
        scores
    }
}

impl Serialize for HighScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HighScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<HighScoreEntry>::deserialize(deserializer).map(HighScores::from_json_array)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
struct HighScoreEntry {
    mode: GameMode,
    difficulty: Difficulty,
    score: NonZeroU32,
}
