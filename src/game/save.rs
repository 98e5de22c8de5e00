//! The single save slot
use super::board::Bounds;
use super::direction::Direction;
use super::hurdles::hurdles;
use super::story::STAGES;
use crate::consts;
use crate::options::{Difficulty, GameMode};
use crate::util::{write_file, LoadError, SaveError};
use ratatui::layout::{Position, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A snapshot of a game in progress, stored as a flat TOML table
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct SaveGame {
    pub(crate) mode: GameMode,
    pub(crate) difficulty: Difficulty,
    /// Whether the board has hurdles
    pub(crate) hurdles: bool,
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) score: u32,
    /// Food eaten over the whole game
    pub(crate) eaten: u32,
    /// Index into [`STAGES`]; always 0 in classic mode
    pub(crate) stage: usize,
    /// Food eaten in the current stage
    pub(crate) stage_eaten: u32,
    pub(crate) elapsed_ms: u64,
    /// The direction of the snake's last move
    pub(crate) direction: Direction,
    /// A turn requested but not yet made
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) queued: Option<Direction>,
    pub(crate) head: [u16; 2],
    /// Body cells, oldest first
    pub(crate) body: Vec<[u16; 2]>,
    pub(crate) max_len: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) food: Option<[u16; 2]>,
}

impl SaveGame {
    const WHAT: &'static str = "saved game";

    /// Read the save slot.  Returns `Ok(None)` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or parsed, or if it
    /// describes an impossible game.
    pub(crate) fn load(path: &Path) -> Result<Option<SaveGame>, LoadError> {
        let src = match fs_err::read_to_string(path) {
            Ok(src) => src,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LoadError::read(Self::WHAT, e)),
        };
        let save =
            toml::from_str::<SaveGame>(&src).map_err(|e| LoadError::deserialize(Self::WHAT, e))?;
        save.validate()
            .map_err(|reason| LoadError::invalid(Self::WHAT, reason))?;
        Ok(Some(save))
    }

    pub(crate) fn save(&self, path: &Path) -> Result<(), SaveError> {
        let src = toml::to_string(self).map_err(|e| SaveError::serialize(Self::WHAT, e))?;
        write_file(path, &src, Self::WHAT)
    }

    /// Empty the save slot.  An already-empty slot is not an error.
    pub(crate) fn remove(path: &Path) -> Result<(), SaveError> {
        match fs_err::remove_file(path) {
            Ok(()) => {
                log::debug!("Removed saved game at {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SaveError::remove(Self::WHAT, e)),
        }
    }

    pub(crate) fn grid(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn validate(&self) -> Result<(), String> {
        let grid = self.grid();
        if grid.width < consts::MIN_GRID.width
            || grid.height < consts::MIN_GRID.height
            || grid.width > consts::MAX_GRID.width
            || grid.height > consts::MAX_GRID.height
        {
            return Err(format!("board size {}x{} out of range", self.width, self.height));
        }
        let in_grid = |[x, y]: [u16; 2]| x < self.width && y < self.height;
        match self.mode {
            GameMode::Classic if self.stage != 0 || self.stage_eaten != 0 => {
                return Err(String::from("classic game has story progress"));
            }
            GameMode::Classic => (),
            GameMode::Story => {
                let Some(stage) = STAGES.get(self.stage) else {
                    return Err(format!("no such stage: {}", self.stage + 1));
                };
                if self.stage_eaten >= stage.food_target {
                    return Err(format!(
                        "stage {} already cleared ({} of {} eaten)",
                        self.stage + 1,
                        self.stage_eaten,
                        stage.food_target
                    ));
                }
                if self.hurdles != stage.hurdles {
                    return Err(format!("hurdles do not match stage {}", self.stage + 1));
                }
            }
        }
        if self.max_len < consts::INITIAL_SNAKE_LENGTH {
            return Err(format!("snake length {} too short", self.max_len));
        }
        if self.body.len() > self.max_len {
            return Err(format!(
                "snake body has {} cells but maximum length is {}",
                self.body.len(),
                self.max_len
            ));
        }
        if !in_grid(self.head) {
            return Err(format!("snake head {:?} is off the board", self.head));
        }
        if let Some(&cell) = self.body.iter().find(|&&p| !in_grid(p)) {
            return Err(format!("snake body cell {cell:?} is off the board"));
        }
        if self.body.contains(&self.head) {
            return Err(String::from("snake head overlaps its body"));
        }
        let bounds = Bounds::from((grid, self.mode.wraps()));
        let mut last_step = None;
        let mut cells = self.body.iter().chain(std::iter::once(&self.head));
        if let Some(&first) = cells.next() {
            let mut prev = first;
            for &cell in cells {
                let [px, py] = prev;
                let [cx, cy] = cell;
                let step =
                    Direction::between(Position::new(px, py), Position::new(cx, cy), bounds);
                let Some(d) = step else {
                    return Err(format!("snake is broken between {prev:?} and {cell:?}"));
                };
                last_step = Some(d);
                prev = cell;
            }
        }
        if let Some(d) = last_step.filter(|&d| d != self.direction) {
            return Err(format!(
                "snake is heading {:?} but last moved {d:?}",
                self.direction
            ));
        }
        if self
            .queued
            .is_some_and(|q| q.is_reverse_of(self.direction))
        {
            return Err(String::from("queued turn reverses the snake"));
        }
        let blocked = if self.hurdles {
            hurdles(grid)
        } else {
            HashSet::new()
        };
        let is_blocked = |[x, y]: [u16; 2]| blocked.contains(&Position::new(x, y));
        if is_blocked(self.head) || self.body.iter().any(|&p| is_blocked(p)) {
            return Err(String::from("snake overlaps a hurdle"));
        }
        if let Some(food) = self.food {
            if !in_grid(food) {
                return Err(format!("food {food:?} is off the board"));
            }
            if food == self.head || self.body.contains(&food) || is_blocked(food) {
                return Err(format!("food {food:?} is on an occupied cell"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> SaveGame {
        SaveGame {
            mode: GameMode::Story,
            difficulty: Difficulty::Hard,
            hurdles: true,
            width: 20,
            height: 12,
            score: 21,
            eaten: 7,
            stage: 1,
            stage_eaten: 2,
            elapsed_ms: 34_500,
            direction: Direction::East,
            queued: Some(Direction::South),
            head: [10, 3],
            body: vec![[7, 3], [8, 3], [9, 3]],
            max_len: 5,
            food: Some([12, 8]),
        }
    }

    #[test]
    fn toml_layout() {
        let src = toml::to_string(&sample()).unwrap();
        pretty_assertions::assert_eq!(
            src,
            concat!(
                "mode = \"story\"\n",
                "difficulty = \"hard\"\n",
                "hurdles = true\n",
                "width = 20\n",
                "height = 12\n",
                "score = 21\n",
                "eaten = 7\n",
                "stage = 1\n",
                "stage-eaten = 2\n",
                "elapsed-ms = 34500\n",
                "direction = \"east\"\n",
                "queued = \"south\"\n",
                "head = [10, 3]\n",
                "body = [[7, 3], [8, 3], [9, 3]]\n",
                "max-len = 5\n",
                "food = [12, 8]\n",
            )
        );
    }

    #[test]
    fn save_load_remove() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("data").join("savegame.toml");
        assert_eq!(SaveGame::load(&path).unwrap(), None);
        sample().save(&path).unwrap();
        assert_eq!(SaveGame::load(&path).unwrap(), Some(sample()));
        SaveGame::remove(&path).unwrap();
        assert!(!path.exists());
        SaveGame::remove(&path).unwrap();
    }

    #[test]
    fn missing_food_is_allowed() {
        let save = SaveGame {
            food: None,
            ..sample()
        };
        let src = toml::to_string(&save).unwrap();
        assert!(!src.contains("food"));
        assert_eq!(toml::from_str::<SaveGame>(&src).unwrap(), save);
        assert_eq!(save.validate(), Ok(()));
    }

    #[rstest]
    #[case::too_small(SaveGame { width: 8, ..sample() })]
    #[case::too_large(SaveGame { height: 40, ..sample() })]
    #[case::no_such_stage(SaveGame { stage: 5, ..sample() })]
    #[case::stage_cleared(SaveGame { stage_eaten: 8, ..sample() })]
    #[case::stage_hurdles(SaveGame { hurdles: false, ..sample() })]
    #[case::classic_stage(SaveGame { mode: GameMode::Classic, ..sample() })]
    #[case::head_off_board(SaveGame { head: [20, 3], ..sample() })]
    #[case::body_off_board(SaveGame { body: vec![[7, 12]], ..sample() })]
    #[case::body_too_long(SaveGame { max_len: 3, body: vec![[6, 3], [7, 3], [8, 3], [9, 3]], ..sample() })]
    #[case::head_on_body(SaveGame { head: [9, 3], ..sample() })]
    #[case::food_on_snake(SaveGame { food: Some([8, 3]), ..sample() })]
    #[case::food_off_board(SaveGame { food: Some([0, 12]), ..sample() })]
    #[case::body_scattered(SaveGame { body: vec![[2, 9], [8, 3], [9, 3]], ..sample() })]
    #[case::body_gap(SaveGame { body: vec![[6, 3], [7, 3], [8, 3]], ..sample() })]
    #[case::heading_into_neck(SaveGame { direction: Direction::West, queued: None, ..sample() })]
    #[case::heading_sideways(SaveGame { direction: Direction::North, queued: None, ..sample() })]
    #[case::queued_reverse(SaveGame { queued: Some(Direction::West), ..sample() })]
    fn invalid(#[case] save: SaveGame) {
        assert!(save.validate().is_err(), "{save:?} passed validation");
    }

    #[test]
    fn classic_body_wraps() {
        let save = SaveGame {
            mode: GameMode::Classic,
            hurdles: false,
            stage: 0,
            stage_eaten: 0,
            direction: Direction::West,
            queued: None,
            head: [19, 3],
            body: vec![[1, 3], [0, 3]],
            ..sample()
        };
        assert_eq!(save.validate(), Ok(()));
        let walled = SaveGame {
            mode: GameMode::Story,
            hurdles: false,
            ..save
        };
        assert!(walled.validate().is_err());
    }

    #[test]
    fn food_on_hurdle() {
        let mut save = sample();
        let hurdle = hurdles(save.grid()).into_iter().next().unwrap();
        save.food = Some([hurdle.x, hurdle.y]);
        assert!(save.validate().is_err());
    }

    #[test]
    fn load_invalid() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("savegame.toml");
        SaveGame {
            stage: 9,
            ..sample()
        }
        .save(&path)
        .unwrap();
        let e = SaveGame::load(&path).unwrap_err();
        assert_eq!(e.to_string(), "failed to load saved game from disk");
        let cause = std::error::Error::source(&e).unwrap().to_string();
        assert_eq!(cause, "no such stage: 10");
    }

    #[test]
    fn load_garbage() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("savegame.toml");
        fs_err::write(&path, "mode = \"arcade\"\n").unwrap();
        assert!(SaveGame::load(&path).is_err());
    }
}
