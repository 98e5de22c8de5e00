use crate::consts;
use crate::util::{load_json, save_json, EnumExt, LoadError, SaveError};
use enum_dispatch::enum_dispatch;
use enum_map::Enum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Gameplay options chosen in the main menu
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Options {
    pub(crate) mode: GameMode,
    pub(crate) difficulty: Difficulty,
    /// Lay out hurdles on the board in classic mode.  Story mode decides this
    /// per stage.
    pub(crate) hurdles: bool,
    pub(crate) theme: ThemeName,
}

impl Options {
    pub(crate) fn get(&self, key: OptKey) -> OptValue {
        match key {
            OptKey::Mode => self.mode.into(),
            OptKey::Difficulty => self.difficulty.into(),
            OptKey::Hurdles => self.hurdles.into(),
            OptKey::Theme => self.theme.into(),
        }
    }

    pub(crate) fn set(&mut self, key: OptKey, value: OptValue) {
        match (key, value) {
            (OptKey::Mode, OptValue::GameMode(mode)) => self.mode = mode,
            (OptKey::Difficulty, OptValue::Difficulty(d)) => self.difficulty = d,
            (OptKey::Hurdles, OptValue::Bool(b)) => self.hurdles = b,
            (OptKey::Theme, OptValue::ThemeName(t)) => self.theme = t,
            (key, value) => {
                unreachable!("Options::set({key:?}, {value:?}) called with mismatched value")
            }
        }
    }

    /// Read options from a JSON file.  Returns `Ok(None)` if the file does
    /// not exist.
    pub(crate) fn load(path: &Path) -> Result<Option<Options>, LoadError> {
        load_json(path, "options")
    }

    pub(crate) fn save(&self, path: &Path) -> Result<(), SaveError> {
        save_json(path, self, "options")
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum OptKey {
    Mode,
    Difficulty,
    Hurdles,
    Theme,
}

impl OptKey {
    pub(crate) const DISPLAY_WIDTH: u16 = 10;

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            OptKey::Mode => "Mode",
            OptKey::Difficulty => "Difficulty",
            OptKey::Hurdles => "Hurdles",
            OptKey::Theme => "Theme",
        }
    }
}

impl fmt::Display for OptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[enum_dispatch]
pub(crate) trait Adjustable {
    fn increase(&mut self);
    fn decrease(&mut self);
    /// Step to the next value, wrapping around after the last one
    fn cycle(&mut self);
    fn can_increase(&self) -> bool;
    fn can_decrease(&self) -> bool;
}

#[enum_dispatch(Adjustable)] // This also gives us From and TryInto
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OptValue {
    Bool(bool),
    GameMode,
    Difficulty,
    ThemeName,
}

impl OptValue {
    pub(crate) const DISPLAY_WIDTH: u16 = 11;
}

// This is needed for EnumMap to be convenient to construct.
impl Default for OptValue {
    fn default() -> OptValue {
        OptValue::Bool(false)
    }
}

impl fmt::Display for OptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            OptValue::Bool(false) => write!(f, "    [ ]    "),
            OptValue::Bool(true) => write!(f, "    [✓]    "),
            OptValue::GameMode(mode) => write_stepper(f, mode, &mode),
            OptValue::Difficulty(d) => write_stepper(f, d, &d),
            OptValue::ThemeName(t) => write_stepper(f, t, &t),
        }
    }
}

fn write_stepper<A: Adjustable, D: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    value: A,
    label: &D,
) -> fmt::Result {
    write!(
        f,
        "{left} {label:^7} {right}",
        left = if value.can_decrease() { '◀' } else { '◁' },
        right = if value.can_increase() { '▶' } else { '▷' }
    )
}

impl Adjustable for bool {
    fn increase(&mut self) {
        *self = true;
    }

    fn decrease(&mut self) {
        *self = false;
    }

    fn cycle(&mut self) {
        *self = !*self;
    }

    fn can_increase(&self) -> bool {
        !*self
    }

    fn can_decrease(&self) -> bool {
        *self
    }
}

macro_rules! enum_adjustable {
    ($t:ty) => {
        impl Adjustable for $t {
            fn increase(&mut self) {
                if let Some(v) = self.next() {
                    *self = v;
                }
            }

            fn decrease(&mut self) {
                if let Some(v) = self.prev() {
                    *self = v;
                }
            }

            fn cycle(&mut self) {
                *self = self.next_cyclic();
            }

            fn can_increase(&self) -> bool {
                self.next().is_some()
            }

            fn can_decrease(&self) -> bool {
                self.prev().is_some()
            }
        }
    };
}

/// How a game is played
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Enum, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum GameMode {
    /// Endless play on a board whose edges wrap around
    #[default]
    Classic,
    /// A fixed sequence of stages on a walled board
    Story,
}

impl GameMode {
    pub(crate) fn wraps(self) -> bool {
        self == GameMode::Classic
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            GameMode::Classic => "Classic",
            GameMode::Story => "Story",
        })
    }
}

enum_adjustable!(GameMode);

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Enum, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Time between movements of the snake before any speed-ups
    pub(crate) fn base_tick_period(self) -> Duration {
        Duration::from_millis(self.base_tick_millis())
    }

    fn base_tick_millis(self) -> u64 {
        match self {
            Difficulty::Easy => 200,
            Difficulty::Normal => 140,
            Difficulty::Hard => 90,
        }
    }

    /// Points awarded per piece of food eaten
    pub(crate) fn points(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 2,
            Difficulty::Hard => 3,
        }
    }

    /// The tick period for a classic game in which `eaten` pieces of food
    /// have been eaten so far
    pub(crate) fn classic_tick_period(self, eaten: u32) -> Duration {
        let mut millis = self.base_tick_millis();
        for _ in 0..(eaten / consts::SPEEDUP_EVERY) {
            millis = millis * consts::SPEEDUP_PERCENT / 100;
            if millis <= consts::MIN_TICK_MILLIS {
                return consts::MIN_TICK_PERIOD;
            }
        }
        Duration::from_millis(millis)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        })
    }
}

enum_adjustable!(Difficulty);

/// Names of the available color themes.  Cf. [`crate::theme::Theme`].
#[derive(Clone, Copy, Debug, Default, Deserialize, Enum, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ThemeName {
    #[default]
    Classic,
    Forest,
    Mono,
    Neon,
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            ThemeName::Classic => "Classic",
            ThemeName::Forest => "Forest",
            ThemeName::Mono => "Mono",
            ThemeName::Neon => "Neon",
        })
    }
}

enum_adjustable!(ThemeName);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    mod opt_key {
        use super::*;

        #[test]
        fn display_width() {
            let actual_width = OptKey::iter()
                .map(|key| key.as_str().chars().count())
                .max()
                .unwrap();
            assert_eq!(actual_width, usize::from(OptKey::DISPLAY_WIDTH));
        }
    }

    mod opt_value {
        use super::*;

        #[test]
        fn display_width() {
            let values = [OptValue::Bool(false), OptValue::Bool(true)]
                .into_iter()
                .chain(GameMode::iter().map(OptValue::from))
                .chain(Difficulty::iter().map(OptValue::from))
                .chain(ThemeName::iter().map(OptValue::from));
            for value in values {
                assert_eq!(
                    value.to_string().chars().count(),
                    usize::from(OptValue::DISPLAY_WIDTH),
                    "{value:?} rendered as {value}"
                );
            }
        }

        #[test]
        fn stepper_arrows() {
            assert_eq!(
                OptValue::Difficulty(Difficulty::Easy).to_string(),
                "◁  Easy   ▶"
            );
            assert_eq!(
                OptValue::Difficulty(Difficulty::Normal).to_string(),
                "◀ Normal  ▶"
            );
            assert_eq!(
                OptValue::Difficulty(Difficulty::Hard).to_string(),
                "◀  Hard   ▷"
            );
        }
    }

    #[test]
    fn cycle_wraps() {
        let mut d = Difficulty::Hard;
        d.cycle();
        assert_eq!(d, Difficulty::Easy);
        let mut mode = GameMode::Story;
        mode.cycle();
        assert_eq!(mode, GameMode::Classic);
        let mut b = true;
        b.cycle();
        assert!(!b);
    }

    #[test]
    fn increase_stops_at_end() {
        let mut t = ThemeName::Neon;
        t.increase();
        assert_eq!(t, ThemeName::Neon);
        t.decrease();
        assert_eq!(t, ThemeName::Mono);
    }

    #[test]
    fn get_set_roundtrip() {
        let mut opts = Options::default();
        for key in OptKey::iter() {
            let mut value = opts.get(key);
            value.cycle();
            opts.set(key, value);
        }
        assert_eq!(
            opts,
            Options {
                mode: GameMode::Story,
                difficulty: Difficulty::Hard,
                hurdles: true,
                theme: ThemeName::Forest,
            }
        );
    }

    #[rstest]
    #[case(Difficulty::Normal, 0, 140)]
    #[case(Difficulty::Normal, 4, 140)]
    #[case(Difficulty::Normal, 5, 126)]
    #[case(Difficulty::Normal, 10, 113)]
    #[case(Difficulty::Hard, 25, 51)]
    #[case(Difficulty::Hard, 30, 50)]
    #[case(Difficulty::Easy, 1000, 50)]
    fn test_classic_tick_period(#[case] d: Difficulty, #[case] eaten: u32, #[case] millis: u64) {
        assert_eq!(d.classic_tick_period(eaten), Duration::from_millis(millis));
    }

    #[test]
    fn deserialize_partial() {
        let opts: Options = serde_json::from_str(r#"{"mode": "story"}"#).unwrap();
        assert_eq!(
            opts,
            Options {
                mode: GameMode::Story,
                ..Options::default()
            }
        );
    }
}
