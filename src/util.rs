use crate::config::Config;
use crate::consts;
use crate::highscores::HighScores;
use crate::options::Options;
use crate::theme::Theme;
use enum_map::Enum;
use ratatui::layout::{Flex, Layout, Rect, Size};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use thiserror::Error;

/// State shared by every screen of the application
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Globals {
    pub(crate) config: Config,
    pub(crate) options: Options,
    pub(crate) high_scores: HighScores,
}

impl Globals {
    /// The theme selected in the current options, with any style overrides
    /// from the configuration file applied
    pub(crate) fn theme(&self) -> Theme {
        Theme::new(self.options.theme).with_overrides(&self.config.styles)
    }
}

#[cfg(test)]
impl Globals {
    /// Default globals whose data files all live in `dir`
    pub(crate) fn in_dir(dir: &Path) -> Globals {
        let mut globals = Globals::default();
        globals.config.files.data_dir = Some(dir.to_path_buf());
        globals
    }
}

/// Iteration & stepping over the variants of a fieldless enum
pub(crate) trait EnumExt: Enum + Copy {
    fn iter() -> impl Iterator<Item = Self> {
        (0..Self::LENGTH).map(Self::from_usize)
    }

    fn min() -> Self {
        Self::from_usize(0)
    }

    fn max() -> Self {
        Self::from_usize(Self::LENGTH - 1)
    }

    fn next(self) -> Option<Self> {
        let i = self.into_usize() + 1;
        (i < Self::LENGTH).then(|| Self::from_usize(i))
    }

    fn prev(self) -> Option<Self> {
        self.into_usize().checked_sub(1).map(Self::from_usize)
    }

    fn next_cyclic(self) -> Self {
        self.next().unwrap_or_else(Self::min)
    }

    fn prev_cyclic(self) -> Self {
        self.prev().unwrap_or_else(Self::max)
    }
}

impl<T: Enum + Copy> EnumExt for T {}

pub(crate) fn get_display_area(buffer_area: Rect) -> Rect {
    center_rect(buffer_area, consts::DISPLAY_SIZE)
}

/// Return a `Rect` of (at most) the given size centered within `area`
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [rect] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(rect);
    rect
}

/// Read & deserialize a JSON file.  Returns `Ok(None)` if the file does not
/// exist.
pub(crate) fn load_json<T: DeserializeOwned>(
    path: &Path,
    what: &'static str,
) -> Result<Option<T>, LoadError> {
    let src = match fs_err::read(path) {
        Ok(src) => src,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(LoadError::read(what, e)),
    };
    serde_json::from_slice(&src)
        .map(Some)
        .map_err(|e| LoadError::deserialize(what, e))
}

/// Serialize a value as JSON and write it to a file, creating any missing
/// parent directories
pub(crate) fn save_json<T: Serialize>(
    path: &Path,
    value: &T,
    what: &'static str,
) -> Result<(), SaveError> {
    let mut src = serde_json::to_string(value).map_err(|e| SaveError::serialize(what, e))?;
    src.push('\n');
    write_file(path, &src, what)
}

/// Write `src` to `path`, creating any missing parent directories
pub(crate) fn write_file(path: &Path, src: &str, what: &'static str) -> Result<(), SaveError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent).map_err(|e| SaveError::mkdir(what, e))?;
    }
    fs_err::write(path, src).map_err(|e| SaveError::write(what, e))?;
    log::debug!("Wrote {what} to {}", path.display());
    Ok(())
}

#[derive(Debug, Error)]
#[error("failed to save {what} to disk")]
pub(crate) struct SaveError {
    what: &'static str,
    #[source]
    source: SaveErrorSource,
}

impl SaveError {
    pub(crate) fn no_path(what: &'static str) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::NoPath,
        }
    }

    pub(crate) fn mkdir(what: &'static str, e: std::io::Error) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Mkdir(e),
        }
    }

    pub(crate) fn serialize<E>(what: &'static str, e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SaveError {
            what,
            source: SaveErrorSource::Serialize(Box::new(e)),
        }
    }

    pub(crate) fn write(what: &'static str, e: std::io::Error) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Write(e),
        }
    }

    pub(crate) fn remove(what: &'static str, e: std::io::Error) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Remove(e),
        }
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize data")]
    Serialize(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to write file")]
    Write(#[source] std::io::Error),
    #[error("failed to remove file")]
    Remove(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("failed to load {what} from disk")]
pub(crate) struct LoadError {
    what: &'static str,
    #[source]
    source: LoadErrorSource,
}

impl LoadError {
    pub(crate) fn no_path(what: &'static str) -> Self {
        LoadError {
            what,
            source: LoadErrorSource::NoPath,
        }
    }

    pub(crate) fn read(what: &'static str, e: std::io::Error) -> Self {
        LoadError {
            what,
            source: LoadErrorSource::Read(e),
        }
    }

    pub(crate) fn deserialize<E>(what: &'static str, e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        LoadError {
            what,
            source: LoadErrorSource::Deserialize(Box::new(e)),
        }
    }

    pub(crate) fn invalid(what: &'static str, reason: String) -> Self {
        LoadError {
            what,
            source: LoadErrorSource::Invalid(reason),
        }
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to read file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize file contents")]
    Deserialize(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("{0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Difficulty;
    use rstest::rstest;

    #[test]
    fn enum_stepping() {
        assert_eq!(<Difficulty as EnumExt>::min(), Difficulty::Easy);
        assert_eq!(<Difficulty as EnumExt>::max(), Difficulty::Hard);
        assert_eq!(Difficulty::Easy.next(), Some(Difficulty::Normal));
        assert_eq!(Difficulty::Hard.next(), None);
        assert_eq!(Difficulty::Easy.prev(), None);
        assert_eq!(Difficulty::Hard.next_cyclic(), Difficulty::Easy);
        assert_eq!(Difficulty::Easy.prev_cyclic(), Difficulty::Hard);
        assert_eq!(
            Difficulty::iter().collect::<Vec<_>>(),
            [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard]
        );
    }

    #[rstest]
    #[case(Rect::new(0, 0, 80, 24), Rect::new(0, 0, 80, 24))]
    #[case(Rect::new(0, 0, 100, 30), Rect::new(10, 3, 80, 24))]
    #[case(Rect::new(5, 5, 90, 34), Rect::new(10, 10, 80, 24))]
    fn test_get_display_area(#[case] buffer_area: Rect, #[case] display: Rect) {
        assert_eq!(get_display_area(buffer_area), display);
    }

    #[test]
    fn json_missing_file_is_none() {
        let tmpdir = tempfile::tempdir().unwrap();
        let r = load_json::<Vec<u32>>(&tmpdir.path().join("nope.json"), "numbers");
        assert!(matches!(r, Ok(None)));
    }

    #[test]
    fn json_save_creates_parents() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("a").join("b").join("numbers.json");
        save_json(&path, &vec![1u32, 2, 3], "numbers").unwrap();
        let back = load_json::<Vec<u32>>(&path, "numbers").unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));
    }

    #[test]
    fn json_garbage_is_error() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("numbers.json");
        fs_err::write(&path, "not json").unwrap();
        let e = load_json::<Vec<u32>>(&path, "numbers").unwrap_err();
        assert_eq!(e.to_string(), "failed to load numbers from disk");
    }
}
