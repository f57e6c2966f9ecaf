use crate::error::{Error, Result};
use crate::word::WordList;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Trimmed, non-empty lines of `text` in order.
pub fn parse_word_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Loads a line-delimited word list. Duplicates are kept.
pub fn load_word_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let words = parse_word_lines(&text);
    debug!("loaded {} words from {}", words.len(), path.display());
    Ok(words)
}

/// `.json` files hold `{"words": [{"id", "word"}]}` records; anything else
/// is line-delimited.
pub fn is_record_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Words of either format, in order.
pub fn load_any(path: &Path) -> Result<Vec<String>> {
    Ok(WordList::load_source(path)?.iter().map(str::to_string).collect())
}

impl WordList {
    /// Loads a level source. Record files keep their own ids; text files are
    /// numbered by position.
    pub fn load_source(path: &Path) -> Result<Self> {
        if is_record_file(path) {
            Self::load_json(path)
        } else {
            Ok(Self::from_words(load_word_lines(path)?))
        }
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes pretty-printed JSON, creating parent directories as needed.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| Error::io(path, e))?;
        debug!("wrote {} entries to {}", self.len(), path.display());
        Ok(())
    }
}
