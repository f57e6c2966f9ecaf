use serde::{Deserialize, Serialize};

/// One word of a level, numbered by its position in the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub id: u32,
    pub word: String,
}

impl WordEntry {
    pub fn new(id: u32, word: impl Into<String>) -> Self {
        Self { id, word: word.into() }
    }
}

/// The `{"words": [...]}` document consumed by the practice page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordList {
    pub words: Vec<WordEntry>,
}

impl WordList {
    /// Numbers `words` from 1 in the given order.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words
            .into_iter()
            .zip(1u32..)
            .map(|(word, id)| WordEntry::new(id, word))
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|e| e.word.as_str())
    }
}
