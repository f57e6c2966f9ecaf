//! Word → audio filename mapping.
//!
//! The practice page looks up `audio/<level>/<name>.mp3` using the same
//! transform, so the output here must stay byte-for-byte stable.

use regex::Regex;
use std::sync::LazyLock;

/// ASCII punctuation except the underscore that stands in for spaces.
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[[:punct:]&&[^_]]").unwrap());

/// Extension of every generated asset.
pub const AUDIO_EXTENSION: &str = "mp3";

/// Maps a word or phrase to its base filename.
///
/// Lowercases, turns spaces into underscores, drops apostrophes, folds the
/// accented Latin letters that occur in the word lists and strips the
/// remaining ASCII punctuation. Distinct words may collide (`"Erie"` and
/// `"érie"`); the later one simply shares the file.
pub fn sanitize_filename(word: &str) -> String {
    let folded: String = word
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '\'' | '‘' | '’'))
        .map(|c| match c {
            ' ' => '_',
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            _ => c,
        })
        .collect();

    PUNCTUATION.replace_all(&folded, "").into_owned()
}

/// `sanitize_filename(word)` plus the audio extension.
pub fn audio_file_name(word: &str) -> String {
    format!("{}.{}", sanitize_filename(word), AUDIO_EXTENSION)
}
