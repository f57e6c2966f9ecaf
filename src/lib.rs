pub mod error;
pub mod sanitize;
pub mod word;
pub mod wordlist;
pub mod retry;
pub mod tts;
pub mod pipeline;
pub mod summary;
pub mod verify;
pub mod credentials;
pub mod config;
pub mod job;

pub use error::{Error, Result};
pub use pipeline::{GenerateOptions, Generator};
pub use sanitize::sanitize_filename;
pub use summary::{BatchStats, RunTotals};
pub use word::{WordEntry, WordList};
