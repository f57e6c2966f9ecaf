use crate::error::{Error, Result};
use crate::retry::{Interrupt, Outcome, RetryPolicy, Sleeper, retry};
use crate::sanitize::audio_file_name;
use crate::summary::BatchStats;
use crate::tts::SpeechSynthesizer;
use crate::word::WordEntry;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Overwrite assets that already exist.
    pub force: bool,
    pub retry: RetryPolicy,
    /// Pause after every successful request.
    pub courtesy_delay: Duration,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            force: false,
            retry: RetryPolicy::default(),
            courtesy_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordOutcome {
    Skipped,
    Generated,
    Failed,
}

pub struct Generator<'a> {
    synth: &'a dyn SpeechSynthesizer,
    sleeper: &'a dyn Sleeper,
    interrupt: Interrupt,
    options: GenerateOptions,
}

impl<'a> Generator<'a> {
    pub fn new(
        synth: &'a dyn SpeechSynthesizer,
        sleeper: &'a dyn Sleeper,
        interrupt: Interrupt,
        options: GenerateOptions,
    ) -> Self {
        Self {
            synth,
            sleeper,
            interrupt,
            options,
        }
    }

    /// Generates the missing assets of one level into `audio_dir`.
    pub fn generate_batch(
        &self,
        level: &str,
        words: &[WordEntry],
        audio_dir: &Path,
    ) -> Result<BatchStats> {
        fs::create_dir_all(audio_dir).map_err(|e| Error::io(audio_dir, e))?;
        info!("Processing {level}: {} words into {}", words.len(), audio_dir.display());

        let mut stats = BatchStats::default();
        for entry in words {
            self.interrupt.check()?;
            match self.generate_word(level, entry, words.len(), audio_dir)? {
                WordOutcome::Skipped => stats.skipped += 1,
                WordOutcome::Generated => stats.generated += 1,
                WordOutcome::Failed => stats.failed += 1,
            }
        }
        Ok(stats)
    }

    fn generate_word(
        &self,
        level: &str,
        entry: &WordEntry,
        count: usize,
        audio_dir: &Path,
    ) -> Result<WordOutcome> {
        let file_name = audio_file_name(&entry.word);
        let target = audio_dir.join(&file_name);
        let tag = format!("[{level}] [{:3}/{count}]", entry.id);

        if target.exists() && !self.options.force {
            info!("{tag} Skipping '{}' (already exists)", entry.word);
            return Ok(WordOutcome::Skipped);
        }

        let max_attempts = self.options.retry.max_attempts;
        let outcome = retry(
            &self.options.retry,
            self.sleeper,
            |attempt| {
                if attempt == 1 {
                    info!("{tag} Generating '{}' -> {file_name}", entry.word);
                } else {
                    info!("{tag} Retrying '{}' (attempt {attempt}/{max_attempts})", entry.word);
                }
                let audio = self.synth.synthesize(&entry.word)?;
                write_atomic(&target, &audio)
            },
            |_, err, delay| {
                warn!("{tag} Error: {err}. Retrying in {}s...", delay.as_secs_f32());
            },
        )?;

        match outcome {
            Outcome::Succeeded { .. } => {
                self.sleeper.sleep(self.options.courtesy_delay)?;
                Ok(WordOutcome::Generated)
            }
            Outcome::Exhausted { error: err, attempts } => {
                error!("{tag} Failed '{}' after {attempts} attempts: {err}", entry.word);
                Ok(WordOutcome::Failed)
            }
        }
    }
}

/// Writes `bytes` next to `path` and renames it into place, so the target
/// is either absent, the previous file, or complete.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}
