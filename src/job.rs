use crate::config::{JobConfig, ResolvedLevel};
use crate::error::{Error, Result};
use crate::pipeline::{GenerateOptions, Generator};
use crate::retry::{Interrupt, Sleeper};
use crate::summary::RunTotals;
use crate::tts::SpeechSynthesizer;
use crate::verify::{VerificationReport, verify_level};
use crate::word::WordList;
use crate::wordlist::load_any;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Picks the configured levels to run; an empty filter means all of them.
pub fn select_levels(config: &JobConfig, only: &[String]) -> Result<Vec<ResolvedLevel>> {
    if only.is_empty() {
        return Ok(config.resolved_levels());
    }
    only.iter()
        .map(|name| {
            config
                .find_level(name)
                .ok_or_else(|| Error::Config(format!("unknown level '{name}'")))
        })
        .collect()
}

/// Loads, exports and voices every selected level in turn.
///
/// A missing source file aborts the whole run, as does an interruption;
/// in both cases levels already finished keep their files.
pub fn run_generate(
    config: &JobConfig,
    levels: &[ResolvedLevel],
    synth: &dyn SpeechSynthesizer,
    sleeper: &dyn Sleeper,
    interrupt: &Interrupt,
    force: bool,
) -> Result<RunTotals> {
    let options = GenerateOptions {
        force,
        retry: config.retry.policy(),
        courtesy_delay: config.courtesy_delay(),
    };
    let generator = Generator::new(synth, sleeper, interrupt.clone(), options);

    let mut run = RunTotals::default();
    for level in levels {
        info!("Parsing {}...", level.source_file.display());
        let words = WordList::load_source(&level.source_file)?;
        info!("Found {} words", words.len());

        info!("Creating {}...", level.json_file.display());
        words.save_json(&level.json_file)?;

        let stats = generator.generate_batch(&level.level, &words.words, &level.audio_dir)?;
        info!("{} Summary:\n{stats}", level.level);
        run.record(level.level.clone(), stats);
    }
    Ok(run)
}

/// Compares each `(level, reference file)` pair with the level's source list.
pub fn run_verify(config: &JobConfig, references: &[(String, PathBuf)]) -> Result<VerificationReport> {
    let mut report = VerificationReport::default();
    for (name, reference_path) in references {
        let level = config
            .find_level(name)
            .ok_or_else(|| Error::Config(format!("unknown level '{name}'")))?;
        let reference = load_any(&config.resolve(reference_path))?;
        let current = load_any(&level.source_file)?;
        report.push(verify_level(name, &reference, &current));
    }
    Ok(report)
}

/// Voices a single word into `<audio_root>/test.mp3` and returns its path.
pub fn run_check(config: &JobConfig, synth: &dyn SpeechSynthesizer) -> Result<PathBuf> {
    let dir = config.audio_root();
    fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
    let path = dir.join("test.mp3");
    info!("Generating test audio for word 'test'...");
    let audio = synth.synthesize("test")?;
    fs::write(&path, audio).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

/// Splits a `LEVEL=PATH` argument.
pub fn parse_reference_arg(arg: &str) -> Result<(String, PathBuf)> {
    match arg.split_once('=') {
        Some((level, path)) if !level.trim().is_empty() && !path.trim().is_empty() => {
            Ok((level.trim().to_string(), Path::new(path.trim()).to_path_buf()))
        }
        _ => Err(Error::Config(format!("expected LEVEL=PATH, got '{arg}'"))),
    }
}
