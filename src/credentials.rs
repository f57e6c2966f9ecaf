use crate::error::{Error, Result};
use std::io::{BufRead, Write};
use tracing::debug;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Loads `.env` (if any) and reads [`API_KEY_VAR`].
pub fn api_key_from_env() -> Option<String> {
    match dotenvy::dotenv() {
        Ok(path) => debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => debug!("ignoring unreadable .env: {e}"),
    }
    std::env::var(API_KEY_VAR).ok()
}

/// Uses `env_value` when it is non-blank, otherwise asks on `output` and
/// reads one line from `input`.
pub fn resolve_api_key<R: BufRead, W: Write>(
    env_value: Option<String>,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    if let Some(key) = env_value.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
        return Ok(key);
    }

    let prompt = |output: &mut W| -> std::io::Result<()> {
        writeln!(output, "OpenAI API key not found in environment.")?;
        write!(output, "Please enter your OpenAI API key: ")?;
        output.flush()
    };
    prompt(output).map_err(|e| Error::io("<stdout>", e))?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| Error::io("<stdin>", e))?;
    let key = line.trim();
    if key.is_empty() {
        return Err(Error::MissingApiKey);
    }
    Ok(key.to_string())
}

/// First seven characters followed by an ellipsis.
pub fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(7).collect();
    format!("{prefix}...")
}

/// Asks a yes/no question; only `y` (any case) counts as yes.
pub fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "{question} (y/n): ")
        .and_then(|_| output.flush())
        .map_err(|e| Error::io("<stdout>", e))?;
    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| Error::io("<stdin>", e))?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_env_value_wins() {
        let mut input = Cursor::new("typed\n");
        let mut output = Vec::new();
        let key = resolve_api_key(Some("sk-env".into()), &mut input, &mut output).unwrap();
        assert_eq!(key, "sk-env");
        assert!(output.is_empty());
    }

    #[test]
    fn test_prompted_when_absent_or_blank() {
        for env in [None, Some("   ".to_string())] {
            let mut input = Cursor::new("  sk-typed \n");
            let mut output = Vec::new();
            let key = resolve_api_key(env, &mut input, &mut output).unwrap();
            assert_eq!(key, "sk-typed");
            assert!(String::from_utf8(output).unwrap().contains("Please enter"));
        }
    }

    #[test]
    fn test_empty_prompt_is_missing_key() {
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();
        assert!(matches!(
            resolve_api_key(None, &mut input, &mut output),
            Err(Error::MissingApiKey)
        ));

        let mut eof = Cursor::new("");
        assert!(matches!(
            resolve_api_key(None, &mut eof, &mut output),
            Err(Error::MissingApiKey)
        ));
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("sk-proj-abcdef"), "sk-proj...");
        assert_eq!(mask_key("abc"), "abc...");
    }

    #[test]
    fn test_confirm() {
        let mut output = Vec::new();
        assert!(confirm("Continue?", &mut Cursor::new("Y\n"), &mut output).unwrap());
        assert!(!confirm("Continue?", &mut Cursor::new("yes\n"), &mut output).unwrap());
        assert!(!confirm("Continue?", &mut Cursor::new(""), &mut output).unwrap());
    }
}
