//! Command implementations.

use std::io::Read;

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;

pub mod analyze;
pub mod info;
pub mod models;
#[cfg(feature = "mcp")]
pub mod serve;
pub mod tokens;

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > max {
            bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Read stdin to the end, enforcing the same limit as files.
pub fn read_stdin(max_bytes: Option<usize>) -> anyhow::Result<String> {
    let mut content = String::new();
    let mut stdin = std::io::stdin().lock();
    match max_bytes {
        Some(max) => {
            let limit = u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1);
            stdin
                .by_ref()
                .take(limit)
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
            if content.len() > max {
                bail!("input too large: stdin exceeds {max} bytes");
            }
        }
        None => {
            stdin
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
        }
    }
    Ok(content)
}

/// Where a command reads its prompt from: a file, `--text`, or `--stdin`.
#[derive(Args, Debug, Default, Clone)]
pub struct PromptSource {
    /// Prompt file to analyze.
    #[arg(conflicts_with_all = ["text", "stdin"])]
    pub file: Option<Utf8PathBuf>,

    /// Prompt text given inline.
    #[arg(long, conflicts_with = "stdin")]
    pub text: Option<String>,

    /// Read the prompt from stdin.
    #[arg(long)]
    pub stdin: bool,
}

impl PromptSource {
    /// Short label for logs and headings.
    pub fn label(&self) -> String {
        match (&self.file, &self.text, self.stdin) {
            (Some(path), _, _) => path.to_string(),
            (None, Some(_), _) => "<text>".to_string(),
            _ => "<stdin>".to_string(),
        }
    }

    /// Load the prompt text.
    ///
    /// # Errors
    ///
    /// Fails when no source or more than one source is given, the input is
    /// unreadable, or it exceeds `max_bytes`.
    pub fn read(&self, max_bytes: Option<usize>) -> anyhow::Result<String> {
        match (&self.file, &self.text, self.stdin) {
            (Some(path), None, false) => read_input_file(path, max_bytes),
            (None, Some(text), false) => {
                if let Some(max) = max_bytes
                    && text.len() > max
                {
                    bail!("input too large: --text is {} bytes (limit: {max} bytes)", text.len());
                }
                Ok(text.clone())
            }
            (None, None, true) => read_stdin(max_bytes),
            (None, None, false) => bail!("no prompt given: pass a FILE, --text, or --stdin"),
            _ => bail!("pass exactly one of FILE, --text, or --stdin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_file_within_limit() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("p.txt")).unwrap();
        std::fs::write(&path, "Summarize this.").unwrap();
        assert_eq!(read_input_file(&path, Some(100)).unwrap(), "Summarize this.");
    }

    #[test]
    fn rejects_oversized_file() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("p.txt")).unwrap();
        std::fs::write(&path, "0123456789").unwrap();
        let err = read_input_file(&path, Some(4)).unwrap_err();
        assert!(err.to_string().contains("input too large"));
        assert!(read_input_file(&path, None).is_ok());
    }

    #[test]
    fn text_source_is_returned_verbatim() {
        let source = PromptSource {
            text: Some("  Be brief.\n".to_string()),
            ..Default::default()
        };
        assert_eq!(source.read(None).unwrap(), "  Be brief.\n");
        assert_eq!(source.label(), "<text>");
        assert!(source.read(Some(3)).is_err());
    }

    #[test]
    fn missing_source_is_an_error() {
        let err = PromptSource::default().read(None).unwrap_err();
        assert!(err.to_string().contains("no prompt given"));
    }
}
