//! Prompt normalization.
//!
//! Rules match against a canonical form of the prompt: trimmed, with every
//! run of whitespace (newlines included) collapsed to one space. The
//! original text is kept alongside so nothing the author wrote is lost.

/// Collapse whitespace runs to single spaces and trim both ends.
///
/// Idempotent: normalizing an already-normalized string returns it unchanged.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// A prompt in both its original and normalized forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPrompt<'a> {
    original: &'a str,
    text: String,
}

impl<'a> NormalizedPrompt<'a> {
    /// Normalize `original`, keeping a borrow of the untouched text.
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            text: normalize(original),
        }
    }

    /// The normalized text that rules and the tokenizer see.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The prompt exactly as the caller supplied it.
    pub const fn original(&self) -> &'a str {
        self.original
    }

    /// Whether the prompt has no content after normalization.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
