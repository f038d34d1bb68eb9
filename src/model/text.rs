//! Rich text as stored in the shared string table.

use super::Font;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A run of text with optional run-level formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Font>,
}

impl TextRun {
    /// A run without formatting.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            properties: None,
        }
    }
}

/// A string made of one or more runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    pub runs: Vec<TextRun>,
}

impl RichText {
    /// A single unformatted run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::plain(text)],
        }
    }

    /// Append a run.
    pub fn push(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Whether any run carries formatting.
    pub fn is_rich(&self) -> bool {
        self.runs.iter().any(|r| r.properties.is_some())
    }

    /// The concatenated text of every run.
    pub fn plain_text(&self) -> Cow<'_, str> {
        match self.runs.as_slice() {
            [] => Cow::Borrowed(""),
            [single] => Cow::Borrowed(&single.text),
            runs => Cow::Owned(runs.iter().map(|r| r.text.as_str()).collect()),
        }
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

impl From<String> for RichText {
    fn from(text: String) -> Self {
        Self::plain(text)
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}
