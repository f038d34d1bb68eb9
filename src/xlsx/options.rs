//! Reader configuration.

/// Options controlling how a workbook is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Keep cached values instead of formula text for formula cells
    pub values_only: bool,

    /// Require every internal relationship target to exist in the package
    pub strict_relationships: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            values_only: false,
            strict_relationships: true,
        }
    }
}

impl ReadOptions {
    /// Create default read options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read cached values only, dropping formulas.
    pub fn with_values_only(mut self, values_only: bool) -> Self {
        self.values_only = values_only;
        self
    }

    /// Enable or disable the relationship target check.
    pub fn with_strict_relationships(mut self, strict: bool) -> Self {
        self.strict_relationships = strict;
        self
    }
}
