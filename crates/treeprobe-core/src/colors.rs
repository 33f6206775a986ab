//! ANSI color codes for diagnostic dumps and traces.
//!
//! Three semantic colors with an orthogonal dim modifier:
//! - Key: object keys, operator names
//! - Literal: strings and numbers inside dumps
//! - Dim: structure (`{}[]:,`), arrows, markers
//! - Reset: return to default

/// ANSI color palette for dumps.
///
/// Uses only standard 16-color ANSI codes so dumps stay readable on light and
/// dark terminals alike.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colors {
    pub key: &'static str,
    pub literal: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    /// Colors enabled (ANSI escape codes).
    pub const ON: Self = Self {
        key: "\x1b[34m",
        literal: "\x1b[32m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    /// Colors disabled. Every field is empty, so formatting code can push
    /// them unconditionally.
    pub const OFF: Self = Self {
        key: "",
        literal: "",
        dim: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.key.is_empty()
    }

    /// Wrap `text` in the dim modifier.
    pub fn dimmed(&self, text: &str) -> String {
        format!("{}{}{}", self.dim, text, self.reset)
    }

    /// Wrap `text` in the key color.
    pub fn keyed(&self, text: &str) -> String {
        format!("{}{}{}", self.key, text, self.reset)
    }
}
