//! Command codes accepted by the interpreter.

use strum::{AsRefStr, Display, EnumIter, EnumString};

/// First token of an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter)]
pub enum CommandCode {
    /// `RJ name`
    #[strum(serialize = "RJ")]
    Register,
    /// `EJ name`
    #[strum(serialize = "EJ")]
    Unregister,
    /// `LJ`
    #[strum(serialize = "LJ")]
    List,
    /// `IJ p1 p2`, then `width height seq`, then the special sizes.
    #[strum(serialize = "IJ")]
    Start,
    /// `D p1 [p2]`
    #[strum(serialize = "D")]
    Resign,
    /// `DJ`
    #[strum(serialize = "DJ")]
    Describe,
    /// `CP name size column [direction]`
    #[strum(serialize = "CP")]
    Move,
    /// `VR`
    #[strum(serialize = "VR")]
    Dump,
    /// `X`
    #[strum(serialize = "X")]
    Grid,
    /// `G`
    #[strum(serialize = "G")]
    Save,
    /// `L`
    #[strum(serialize = "L")]
    Load,
}

/// Whitespace-separated arguments following the command code.
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a> {
    tokens: &'a [&'a str],
}

impl<'a> Arguments<'a> {
    /// Wraps the tokens after the code.
    pub fn new(tokens: &'a [&'a str]) -> Self {
        Self { tokens }
    }

    /// Token at `idx`, if present.
    pub fn text(&self, idx: usize) -> Option<&'a str> {
        self.tokens.get(idx).copied()
    }

    /// Token at `idx` parsed as a signed integer.
    pub fn number(&self, idx: usize) -> Option<i64> {
        self.text(idx).and_then(|t| t.parse().ok())
    }

    /// Every token parsed as a signed integer, or `None` if any fails.
    pub fn numbers(&self) -> Option<Vec<i64>> {
        self.tokens.iter().map(|t| t.parse().ok()).collect()
    }
}
