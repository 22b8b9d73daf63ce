//! Script coordinates used everywhere below the protocol layer
//!
//! Lines and columns are 1-based. Columns count UTF-16 code units so that a
//! column maps onto a protocol character offset without re-reading the text.

use std::cmp::Reverse;
use std::fmt;

/// A 1-based (line, column) position inside a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScriptPosition {
    pub line: u32,
    pub column: u32,
}

impl ScriptPosition {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for ScriptPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of script text. `start` is inclusive, `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptRegion {
    pub start: ScriptPosition,
    pub end: ScriptPosition,
}

impl ScriptRegion {
    pub const fn new(start: ScriptPosition, end: ScriptPosition) -> Self {
        Self { start, end }
    }

    /// Region on a single line covering `[start_column, end_column)`
    pub const fn on_line(line: u32, start_column: u32, end_column: u32) -> Self {
        Self {
            start: ScriptPosition::new(line, start_column),
            end: ScriptPosition::new(line, end_column),
        }
    }

    /// Returns true if `position` lies inside the region.
    /// A position equal to `end` is outside, matching protocol range semantics.
    pub fn contains(&self, position: ScriptPosition) -> bool {
        self.start <= position && position < self.end
    }

    /// Sort key that orders nested regions innermost first
    pub fn specificity(&self) -> (Reverse<ScriptPosition>, ScriptPosition) {
        (Reverse(self.start), self.end)
    }
}

impl fmt::Display for ScriptRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
