//! Scanner implementation with a single character of lookahead.  The scanner
//! is responsible for sourcing individual characters from the input, tracking
//! line/column information for diagnostics, and skipping insignificant input
//! (whitespace, and optionally end-of-line comments).
//!
//! The current implementation of the scanner is *not* internally thread safe.

use crate::coords::Coords;

/// An enumeration to control how the scanner treats `#` end-of-line comments.
/// Comment skipping is a lexical extension beyond strict JSON and is never
/// applied unless explicitly selected.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScannerMode {
    /// Strict JSON: only whitespace is insignificant
    Strict,
    /// `#` starts a comment which runs to the end of the line
    HashComments,
}

impl Default for ScannerMode {
    fn default() -> Self {
        Self::Strict
    }
}

/// A cursor over a stream of characters with one character of lookahead.
/// End of input is represented by [None], distinct from every valid
/// character; advancing past the end of input is a no-op.
pub struct Scanner<'a> {
    /// The stream used for sourcing characters from the input
    chars: &'a mut dyn Iterator<Item = char>,
    /// The current lookahead character
    current: Option<char>,
    /// Coordinates of the current lookahead character
    coords: Coords,
    /// How comments are currently being handled
    mode: ScannerMode,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner instance, priming the lookahead from the input
    pub fn new(chars: &'a mut dyn Iterator<Item = char>) -> Self {
        let mut scanner = Scanner {
            chars,
            current: None,
            coords: Coords::default(),
            mode: ScannerMode::default(),
        };
        scanner.prime();
        scanner
    }

    /// Switch the comment handling mode within the scanner
    pub fn with_mode(mut self, mode: ScannerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Get the current lookahead character, or [None] at end of input
    pub fn current(&self) -> Option<char> {
        self.current
    }

    /// Get the coordinates of the current lookahead character
    pub fn coords(&self) -> Coords {
        self.coords
    }

    /// Advance to the next character in the input.  Once the end of input
    /// has been reached this becomes a no-op, never an error.
    pub fn advance(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.prime();
    }

    /// Consume insignificant input: whitespace always, and when
    /// [ScannerMode::HashComments] is selected, `#` comments up to and
    /// including the line terminator.
    pub fn skip_insignificant(&mut self) {
        loop {
            match self.current {
                Some(c) if c.is_whitespace() => self.advance(),
                Some('#') if self.mode == ScannerMode::HashComments => {
                    while let Some(c) = self.current {
                        self.advance();
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => return,
            }
        }
    }

    /// Pull the next character from the stream and update the coordinates
    fn prime(&mut self) {
        self.current = self.chars.next();
        if let Some(c) = self.current {
            self.coords.absolute += 1;
            if c == '\n' {
                self.coords.line += 1;
                self.coords.column = 0;
            } else {
                self.coords.column += 1;
            }
        }
    }
}
