//! Logical line reader
//!
//! Splits Makefile source into logical lines: physical lines are trimmed,
//! `#` comment lines are dropped (even in the middle of a continuation), and
//! lines ending in `\` are joined with the following line by a single space.

use crate::Span;

/// A logical Makefile line after continuation joining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub text: String,
    /// From the start of the first physical line to the end of the last one
    pub span: Span,
}

impl LogicalLine {
    pub fn new(text: String, span: Span) -> Self {
        Self { text, span }
    }
}

/// The logical line reader for Makefile text.
pub struct LineReader<'a> {
    source: &'a str,
    pending: Vec<&'a str>,
    pending_start: Option<usize>,
    pending_end: usize,
}

impl<'a> LineReader<'a> {
    /// Creates a new reader over Makefile source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pending: Vec::new(),
            pending_start: None,
            pending_end: 0,
        }
    }

    /// Reads the entire source and returns all logical lines.
    ///
    /// A continuation still open at end of input is flushed as a final line.
    pub fn read_lines(&mut self) -> Vec<LogicalLine> {
        let mut lines = Vec::new();
        let source = self.source;
        let mut offset = 0;

        for physical in source.split_inclusive('\n') {
            let start = offset;
            offset += physical.len();

            let trimmed = physical.trim();
            if trimmed.starts_with('#') {
                continue;
            }

            let end = start + physical.trim_end().len();
            match trimmed.strip_suffix('\\') {
                Some(head) => self.push(head, start, end),
                None => {
                    self.push(trimmed, start, end);
                    lines.extend(self.flush());
                }
            }
        }

        lines.extend(self.flush());
        lines
    }

    fn push(&mut self, text: &'a str, start: usize, end: usize) {
        self.pending_start.get_or_insert(start);
        self.pending_end = end;
        self.pending.push(text);
    }

    fn flush(&mut self) -> Option<LogicalLine> {
        let start = self.pending_start.take()?;
        let text = self.pending.join(" ");
        self.pending.clear();
        Some(LogicalLine::new(text, Span::new(start, self.pending_end)))
    }
}
