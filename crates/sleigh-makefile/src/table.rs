//! Variable table
//!
//! Parsing is best-effort: a logical line without `=` is dropped, and a
//! redefinition silently replaces the earlier value.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::ExpandResult;
use crate::expand::{tokenize, Expander};
use crate::line::LineReader;
use crate::Span;

/// Raw (unexpanded) definition of a variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub value: String,
    pub span: Span,
}

/// Mapping from variable name to its raw definition
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    defs: HashMap<String, Definition>,
    /// Names in order of first definition
    order: Vec<String>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse Makefile text into a table. Never fails.
    pub fn parse(source: &str) -> Self {
        let mut table = Self::new();

        for line in LineReader::new(source).read_lines() {
            match line.text.split_once('=') {
                Some((key, value)) => table.define(key.trim(), value.trim(), line.span),
                None if !line.text.is_empty() => {
                    log::trace!("ignoring non-assignment line: {}", line.text);
                }
                None => {}
            }
        }

        table
    }

    /// Read and parse a Makefile from disk
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Define (or redefine) a variable
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>, span: Span) {
        let name = name.into();
        let def = Definition {
            value: value.into(),
            span,
        };
        if self.defs.insert(name.clone(), def).is_none() {
            self.order.push(name);
        }
    }

    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.defs.get(name)
    }

    /// Raw value of a variable, if defined
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.defs.get(name).map(|d| d.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Variable names in order of first definition
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Fully expand a variable. Undefined names expand to `""`.
    pub fn expand(&self, name: &str) -> ExpandResult<String> {
        Expander::new(self).expand(name)
    }

    /// Expand a variable and split the result into tokens
    pub fn expand_tokens(&self, name: &str) -> ExpandResult<Vec<String>> {
        Ok(tokenize(&self.expand(name)?))
    }

    /// Expand every variable, in order of first definition
    pub fn expand_all(&self) -> ExpandResult<Vec<(String, String)>> {
        self.names()
            .map(|name| -> ExpandResult<(String, String)> {
                Ok((name.to_string(), self.expand(name)?))
            })
            .collect()
    }
}
