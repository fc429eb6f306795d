//! Variable reference expansion
//!
//! A raw value is split into units on single spaces. A piece that opens a
//! reference (`$(`) but doesn't balance absorbs the following pieces until
//! it does, so `$(A B)` stays one unit. A unit of the form `$(NAME)` is replaced by the
//! expansion of `NAME`; anything else is kept literally.

use crate::error::{ExpandError, ExpandResult};
use crate::table::VariableTable;

/// Returns true when `s` has as many `(` as `)`.
///
/// Order is not considered, so `")("` counts as balanced.
pub fn is_balanced(s: &str) -> bool {
    let mut depth: i64 = 0;
    for ch in s.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
    }
    depth == 0
}

/// Splits a raw value into expansion units.
pub fn split_units(raw: &str) -> Vec<String> {
    let mut units = Vec::new();
    let mut pending: Option<String> = None;

    for piece in raw.split(' ').map(str::trim).filter(|p| !p.is_empty()) {
        match pending.take() {
            Some(mut acc) => {
                acc.push(' ');
                acc.push_str(piece);
                if is_balanced(&acc) {
                    units.push(acc);
                } else {
                    pending = Some(acc);
                }
            }
            None if piece.starts_with("$(") && !is_balanced(piece) => {
                pending = Some(piece.to_string())
            }
            None => units.push(piece.to_string()),
        }
    }

    // Still unbalanced at the end: keep what we have as a literal
    units.extend(pending);
    units
}

/// Returns the variable name of a `$(NAME)` unit.
pub fn reference_name(unit: &str) -> Option<&str> {
    let inner = unit.strip_prefix("$(")?.strip_suffix(')')?;
    is_balanced(inner).then_some(inner)
}

/// Splits an expanded value into whitespace-separated tokens, in order.
pub fn tokenize(expanded: &str) -> Vec<String> {
    expanded.split_whitespace().map(str::to_string).collect()
}

/// Recursive expander with a guard against self-referential definitions.
pub(crate) struct Expander<'t> {
    table: &'t VariableTable,
    /// Names currently being expanded, outermost first
    stack: Vec<String>,
}

impl<'t> Expander<'t> {
    pub(crate) fn new(table: &'t VariableTable) -> Self {
        Self {
            table,
            stack: Vec::new(),
        }
    }

    pub(crate) fn expand(&mut self, name: &str) -> ExpandResult<String> {
        let table = self.table;
        let Some(def) = table.definition(name) else {
            return Ok(String::new());
        };
        if def.value.is_empty() {
            return Ok(String::new());
        }

        if self.stack.iter().any(|n| n == name) {
            let mut chain = self.stack.clone();
            chain.push(name.to_string());
            return Err(ExpandError::Cycle {
                chain,
                span: def.span,
            });
        }

        self.stack.push(name.to_string());
        let mut parts = Vec::new();
        for unit in split_units(&def.value) {
            match reference_name(&unit) {
                // Undefined names still take a slot in the join
                Some(inner) => parts.push(self.expand(inner)?),
                None => parts.push(unit),
            }
        }
        self.stack.pop();

        Ok(parts.join(" "))
    }
}
