use tracing::debug;

use crate::error::ExecError;
use crate::step::{LBRACKET, RBRACKET};

/// Which way a bracket scan walks through the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// From a `[` towards its `]`.
    Forward,
    /// From a `]` towards its `[`.
    Backward,
}

impl Direction {
    fn delta(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    fn bracket(self) -> char {
        match self {
            Direction::Forward => '[',
            Direction::Backward => ']',
        }
    }
}

/// Find the bracket that structurally matches the one at `from`.
///
/// Scans from `from + direction` with a nesting counter starting at 1. A `[`
/// adds the direction's delta and a `]` subtracts it, so the same rule serves
/// both directions. Returns the scan position at which the counter reaches
/// zero, or [`ExecError::UnmatchedBracket`] if the scan leaves the program.
pub fn match_bracket(code: &[u8], from: usize, direction: Direction) -> Result<usize, ExecError> {
    let delta = direction.delta();
    let mut depth: isize = 1;
    let mut pos = from as isize;

    loop {
        pos += delta;
        if pos < 0 || pos as usize >= code.len() {
            debug!(position = from, bracket = %direction.bracket(), "bracket scan left the program");
            return Err(ExecError::UnmatchedBracket {
                position: from,
                bracket: direction.bracket(),
            });
        }
        match code[pos as usize] {
            LBRACKET => depth += delta,
            RBRACKET => depth -= delta,
            _ => {}
        }
        if depth == 0 {
            return Ok(pos as usize);
        }
    }
}

/// Sentinel for positions with no partner: non-brackets and unmatched brackets.
const UNMATCHED: usize = usize::MAX;

/// Precomputed bracket partners for a program.
///
/// Built once in a single pass with a stack. Unmatched brackets are recorded
/// rather than rejected up front, so a program whose stray bracket is never
/// jumped through behaves exactly as it does under [`match_bracket`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTable {
    partners: Vec<usize>,
}

impl BracketTable {
    pub fn build(code: &[u8]) -> Self {
        let mut partners = vec![UNMATCHED; code.len()];
        let mut stack = Vec::new();

        for (i, &byte) in code.iter().enumerate() {
            match byte {
                LBRACKET => stack.push(i),
                RBRACKET => {
                    if let Some(open) = stack.pop() {
                        partners[open] = i;
                        partners[i] = open;
                    }
                }
                _ => {}
            }
        }

        Self { partners }
    }

    /// The partner of the bracket at `pos`, if it has one.
    pub fn partner(&self, pos: usize) -> Option<usize> {
        match self.partners.get(pos) {
            Some(&p) if p != UNMATCHED => Some(p),
            _ => None,
        }
    }
}

/// How the step engine resolves jump targets.
#[derive(Debug, Clone)]
pub enum JumpResolver {
    /// Scan the program on every jump.
    Scan,
    /// Look partners up in a table built once for the program.
    Table(BracketTable),
}

impl JumpResolver {
    pub fn cached(code: &[u8]) -> Self {
        JumpResolver::Table(BracketTable::build(code))
    }

    pub fn resolve(&self, code: &[u8], from: usize, direction: Direction) -> Result<usize, ExecError> {
        match self {
            JumpResolver::Scan => match_bracket(code, from, direction),
            JumpResolver::Table(table) => table.partner(from).ok_or_else(|| {
                debug!(position = from, bracket = %direction.bracket(), "no partner in bracket table");
                ExecError::UnmatchedBracket {
                    position: from,
                    bracket: direction.bracket(),
                }
            }),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn bracket_heavy_code() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(prop::sample::select(vec![b'[', b']', b'+', b'x']), 0..64)
    }

    proptest! {
        #[test]
        fn resolution_is_an_involution(code in bracket_heavy_code()) {
            for (i, &byte) in code.iter().enumerate() {
                if byte != LBRACKET {
                    continue;
                }
                if let Ok(close) = match_bracket(&code, i, Direction::Forward) {
                    prop_assert_eq!(code[close], RBRACKET);
                    prop_assert_eq!(match_bracket(&code, close, Direction::Backward), Ok(i));
                }
            }
        }

        #[test]
        fn table_agrees_with_scan(code in bracket_heavy_code()) {
            let table = JumpResolver::cached(&code);
            for (i, &byte) in code.iter().enumerate() {
                let direction = match byte {
                    LBRACKET => Direction::Forward,
                    RBRACKET => Direction::Backward,
                    _ => continue,
                };
                prop_assert_eq!(
                    table.resolve(&code, i, direction),
                    match_bracket(&code, i, direction)
                );
            }
        }
    }
}
