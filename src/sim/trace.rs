use serde::{Deserialize, Serialize};

/// One memory reference as the engine consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    pub address: u32,
    pub is_write: bool,
}

impl Access {
    pub fn read(address: u32) -> Self {
        Self {
            address,
            is_write: false,
        }
    }

    pub fn write(address: u32) -> Self {
        Self {
            address,
            is_write: true,
        }
    }
}

/// A parsed trace plus how many lines were dropped on the floor.
#[derive(Debug, Clone, Default)]
pub struct ParsedTrace {
    pub accesses: Vec<Access>,
    pub skipped_lines: usize,
}

/// Parses the textual trace format: one access per line, either
/// `R <hex>` / `W <hex>` or a bare hex address (implied read). `#` lines and
/// blank lines are comments. Malformed lines are skipped, never raised.
pub fn parse_trace(input: &str) -> ParsedTrace {
    let mut trace = ParsedTrace::default();
    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line) {
            Some(access) => trace.accesses.push(access),
            None => trace.skipped_lines += 1,
        }
    }
    trace
}

fn parse_line(line: &str) -> Option<Access> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next()?;
    let access = match first {
        "R" | "r" => Access::read(parse_hex(tokens.next()?)?),
        "W" | "w" => Access::write(parse_hex(tokens.next()?)?),
        other => Access::read(parse_hex(other)?),
    };
    // Trailing junk makes the whole line malformed.
    tokens.next().is_none().then_some(access)
}

fn parse_hex(token: &str) -> Option<u32> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u32::from_str_radix(digits, 16).ok()
}
