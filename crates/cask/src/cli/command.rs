//! Command line parsing for the interactive loop.

use cask_common::ResourceLimits;

/// One parsed input line.
///
/// IDs are kept as raw integers: a well-formed number that cannot name a
/// container (zero, negative) is a lookup miss, not a malformed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `create <name> <cpu_limit> <mem_limit>`
    Create {
        /// Requested name, before truncation.
        name: String,
        /// Declared limits.
        limits: ResourceLimits,
    },
    /// `delete <id>`
    Delete(i64),
    /// `list`
    List,
    /// `stop <id>`
    Stop(i64),
    /// `start <id>`
    Start(i64),
    /// `exit`
    Exit,
    /// Anything else, including commands with malformed numbers.
    Unknown,
}

impl Command {
    /// Parse one line.
    ///
    /// Tokens are separated by runs of whitespace and are case-sensitive.
    /// Tokens after a complete `create`, `delete`, `stop` or `start` are
    /// ignored; `list` and `exit` must stand alone.
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Self::Unknown;
        };

        let parsed = match keyword {
            "create" => parse_create(&mut tokens),
            "delete" => parse_int(tokens.next()).map(Self::Delete),
            "stop" => parse_int(tokens.next()).map(Self::Stop),
            "start" => parse_int(tokens.next()).map(Self::Start),
            "list" => tokens.next().is_none().then_some(Self::List),
            "exit" => tokens.next().is_none().then_some(Self::Exit),
            _ => None,
        };

        parsed.unwrap_or(Self::Unknown)
    }
}

fn parse_create<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<Command> {
    let name = tokens.next()?;
    let cpu = parse_int(tokens.next())?;
    let memory = parse_int(tokens.next())?;
    Some(Command::Create {
        name: name.to_string(),
        limits: ResourceLimits::new(cpu, memory),
    })
}

fn parse_int(token: Option<&str>) -> Option<i64> {
    token?.parse().ok()
}
