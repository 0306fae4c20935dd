//! Parsing and execution of the `add` / `find` / `del` command lines the interactive binary
//! reads from standard input.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::table::StringTable;

/// Errors produced while parsing a command line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The line held no tokens
    #[error("Empty command!\nType this commands:\nadd, find, del")]
    Empty,
    /// A known command without its key token
    #[error("You need to type key, try again!")]
    MissingKey,
    /// `add` with a key but no value token
    #[error("You need to type value, try again!")]
    MissingValue,
    /// The first token is not a known command
    #[error("Bad command!\nType this commands:\nadd, find, del")]
    Unknown(String),
}

/// One parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add <key> <value>`
    Add {
        /// Key to insert under
        key: String,
        /// Value to store
        value: String,
    },
    /// `find <key>`
    Find {
        /// Key to look up
        key: String,
    },
    /// `del <key>`
    Delete {
        /// Key to remove
        key: String,
    },
}

impl FromStr for Command {
    type Err = CommandError;

    /// Parses a whitespace separated line. Tokens past the ones a command needs are ignored.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or(CommandError::Empty)?;

        let command = match name {
            "add" | "find" | "del" => name,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        let key = tokens.next().ok_or(CommandError::MissingKey)?.to_string();

        Ok(match command {
            "add" => {
                let value = tokens.next().ok_or(CommandError::MissingValue)?.to_string();
                Self::Add { key, value }
            }
            "find" => Self::Find { key },
            _ => Self::Delete { key },
        })
    }
}

/// What running a command against a table produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The value was stored; nothing is printed
    Stored,
    /// The value found under the key
    Found(String),
    /// The looked up key is absent
    NotFound,
    /// The value removed with the key
    Deleted(String),
    /// The key to delete is absent
    DeleteMissing,
}

impl Reply {
    /// Whether the reply prints a line
    #[must_use]
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Stored)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stored => Ok(()),
            Self::Found(value) | Self::Deleted(value) => f.write_str(value),
            Self::NotFound => f.write_str("Not found"),
            Self::DeleteMissing => f.write_str("Can't delete element: key not found"),
        }
    }
}

impl Command {
    /// Runs the command against `table`
    pub fn execute<T: StringTable<String> + ?Sized>(self, table: &mut T) -> Reply {
        match self {
            Self::Add { key, value } => {
                table.add(key, value);
                Reply::Stored
            }
            Self::Find { key } => table.find(&key).map_or(Reply::NotFound, |v| Reply::Found(v.clone())),
            Self::Delete { key } => table.delete(&key).map_or(Reply::DeleteMissing, Reply::Deleted),
        }
    }
}
