#![allow(clippy::missing_docs_in_private_items)]

//! Interactive front end: reads `add <key> <value>`, `find <key>` and `del <key>` lines from
//! standard input and prints what the table answers.

use std::io::{self, BufRead, Write};

use clap::{Parser, ValueEnum};
use polytable::{ChainingTable, Command, OpenAddressingTable, StringTable, TableConfig};

/// Which collision strategy backs the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Variant {
    /// Separate chaining
    Chaining,
    /// Open addressing with double hashing
    OpenAddressing,
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "polytable", about = "Interactive string-keyed hash table", version)]
struct Cli {
    /// Collision strategy of the table
    #[arg(long, value_enum, default_value_t = Variant::Chaining)]
    variant: Variant,
    /// Initial number of buckets
    #[arg(long, default_value_t = 19)]
    capacity: usize,
}

/// Runs every line of `input` against `table`, writing replies and errors to `output`
fn run_session(
    table: &mut dyn StringTable<String>,
    input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        match line.parse::<Command>() {
            Ok(command) => {
                let reply = command.execute(table);
                if !reply.is_silent() {
                    writeln!(output, "{reply}")?;
                }
            }
            Err(err) => writeln!(output, "{err}")?,
        }
    }
    output.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = TableConfig::new().with_initial_capacity(cli.capacity);

    let mut table: Box<dyn StringTable<String>> = match cli.variant {
        Variant::Chaining => Box::new(ChainingTable::with_config(config)),
        Variant::OpenAddressing => Box::new(OpenAddressingTable::with_config(config)),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(table.as_mut(), stdin.lock(), stdout.lock())?;

    eprintln!("{} entries in {} buckets", table.len(), table.capacity());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_output() {
        let input = "add 15 alice\nfind 15\nadd 16\nbogus\ndel 15\nfind 15\n";
        let mut table: ChainingTable<String> = ChainingTable::new();
        let mut output = Vec::new();

        run_session(&mut table, input.as_bytes(), &mut output).unwrap();

        let expected = "alice\nYou need to type value, try again!\nBad command!\nType this commands:\nadd, find, del\nalice\nNot found\n";
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_cli_parses_variant() {
        let cli = Cli::parse_from(["polytable", "--variant", "open-addressing", "--capacity", "7"]);
        assert_eq!(cli.variant, Variant::OpenAddressing);
        assert_eq!(cli.capacity, 7);
    }
}
