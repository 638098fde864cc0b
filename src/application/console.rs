//! Console command language of the developer harness
//!
//! One command per line:
//!
//! ```text
//! ls [path]                 list a directory
//! stat <path>               show a stat record
//! cat <path> [offset [n]]   read a file
//! write <path> <text...>    overwrite a file with the rest of the line
//! readme <mount>            show an endpoint's documentation
//! mounts                    list mounted endpoints
//! help | quit
//! ```

use crate::application::errors::{ConsoleError, EndpointError};
use crate::plugins::EndpointManager;

const HELP: &str = "Commands:\n\
  ls [path]                 list a directory\n\
  stat <path>               show a stat record\n\
  cat <path> [offset [n]]   read a file\n\
  write <path> <text...>    overwrite a file with the rest of the line\n\
  readme <mount>            show an endpoint's documentation\n\
  mounts                    list mounted endpoints\n\
  help                      show this message\n\
  quit                      leave the console\n";

/// Parsed console command
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    List(String),
    Stat(String),
    Cat { path: String, offset: i64, size: i64 },
    Write { path: String, data: String },
    Readme(String),
    Mounts,
    Help,
    Quit,
}

/// What the harness should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleOutcome {
    Output(String),
    Quit,
}

impl ConsoleCommand {
    /// Parse one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ConsoleError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (name, rest) = split_word(line);
        let command = match name.to_lowercase().as_str() {
            "ls" => {
                let (path, _) = split_word(rest);
                ConsoleCommand::List(if path.is_empty() { "/".to_string() } else { path.to_string() })
            }
            "stat" => ConsoleCommand::Stat(required(rest, "stat <path>")?),
            "cat" => {
                let mut words = rest.split_whitespace();
                let path = words.next().ok_or(ConsoleError::Usage("cat <path> [offset [n]]"))?;
                let offset = parse_number(words.next())?.unwrap_or(0);
                let size = parse_number(words.next())?.unwrap_or(-1);
                ConsoleCommand::Cat {
                    path: path.to_string(),
                    offset,
                    size,
                }
            }
            "write" => {
                let (path, data) = split_word(rest);
                if path.is_empty() {
                    return Err(ConsoleError::Usage("write <path> <text...>"));
                }
                ConsoleCommand::Write {
                    path: path.to_string(),
                    data: data.to_string(),
                }
            }
            "readme" => ConsoleCommand::Readme(required(rest, "readme <mount>")?),
            "mounts" => ConsoleCommand::Mounts,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => return Err(ConsoleError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }

    pub fn execute(&self, manager: &EndpointManager) -> Result<ConsoleOutcome, ConsoleError> {
        let output: String = match self {
            ConsoleCommand::List(path) => manager
                .read_dir(path)?
                .iter()
                .map(|entry| {
                    if entry.is_dir {
                        format!("{}/\n", entry.name)
                    } else {
                        format!("{:<16}{:>8}\n", entry.name, entry.size)
                    }
                })
                .collect(),
            ConsoleCommand::Stat(path) => {
                let info = manager
                    .stat(path)?
                    .ok_or_else(|| EndpointError::NoSuchPath(path.clone()))?;
                let mut text = serde_json::to_string_pretty(&info)
                    .map_err(|e| EndpointError::Internal(e.to_string()))?;
                text.push('\n');
                text
            }
            ConsoleCommand::Cat { path, offset, size } => {
                String::from_utf8_lossy(&manager.read(path, *offset, *size)?).into_owned()
            }
            ConsoleCommand::Write { path, data } => {
                manager.write(path, data.as_bytes())?;
                format!("wrote {} bytes to {}\n", data.len(), path)
            }
            ConsoleCommand::Readme(mount) => {
                let endpoint = manager
                    .endpoint(mount)
                    .ok_or_else(|| EndpointError::NoSuchPath(mount.clone()))?;
                endpoint.readme()?.to_string()
            }
            ConsoleCommand::Mounts => manager
                .list_mounts()
                .iter()
                .map(|m| format!("{:<16}{}\n", m.path, m.plugin))
                .collect(),
            ConsoleCommand::Help => HELP.to_string(),
            ConsoleCommand::Quit => return Ok(ConsoleOutcome::Quit),
        };
        Ok(ConsoleOutcome::Output(output))
    }
}

/// Parse and run one line
pub fn run_line(manager: &EndpointManager, line: &str) -> Result<Option<ConsoleOutcome>, ConsoleError> {
    match ConsoleCommand::parse(line)? {
        Some(command) => command.execute(manager).map(Some),
        None => Ok(None),
    }
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(i) => (&input[..i], input[i..].trim_start()),
        None => (input, ""),
    }
}

fn required(rest: &str, usage: &'static str) -> Result<String, ConsoleError> {
    let (word, _) = split_word(rest);
    if word.is_empty() {
        return Err(ConsoleError::Usage(usage));
    }
    Ok(word.to_string())
}

fn parse_number(word: Option<&str>) -> Result<Option<i64>, ConsoleError> {
    word.map(|w| w.parse::<i64>().map_err(|_| ConsoleError::Usage("cat <path> [offset [n]]")))
        .transpose()
}
