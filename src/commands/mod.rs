pub mod del;
pub mod executable;
pub mod get;
pub mod new;
pub mod upd;

use std::str::FromStr;
use strum_macros::EnumString;
use thiserror::Error as ThisError;

use crate::commands::executable::Executable;
use crate::parser::{self, ParsedCommand};
use crate::registry::Registry;
use crate::response::Response;
use crate::store::Store;
use crate::Error;

use del::Del;
use get::Get;
use new::New;
use upd::Upd;

/// The closed set of wire operations. The parser stores operations as raw
/// upper-cased strings; membership is checked here, at dispatch time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Operation {
    New,
    Upd,
    Get,
    Del,
}

#[derive(Debug, PartialEq)]
pub enum Command {
    New(New),
    Upd(Upd),
    Get(Get),
    Del(Del),
}

impl Executable for Command {
    fn exec(self, store: Store) -> Result<Response, Error> {
        match self {
            Command::New(cmd) => cmd.exec(store),
            Command::Upd(cmd) => cmd.exec(store),
            Command::Get(cmd) => cmd.exec(store),
            Command::Del(cmd) => cmd.exec(store),
        }
    }
}

impl TryFrom<ParsedCommand> for Command {
    type Error = Error;

    fn try_from(cmd: ParsedCommand) -> Result<Self, Self::Error> {
        let operation =
            Operation::from_str(&cmd.operation).map_err(|_| CommandError::InvalidOperation)?;

        match operation {
            Operation::New => New::try_from(cmd).map(Command::New),
            Operation::Upd => Upd::try_from(cmd).map(Command::Upd),
            Operation::Get => Get::try_from(cmd).map(Command::Get),
            Operation::Del => Del::try_from(cmd).map(Command::Del),
        }
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum CommandError {
    #[error("invalid operation")]
    InvalidOperation,
    #[error("invalid id")]
    InvalidId,
    #[error("range queries are not supported")]
    UnsupportedRange,
}

/// The single entry point the transport consumes: parses one command line,
/// resolves the entity's store (creating it on first reference, before the
/// operation is validated), executes, and folds every failure into an error
/// response line. Nothing here terminates the connection or the process.
pub fn dispatch(registry: &Registry, input: &str) -> Response {
    match execute(registry, input) {
        Ok(response) => response,
        Err(err) => Response::Error(format!("Error processing command: {}", err)),
    }
}

fn execute(registry: &Registry, input: &str) -> Result<Response, Error> {
    let parsed = parser::parse(input)?;
    let store = registry.entity(&parsed.entity);
    let command = Command::try_from(parsed)?;
    command.exec(store)
}
