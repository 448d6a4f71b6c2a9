use crate::commands::executable::Executable;
use crate::commands::CommandError;
use crate::parser::ParsedCommand;
use crate::response::Response;
use crate::store::Store;
use crate::Error;

/// Fetches the addressed record, or every record of the entity in ascending
/// id order when no id is given. Replies `0` when nothing matches.
///
/// The grammar also admits a bounded range (`entity[lower:upper]`), but range
/// retrieval is not implemented; such an address is rejected with an explicit
/// error rather than resolved into a scan.
#[derive(Debug, PartialEq)]
pub struct Get {
    pub target: Target,
}

#[derive(Debug, PartialEq)]
pub enum Target {
    All,
    Single(u64),
}

impl Executable for Get {
    fn exec(self, store: Store) -> Result<Response, Error> {
        match self.target {
            Target::All => {
                let records = store.get_all(false);
                if records.is_empty() {
                    return Ok(Response::Unchanged);
                }
                let lines = records.iter().map(|record| record.serialize()).collect();
                Ok(Response::Records(lines))
            }
            Target::Single(id) => match store.get(id) {
                Some(record) => Ok(Response::Records(vec![record.serialize()])),
                None => Ok(Response::Unchanged),
            },
        }
    }
}

impl TryFrom<ParsedCommand> for Get {
    type Error = Error;

    fn try_from(cmd: ParsedCommand) -> Result<Self, Self::Error> {
        if cmd.id.is_all() {
            return Ok(Self {
                target: Target::All,
            });
        }
        match cmd.id.as_single() {
            Some(id) => Ok(Self {
                target: Target::Single(id),
            }),
            None => Err(CommandError::UnsupportedRange.into()),
        }
    }
}
