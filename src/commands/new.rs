use crate::commands::executable::Executable;
use crate::commands::CommandError;
use crate::parser::ParsedCommand;
use crate::response::Response;
use crate::store::{Data, Record, Store};
use crate::Error;

/// Inserts a record with the addressed id. Replies `1` when inserted and `0`
/// when the id is already taken; an existing record is never overwritten.
#[derive(Debug, PartialEq)]
pub struct New {
    pub id: u64,
    pub data: Data,
}

impl Executable for New {
    fn exec(self, store: Store) -> Result<Response, Error> {
        let inserted = store.insert(Record::new(self.id, self.data));
        if inserted {
            Ok(Response::Applied)
        } else {
            Ok(Response::Unchanged)
        }
    }
}

impl TryFrom<ParsedCommand> for New {
    type Error = Error;

    fn try_from(cmd: ParsedCommand) -> Result<Self, Self::Error> {
        // Only the single-id address form creates a record.
        let id = cmd.id.as_single().ok_or(CommandError::InvalidId)?;
        Ok(Self {
            id,
            data: cmd.data.unwrap_or_default(),
        })
    }
}
