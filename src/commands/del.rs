use crate::commands::executable::Executable;
use crate::commands::CommandError;
use crate::parser::ParsedCommand;
use crate::response::Response;
use crate::store::Store;
use crate::Error;

/// Removes the addressed record. Replies `1` when a record was removed and
/// `0` when the id does not exist.
#[derive(Debug, PartialEq)]
pub struct Del {
    pub id: u64,
}

impl Executable for Del {
    fn exec(self, store: Store) -> Result<Response, Error> {
        match store.delete(self.id) {
            Some(_) => Ok(Response::Applied),
            None => Ok(Response::Unchanged),
        }
    }
}

impl TryFrom<ParsedCommand> for Del {
    type Error = Error;

    fn try_from(cmd: ParsedCommand) -> Result<Self, Self::Error> {
        let id = cmd.id.as_single().ok_or(CommandError::InvalidId)?;
        Ok(Self { id })
    }
}
