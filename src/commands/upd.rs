use crate::commands::executable::Executable;
use crate::commands::CommandError;
use crate::parser::ParsedCommand;
use crate::response::Response;
use crate::store::{Data, Store};
use crate::Error;

/// Merges the given attributes into the addressed record. Keys present in
/// the command overwrite, keys absent are preserved. Replies `1` when the
/// record exists and `0` otherwise.
#[derive(Debug, PartialEq)]
pub struct Upd {
    pub id: u64,
    pub data: Data,
}

impl Executable for Upd {
    fn exec(self, store: Store) -> Result<Response, Error> {
        let updated = store.update(self.id, &self.data);
        if updated {
            Ok(Response::Applied)
        } else {
            Ok(Response::Unchanged)
        }
    }
}

impl TryFrom<ParsedCommand> for Upd {
    type Error = Error;

    fn try_from(cmd: ParsedCommand) -> Result<Self, Self::Error> {
        let id = cmd.id.as_single().ok_or(CommandError::InvalidId)?;
        Ok(Self {
            id,
            data: cmd.data.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::parser;
    use crate::value::Value;

    fn command(raw: &str) -> Result<Command, Error> {
        Command::try_from(parser::parse(raw).unwrap())
    }

    #[test]
    fn merge_preserves_untouched_keys() {
        let store = Store::new();
        command("NEW person:1 name 'John' age 75")
            .unwrap()
            .exec(store.clone())
            .unwrap();

        let cmd = command("UPD person:1 age 23").unwrap();
        assert_eq!(cmd.exec(store.clone()).unwrap(), Response::Applied);

        let record = store.get(1).unwrap();
        let data = record.data();
        assert_eq!(data.get("age"), Some(&Value::Integer(23)));
        assert_eq!(data.get("name"), Some(&Value::String("'John'".to_string())));
    }

    #[test]
    fn missing_record() {
        let store = Store::new();
        let cmd = command("UPD person:9 age 23").unwrap();
        assert_eq!(cmd.exec(store).unwrap(), Response::Unchanged);
    }

    #[test]
    fn rejects_missing_zero_and_range_ids() {
        for raw in ["UPD person age 23", "UPD person[2:5] age 23"] {
            let err = command(raw).unwrap_err();
            let err = err.downcast_ref::<CommandError>().unwrap();
            assert_eq!(*err, CommandError::InvalidId);
        }
    }
}
