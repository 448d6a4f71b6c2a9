use itertools::Itertools;
use std::fmt;

/// The wire response to one command. `Applied` and `Unchanged` are the
/// protocol's `1`/`0` acknowledgements; `Records` carries serialized record
/// lines joined by single newlines with no trailing newline; `Error` carries
/// a complete error line. The transport appends the trailing newline.
#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    Applied,
    Unchanged,
    Records(Vec<String>),
    Error(String),
}

impl Response {
    pub fn serialize(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Applied => f.write_str("1"),
            Response::Unchanged => f.write_str("0"),
            Response::Records(lines) => f.write_str(&lines.iter().join("\n")),
            Response::Error(line) => f.write_str(line),
        }
    }
}

impl From<Response> for Vec<u8> {
    fn from(response: Response) -> Self {
        response.serialize()
    }
}
