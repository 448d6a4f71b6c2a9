use thiserror::Error as ThisError;

use crate::store::Data;
use crate::value::Value;

#[derive(Debug, ThisError, PartialEq)]
pub enum ParseError {
    #[error("Error parsing command: invalid command")]
    InvalidCommand,
    #[error("Error parsing entity: invalid entity")]
    InvalidEntity,
    #[error("Error parsing id: invalid id format")]
    InvalidId,
    #[error("Error parsing data: invalid data, different number of attributes and values")]
    UnbalancedData,
}

/// The id-addressing mode of a command: which records it targets.
///
/// `lower == upper == 0` means no id was given (match all), `lower == upper != 0`
/// means exactly that id, anything else is an inclusive range where a bound of
/// 0 leaves that side open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdAddress {
    pub lower: u64,
    pub upper: u64,
}

impl IdAddress {
    pub fn all() -> IdAddress {
        IdAddress { lower: 0, upper: 0 }
    }

    pub fn single(id: u64) -> IdAddress {
        IdAddress {
            lower: id,
            upper: id,
        }
    }

    pub fn is_all(&self) -> bool {
        self.lower == 0 && self.upper == 0
    }

    /// The target id, if this address names exactly one record.
    pub fn as_single(&self) -> Option<u64> {
        (self.lower == self.upper && self.lower != 0).then_some(self.lower)
    }
}

/// One parsed command line, before any dispatch-level validation.
///
/// The operation is upper-cased but deliberately not checked for membership
/// here; the dispatcher rejects unknown operations so that parsing stays
/// purely syntactic.
#[derive(Debug, PartialEq)]
pub struct ParsedCommand {
    pub operation: String,
    pub entity: String,
    pub id: IdAddress,
    pub data: Option<Data>,
}

pub fn parse(raw: &str) -> Result<ParsedCommand, ParseError> {
    let tokens = tokenize(raw);
    if tokens.len() < 2 {
        return Err(ParseError::InvalidCommand);
    }

    let operation = tokens[0].to_uppercase();
    let (entity, id) = parse_address(&tokens[1])?;
    let data = parse_data(&tokens[2..])?;

    Ok(ParsedCommand {
        operation,
        entity,
        id,
        data,
    })
}

/// Splits a command line on whitespace, keeping a quoted run (single or
/// double quotes, delimiters included) as one token even when it contains
/// internal whitespace. A quote character also terminates a bare run, and an
/// unterminated quote is dropped with scanning resuming after it.
fn tokenize(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '\'' || c == '"' {
            match chars[i + 1..].iter().position(|&x| x == c) {
                Some(end) => {
                    tokens.push(chars[i..=i + 1 + end].iter().collect());
                    i += end + 2;
                }
                None => i += 1,
            }
            continue;
        }
        let start = i;
        while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '\'' && chars[i] != '"' {
            i += 1;
        }
        tokens.push(chars[start..i].iter().collect());
    }

    tokens
}

/// Splits the entity token into a name and an id-address. Supported shapes:
/// `name`, `name:id`, `name[id]`, `name[lower:upper]` with either bound
/// optionally empty.
fn parse_address(token: &str) -> Result<(String, IdAddress), ParseError> {
    if let Some((name, body)) = token.split_once('[') {
        if name.is_empty() {
            return Err(ParseError::InvalidEntity);
        }
        let body = body.strip_suffix(']').unwrap_or(body);
        let bounds: Vec<&str> = body.split(':').collect();
        let id = match bounds[..] {
            [single] => {
                let id = parse_bound(single)?;
                IdAddress {
                    lower: id,
                    upper: id,
                }
            }
            [lower, upper] => IdAddress {
                lower: parse_bound(lower)?,
                upper: parse_bound(upper)?,
            },
            _ => return Err(ParseError::InvalidId),
        };
        return Ok((name.to_string(), id));
    }

    if let Some((name, rest)) = token.split_once(':') {
        if name.is_empty() {
            return Err(ParseError::InvalidEntity);
        }
        if rest.contains(':') {
            return Err(ParseError::InvalidId);
        }
        let id = parse_bound(rest)?;
        return Ok((name.to_string(), IdAddress::single(id)));
    }

    Ok((token.to_string(), IdAddress::all()))
}

fn parse_bound(bound: &str) -> Result<u64, ParseError> {
    if bound.is_empty() {
        return Ok(0);
    }
    match bound.parse::<u64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(ParseError::InvalidId),
    }
}

fn parse_data(tokens: &[String]) -> Result<Option<Data>, ParseError> {
    if tokens.is_empty() {
        return Ok(None);
    }
    if tokens.len() % 2 != 0 {
        return Err(ParseError::UnbalancedData);
    }

    let mut data = Data::new();
    for pair in tokens.chunks(2) {
        data.insert(pair[0].clone(), Value::infer(&pair[1]));
    }
    Ok(Some(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_attribute() {
        let cmd = parse("NEW cliente:1 name 'Mary'").unwrap();

        assert_eq!(cmd.operation, "NEW");
        assert_eq!(cmd.entity, "cliente");
        assert_eq!(cmd.id, IdAddress::single(1));

        let data = cmd.data.unwrap();
        assert_eq!(data.get("name"), Some(&Value::String("'Mary'".to_string())));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn no_data_yields_none() {
        let cmd = parse("DEL cliente:1").unwrap();

        assert_eq!(cmd.operation, "DEL");
        assert_eq!(cmd.entity, "cliente");
        assert_eq!(cmd.id, IdAddress::single(1));
        assert_eq!(cmd.data, None);
    }

    #[test]
    fn multiple_typed_attributes() {
        let cmd = parse("NEW cliente:1 name 'John Tobias' age 18 vip true score 75.8").unwrap();

        let data = cmd.data.unwrap();
        assert_eq!(
            data.get("name"),
            Some(&Value::String("'John Tobias'".to_string()))
        );
        assert_eq!(data.get("age"), Some(&Value::Integer(18)));
        assert_eq!(data.get("vip"), Some(&Value::Boolean(true)));
        assert_eq!(data.get("score"), Some(&Value::Float(75.8)));
    }

    #[test]
    fn operation_is_uppercased_but_not_validated() {
        let cmd = parse("froboz cliente:1").unwrap();
        assert_eq!(cmd.operation, "FROBOZ");
    }

    #[test]
    fn bare_entity_matches_all() {
        let cmd = parse("GET cliente").unwrap();
        assert_eq!(cmd.entity, "cliente");
        assert!(cmd.id.is_all());
    }

    #[test]
    fn bracket_range_bounds() {
        let cmd = parse("GET cliente[2:7]").unwrap();
        assert_eq!(cmd.id, IdAddress { lower: 2, upper: 7 });
    }

    #[test]
    fn bracket_open_bounds() {
        assert_eq!(
            parse("GET cliente[:7]").unwrap().id,
            IdAddress { lower: 0, upper: 7 }
        );
        assert_eq!(
            parse("GET cliente[2:]").unwrap().id,
            IdAddress { lower: 2, upper: 0 }
        );
        assert!(parse("GET cliente[:]").unwrap().id.is_all());
    }

    #[test]
    fn bracket_single_id() {
        assert_eq!(parse("GET cliente[4]").unwrap().id, IdAddress::single(4));
        assert!(parse("GET cliente[]").unwrap().id.is_all());
    }

    #[test]
    fn empty_colon_id_matches_all() {
        assert!(parse("GET cliente:").unwrap().id.is_all());
    }

    #[test]
    fn too_few_tokens() {
        assert_eq!(parse("GET").unwrap_err(), ParseError::InvalidCommand);
        assert_eq!(parse("").unwrap_err(), ParseError::InvalidCommand);
        assert_eq!(parse("   ").unwrap_err(), ParseError::InvalidCommand);
    }

    #[test]
    fn empty_entity_name() {
        assert_eq!(parse("GET :1").unwrap_err(), ParseError::InvalidEntity);
        assert_eq!(parse("GET [1:2]").unwrap_err(), ParseError::InvalidEntity);
    }

    #[test]
    fn malformed_bounds_are_errors() {
        assert_eq!(parse("GET cliente:x").unwrap_err(), ParseError::InvalidId);
        assert_eq!(parse("GET cliente:0").unwrap_err(), ParseError::InvalidId);
        assert_eq!(parse("GET cliente:-3").unwrap_err(), ParseError::InvalidId);
        assert_eq!(parse("GET cliente[x:2]").unwrap_err(), ParseError::InvalidId);
        assert_eq!(parse("GET cliente[2:y]").unwrap_err(), ParseError::InvalidId);
        assert_eq!(
            parse("GET cliente[1:2:3]").unwrap_err(),
            ParseError::InvalidId
        );
        assert_eq!(parse("GET cliente:1:2").unwrap_err(), ParseError::InvalidId);
    }

    #[test]
    fn odd_data_tokens() {
        assert_eq!(
            parse("NEW cliente:1 name").unwrap_err(),
            ParseError::UnbalancedData
        );
        assert_eq!(
            parse("NEW cliente:1 name 'Mary' age").unwrap_err(),
            ParseError::UnbalancedData
        );
    }

    #[test]
    fn error_messages_carry_their_stage() {
        assert_eq!(
            parse("GET").unwrap_err().to_string(),
            "Error parsing command: invalid command"
        );
        assert_eq!(
            parse("GET cliente:x").unwrap_err().to_string(),
            "Error parsing id: invalid id format"
        );
    }

    #[test]
    fn tokenize_quoted_runs() {
        assert_eq!(
            tokenize("NEW car:1 name 'a fast car'"),
            vec!["NEW", "car:1", "name", "'a fast car'"]
        );
        assert_eq!(
            tokenize("NEW car:1 name \"a fast car\""),
            vec!["NEW", "car:1", "name", "\"a fast car\""]
        );
    }

    #[test]
    fn tokenize_quote_terminates_bare_run() {
        assert_eq!(tokenize("abc'def'"), vec!["abc", "'def'"]);
    }

    #[test]
    fn tokenize_drops_unterminated_quote() {
        assert_eq!(tokenize("name 'unterminated"), vec!["name", "unterminated"]);
    }
}
