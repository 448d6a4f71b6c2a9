use std::fmt;

/// A typed scalar stored under an attribute key. Wire literals are untyped;
/// `Value::infer` decides which variant a token becomes, and `Display` turns
/// the variant back into its wire form.
///
/// Quoted strings keep their quote delimiters as part of the stored text, so
/// serialization writes them back verbatim without re-quoting.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

impl Value {
    /// Infers a typed value from one wire token.
    ///
    /// Tried in order: single-quoted string (stored verbatim, delimiters
    /// included), case-insensitive boolean, base-10 integer, float. Anything
    /// left over is a bare word and gets wrapped in single quotes so it
    /// serializes the same way a quoted string does.
    pub fn infer(token: &str) -> Value {
        if token.starts_with('\'') {
            return Value::String(token.to_string());
        }
        if token.eq_ignore_ascii_case("true") {
            return Value::Boolean(true);
        }
        if token.eq_ignore_ascii_case("false") {
            return Value::Boolean(false);
        }
        if let Ok(integer) = token.parse::<i64>() {
            return Value::Integer(integer);
        }
        if let Ok(float) = token.parse::<f64>() {
            return Value::Float(float);
        }
        Value::String(format!("'{}'", token))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            // The default f64 formatting is the shortest representation that
            // round-trips, without scientific notation. 75.80 prints as 75.8.
            Value::Float(x) => write!(f, "{}", x),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => f.write_str(s),
        }
    }
}
