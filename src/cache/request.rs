use super::error::ProtocolError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get { key: String },
    Set { key: String, value: String },
    Del { key: String },
    Echo { text: String },
    Help,
    Quit,
}

/// Decodes one request line.
///
/// Returns `None` for a blank line, which the session skips without
/// replying. The keyword is case-insensitive; arguments are kept verbatim.
pub fn parse_line(line: &str) -> Option<Result<Command, ProtocolError>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (keyword, remainder) = split_token(line);
    let command = match keyword.to_ascii_uppercase().as_str() {
        "GET" => parse_key(remainder).map(|key| Command::Get { key }),
        "DEL" => parse_key(remainder).map(|key| Command::Del { key }),
        "SET" => parse_set(remainder),
        "ECHO" => Ok(Command::Echo {
            text: echo_payload(line, keyword).to_string(),
        }),
        "HELP" => Ok(Command::Help),
        "QUIT" => Ok(Command::Quit),
        _ => Err(ProtocolError::UnknownCommand),
    };
    Some(command)
}

/// Splits off the first whitespace-delimited token. The remainder has its
/// leading separator removed but keeps any internal whitespace.
fn split_token(input: &str) -> (&str, &str) {
    match input.find(char::is_whitespace) {
        Some(end) => (&input[..end], input[end..].trim_start()),
        None => (input, ""),
    }
}

fn parse_key(remainder: &str) -> Result<String, ProtocolError> {
    let (key, _) = split_token(remainder);
    if key.is_empty() {
        return Err(ProtocolError::MissingKey);
    }
    Ok(key.to_string())
}

// The value is everything after the key and a single separator, so leading
// whitespace in the value survives.
fn parse_set(remainder: &str) -> Result<Command, ProtocolError> {
    let end = remainder
        .find(char::is_whitespace)
        .ok_or(ProtocolError::SetUsage)?;
    let key = &remainder[..end];
    let value = skip_separator(&remainder[end..]);
    if key.is_empty() || value.is_empty() {
        return Err(ProtocolError::SetUsage);
    }
    Ok(Command::Set {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn echo_payload<'a>(line: &'a str, keyword: &str) -> &'a str {
    skip_separator(&line[keyword.len()..])
}

fn skip_separator(input: &str) -> &str {
    let mut chars = input.chars();
    match chars.next() {
        Some(_) => chars.as_str(),
        None => "",
    }
}
