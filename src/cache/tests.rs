use crate::cache::request::{parse_line, Command};
use crate::cache::response::{encode_line, Response};
use crate::cache::ProtocolError;

fn parse(line: &str) -> Result<Command, ProtocolError> {
    parse_line(line).expect("line should not be blank")
}

#[test]
fn test_parse_set_keeps_value_whitespace() {
    let command = parse("SET greeting hello   big world").unwrap();

    assert_eq!(
        command,
        Command::Set {
            key: "greeting".into(),
            value: "hello   big world".into(),
        }
    );
}

#[test]
fn test_parse_keyword_is_case_insensitive() {
    assert_eq!(
        parse("get MyKey\r\n").unwrap(),
        Command::Get {
            key: "MyKey".into()
        }
    );
    assert_eq!(parse("Quit").unwrap(), Command::Quit);
    assert_eq!(parse("help").unwrap(), Command::Help);
    assert_eq!(
        parse("dEl k extra").unwrap(),
        Command::Del { key: "k".into() }
    );
}

#[test]
fn test_parse_blank_lines() {
    assert!(parse_line("").is_none());
    assert!(parse_line("\r\n").is_none());
    assert!(parse_line(" \t ").is_none());
}

#[test]
fn test_parse_missing_arguments() {
    assert_eq!(parse("GET"), Err(ProtocolError::MissingKey));
    assert_eq!(parse("DEL   "), Err(ProtocolError::MissingKey));
    assert_eq!(parse("SET onlykey"), Err(ProtocolError::SetUsage));
    assert_eq!(parse("SET"), Err(ProtocolError::SetUsage));
    assert_eq!(parse("FOO bar"), Err(ProtocolError::UnknownCommand));
}

#[test]
fn test_echo_preserves_payload() {
    assert_eq!(
        parse("ECHO a b  c").unwrap(),
        Command::Echo {
            text: "a b  c".into()
        }
    );
    assert_eq!(
        parse("echo").unwrap(),
        Command::Echo {
            text: String::new()
        }
    );
    // Only one separator is consumed after the keyword.
    assert_eq!(
        parse("ECHO  indented").unwrap(),
        Command::Echo {
            text: " indented".into()
        }
    );
}

#[test]
fn test_response_lines() {
    assert_eq!(Response::Ok.to_string(), "OK");
    assert_eq!(Response::Value("v 1".into()).to_string(), "OK v 1");
    assert_eq!(Response::NotFound.to_string(), "NOTFOUND");
    assert_eq!(Response::Bye.to_string(), "BYE");
    assert_eq!(
        Response::from(ProtocolError::SetUsage).to_string(),
        "ERR usage: SET key value"
    );
}

#[test]
fn test_encode_line_terminates_once() {
    assert_eq!(encode_line("OK"), "OK\r\n");
    assert_eq!(encode_line("OK\r\n"), "OK\r\n");
    assert_eq!(encode_line(""), "\r\n");
}

#[test]
fn test_set_value_keeps_leading_whitespace() {
    assert_eq!(
        parse("SET k  x").unwrap(),
        Command::Set {
            key: "k".into(),
            value: " x".into(),
        }
    );
    assert_eq!(
        parse("SET   k\tv").unwrap(),
        Command::Set {
            key: "k".into(),
            value: "v".into(),
        }
    );
}
