// --- File: crates/services/coachreserve_terminal/src/commands.rs ---
//! Parsing of the lines typed at the prompt.

use chrono::NaiveDate;
use coachreserve_common::models::OAuthProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    /// `go /booking`
    Go(String),
    Email(String),
    Password(String),
    Name(String),
    SignUp,
    SignIn,
    OAuth(OAuthProvider),
    /// URL the provider redirected the browser to.
    Callback(String),
    /// 1-based position in the displayed list.
    Club(usize),
    Coach(usize),
    Date(NaiveDate),
    Book(usize),
    SignOut,
    Back,
}

pub const HELP: &str = "\
go <path>              open /, /auth or /booking
email|password|name <value>
signup | signin        submit the auth form
oauth <google|facebook|apple>
callback <url>         finish an OAuth sign-in
club|coach <n>         pick from the list
date <YYYY-MM-DD>
book <n>               reserve the n-th slot
signout | back | help | quit";

fn index(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("expected a list number, got '{}'", arg)),
    }
}

fn required<'a>(name: &str, arg: &'a str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("'{}' needs a value", name))
    } else {
        Ok(arg)
    }
}

/// Parses one input line. Empty lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "go" => Command::Go(required(word, rest)?.to_string()),
        "email" => Command::Email(required(word, rest)?.to_string()),
        "password" => Command::Password(required(word, rest)?.to_string()),
        "name" => Command::Name(required(word, rest)?.to_string()),
        "signup" => Command::SignUp,
        "signin" => Command::SignIn,
        "oauth" => Command::OAuth(rest.parse().map_err(|e| format!("{}", e))?),
        "callback" => Command::Callback(required(word, rest)?.to_string()),
        "club" => Command::Club(index(rest)?),
        "coach" => Command::Coach(index(rest)?),
        "date" => Command::Date(
            NaiveDate::parse_from_str(rest, "%Y-%m-%d")
                .map_err(|_| format!("expected a date as YYYY-MM-DD, got '{}'", rest))?,
        ),
        "book" => Command::Book(index(rest)?),
        "signout" => Command::SignOut,
        "back" => Command::Back,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(command))
}
