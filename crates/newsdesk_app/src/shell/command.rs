/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// New full content of the search box.
    Query(String),
    Clear,
    /// Zero-based result index.
    Open(usize),
    Hover(Option<usize>),
    Dismiss,
    Login(String),
    Logout,
    Account,
    Help,
    Quit,
}

pub const HELP: &str = "\
Type to search. Commands:
  /open N      open result N
  /hover N     preview result N (no N clears)
  /clear       clear the search box
  /dismiss     close the results dropdown
  /login TOKEN store a credential
  /logout      forget the credential
  /account     open the protected account view
  /quit        exit";

pub fn parse(line: &str) -> Result<Command, String> {
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Ok(Command::Query(line.to_string()));
    };
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    match name {
        "clear" => Ok(Command::Clear),
        "open" => row_number(arg).map(Command::Open),
        "hover" => match arg {
            None => Ok(Command::Hover(None)),
            Some(_) => row_number(arg).map(|index| Command::Hover(Some(index))),
        },
        "dismiss" => Ok(Command::Dismiss),
        "login" => match arg {
            Some(token) => Ok(Command::Login(token.to_string())),
            None => Err("usage: /login TOKEN".to_string()),
        },
        "logout" => Ok(Command::Logout),
        "account" => Ok(Command::Account),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command /{other}; try /help")),
    }
}

/// Rows are shown 1-based.
fn row_number(arg: Option<&str>) -> Result<usize, String> {
    match arg.map(str::parse::<usize>) {
        Some(Ok(n)) if n > 0 => Ok(n - 1),
        _ => Err("expected a result number, e.g. /open 1".to_string()),
    }
}
