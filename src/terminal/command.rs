use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Go(String),
    Login {
        email: String,
        password: String,
    },
    Ask(String),
    ToggleChat,
    Logout,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseCommandError {
    message: String,
}

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseCommandError {}

fn usage(message: &str) -> ParseCommandError {
    ParseCommandError { message: message.to_string() }
}

impl Command {
    /// `None` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Command>, ParseCommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "show" | "map" => Command::Show,
            "go" | "open" => {
                if rest.is_empty() {
                    return Err(usage("usage: go <path>"));
                }
                Command::Go(rest.to_string())
            }
            "login" => {
                let mut parts = rest.split_whitespace();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(email), Some(password), None) =>
                        Command::Login {
                            email: email.to_string(),
                            password: password.to_string(),
                        },
                    _ => {
                        return Err(usage("usage: login <email> <password>"));
                    }
                }
            }
            // Blank questions still reach the widget, which owns that rule.
            "ask" => Command::Ask(rest.to_string()),
            "chat" => Command::ToggleChat,
            "logout" => Command::Logout,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(ParseCommandError {
                    message: format!("unknown command '{}', try 'help'", other),
                });
            }
        };
        Ok(Some(command))
    }
}

pub const HELP: &[(&str, &str)] = &[
    ("go <path>", "open /, /login, /citizen or /hospital"),
    ("login <email> <password>", "sign in from the login page"),
    ("ask <question>", "talk to the assistant on this page"),
    ("chat", "open or close the wellness chat on the landing page"),
    ("show", "redraw the current page"),
    ("logout", "sign out from a dashboard"),
    ("quit", "leave"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("go /citizen").unwrap(), Some(Command::Go("/citizen".into())));
        assert_eq!(
            Command::parse("login citizen@manuals 1234").unwrap(),
            Some(Command::Login { email: "citizen@manuals".into(), password: "1234".into() })
        );
        assert_eq!(
            Command::parse("ask  why do I feel tired?").unwrap(),
            Some(Command::Ask("why do I feel tired?".into()))
        );
        assert_eq!(Command::parse("ask").unwrap(), Some(Command::Ask(String::new())));
        assert_eq!(Command::parse("EXIT").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn malformed_commands_explain_themselves() {
        assert!(Command::parse("login only-email").unwrap_err().to_string().contains("usage"));
        assert!(Command::parse("go").is_err());
        assert!(Command::parse("dance").unwrap_err().to_string().contains("dance"));
    }
}
