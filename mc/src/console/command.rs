//! Console command parsing

use thiserror::Error;

/// Institution code assumed when `login` is given only a username
pub const DEFAULT_INSTITUTION: &str = "EDU001";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Login { username: String, institution_code: String },
    Logout,
    Whoami,
    View,
    Users,
    Sos { reason: String },
    Alerts,
    Ack { alert_id: String },
    Respond { alert_id: String },
    Start { session_id: String, student_id: String },
    Say { text: String },
    Transcript,
    End,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// Parse one console line; the leading `/` is optional
pub fn parse_command(line: &str) -> Result<ConsoleCommand, ParseError> {
    let line = line.trim();
    let line = line.strip_prefix('/').unwrap_or(line);
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    match word.to_lowercase().as_str() {
        "login" => match args.as_slice() {
            [username] => Ok(ConsoleCommand::Login {
                username: username.to_string(),
                institution_code: DEFAULT_INSTITUTION.to_string(),
            }),
            [username, institution_code] => Ok(ConsoleCommand::Login {
                username: username.to_string(),
                institution_code: institution_code.to_string(),
            }),
            _ => Err(ParseError::Usage("login <username> [institution-code]")),
        },
        "logout" => Ok(ConsoleCommand::Logout),
        "whoami" => Ok(ConsoleCommand::Whoami),
        "view" | "dashboard" => Ok(ConsoleCommand::View),
        "users" => Ok(ConsoleCommand::Users),
        "sos" => {
            if rest.is_empty() {
                Err(ParseError::Usage("sos <reason>"))
            } else {
                Ok(ConsoleCommand::Sos { reason: rest.to_string() })
            }
        }
        "alerts" => Ok(ConsoleCommand::Alerts),
        "ack" => match args.as_slice() {
            [alert_id] => Ok(ConsoleCommand::Ack {
                alert_id: alert_id.to_string(),
            }),
            _ => Err(ParseError::Usage("ack <alert-id>")),
        },
        "respond" => match args.as_slice() {
            [alert_id] => Ok(ConsoleCommand::Respond {
                alert_id: alert_id.to_string(),
            }),
            _ => Err(ParseError::Usage("respond <alert-id>")),
        },
        "start" => match args.as_slice() {
            [session_id, student_id] => Ok(ConsoleCommand::Start {
                session_id: session_id.to_string(),
                student_id: student_id.to_string(),
            }),
            _ => Err(ParseError::Usage("start <session-id> <student-id>")),
        },
        "say" => {
            if rest.is_empty() {
                Err(ParseError::Usage("say <message>"))
            } else {
                Ok(ConsoleCommand::Say { text: rest.to_string() })
            }
        }
        "transcript" | "chat" => Ok(ConsoleCommand::Transcript),
        "end" => Ok(ConsoleCommand::End),
        "help" | "h" | "?" => Ok(ConsoleCommand::Help),
        "quit" | "q" | "exit" => Ok(ConsoleCommand::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}
