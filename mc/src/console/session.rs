//! Console session: the interactive read-eval loop

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, warn};

use crate::alerts::AckOutcome;
use crate::auth::{LoginStore, UserDirectory};
use crate::desk::CareDesk;
use crate::domain::User;
use crate::events::CareEvent;

use super::command::{ConsoleCommand, parse_command};
use super::render::{render_alert, render_event, render_transcript, render_user, render_view};

/// Interactive console bound to one desk
pub struct Console {
    desk: CareDesk,
    directory: UserDirectory,
    store: LoginStore,
    events: Receiver<CareEvent>,
    user: Option<User>,
}

impl Console {
    pub fn new(desk: CareDesk, directory: UserDirectory, store: LoginStore) -> Self {
        let events = desk.subscribe();
        Self {
            desk,
            directory,
            store,
            events,
            user: None,
        }
    }

    /// Run the console main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();
        self.restore_login();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            self.drain_events();

            let prompt = match &self.user {
                Some(user) => format!("{} {} ", user.username.bright_white(), ">".bright_green()),
                None => format!("{} ", ">".bright_green()),
            };

            match rl.readline(&prompt) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    match parse_command(input) {
                        Ok(ConsoleCommand::Quit) => break,
                        Ok(command) => {
                            if let Err(e) = self.execute(command).await {
                                println!("{} {}", "Error:".red(), e);
                            }
                        }
                        Err(e) => {
                            println!("{} {}", "?".yellow(), e);
                            println!("Type {} for available commands", "help".yellow());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "MindCare Console".bright_cyan().bold());
        println!("Type {} for help, {} to quit", "help".yellow(), "quit".yellow());
        println!();
    }

    fn restore_login(&mut self) {
        match self.store.load() {
            Ok(Some(user)) => {
                println!("Welcome back, {}", user.name.bright_white());
                self.user = Some(user);
            }
            Ok(None) => println!("Not logged in. Try {}", "login student1".yellow()),
            Err(e) => warn!(error = %e, "Failed to restore login"),
        }
    }

    /// Print notifications that arrived since the last prompt
    fn drain_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    if let Some(user) = &self.user
                        && let Some(line) = render_event(&event, user)
                    {
                        println!("{}", line);
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "drain_events: lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    fn current_user(&self) -> Result<User> {
        self.user
            .clone()
            .ok_or_else(|| eyre::eyre!("Not logged in. Use `login <username>`"))
    }

    async fn execute(&mut self, command: ConsoleCommand) -> Result<()> {
        debug!(?command, "execute: called");
        match command {
            ConsoleCommand::Login {
                username,
                institution_code,
            } => {
                if let Some(current) = self.user.take() {
                    self.desk.logout(&current).await?;
                }
                let user = self
                    .directory
                    .authenticate(&username, "", &institution_code)
                    .ok_or_else(|| eyre::eyre!("Invalid credentials for {}", username))?;
                self.store.save(&user)?;
                println!("Logged in as {} ({})", user.name.bright_white(), user.role);
                self.user = Some(user);
                // Drop notifications that predate this login
                self.events = self.desk.subscribe();
            }
            ConsoleCommand::Logout => {
                let user = self.current_user()?;
                let ended = self.desk.logout(&user).await?;
                for session in &ended {
                    println!("Ended session {}", session.session_id);
                }
                self.store.clear()?;
                self.user = None;
                println!("Logged out");
            }
            ConsoleCommand::Whoami => {
                let user = self.current_user()?;
                println!("{}", render_user(&user));
            }
            ConsoleCommand::View => {
                let user = self.current_user()?;
                let view = self.desk.dashboard(&user).await?;
                print!("{}", render_view(&view, &user));
            }
            ConsoleCommand::Users => {
                for user in self.directory.all() {
                    println!("{}", render_user(user));
                }
            }
            ConsoleCommand::Sos { reason } => {
                let user = self.current_user()?;
                let alert = self.desk.raise_sos(&user, &reason).await?;
                println!("{} Alert {} sent. A counselor will be with you shortly.", "SOS".red().bold(), alert.id);
            }
            ConsoleCommand::Alerts => {
                let user = self.current_user()?;
                let alerts = self.desk.alert_feed(&user).await?;
                if alerts.is_empty() {
                    println!("{}", "No alerts.".dimmed());
                }
                for alert in &alerts {
                    println!("{}", render_alert(alert));
                }
            }
            ConsoleCommand::Ack { alert_id } => {
                let user = self.current_user()?;
                match self.desk.acknowledge(&user, &alert_id).await? {
                    AckOutcome::Acknowledged => println!("Acknowledged {}", alert_id),
                    AckOutcome::AlreadyAcknowledged => println!("{} was already acknowledged", alert_id),
                    AckOutcome::NotFound => println!("{} No alert {}", "?".yellow(), alert_id),
                }
            }
            ConsoleCommand::Respond { alert_id } => {
                let user = self.current_user()?;
                let session = self.desk.respond_to_alert(&user, &alert_id).await?;
                print!("{}", render_transcript(&session));
            }
            ConsoleCommand::Start { session_id, student_id } => {
                let user = self.current_user()?;
                let session = self.desk.start_session(&user, &session_id, &student_id).await?;
                print!("{}", render_transcript(&session));
            }
            ConsoleCommand::Say { text } => {
                let user = self.current_user()?;
                self.desk.send(&user, &text).await?;
            }
            ConsoleCommand::Transcript => {
                let user = self.current_user()?;
                match self.desk.transcript(&user).await? {
                    Some(session) => print!("{}", render_transcript(&session)),
                    None => println!("{}", "No live session.".dimmed()),
                }
            }
            ConsoleCommand::End => {
                let user = self.current_user()?;
                match self.desk.end_session(&user).await? {
                    Some(session) => println!(
                        "Session {} ended after {} messages",
                        session.session_id,
                        session.messages.len()
                    ),
                    None => println!("{}", "No live session.".dimmed()),
                }
            }
            ConsoleCommand::Help => print_help(),
            ConsoleCommand::Quit => {}
        }
        Ok(())
    }
}

fn print_help() {
    println!();
    println!("{}", "Available Commands:".bright_cyan());
    println!("  {:34} Log in (institution defaults to EDU001)", "login <username> [code]".yellow());
    println!("  {:34} End your sessions and log out", "logout".yellow());
    println!("  {:34} Show the logged-in user", "whoami".yellow());
    println!("  {:34} Show your dashboard", "view".yellow());
    println!("  {:34} List demo accounts", "users".yellow());
    println!("  {:34} Raise an SOS alert (students)", "sos <reason>".yellow());
    println!("  {:34} List SOS alerts (counselors)", "alerts".yellow());
    println!("  {:34} Acknowledge an alert (counselors)", "ack <alert-id>".yellow());
    println!("  {:34} Acknowledge and open a session", "respond <alert-id>".yellow());
    println!("  {:34} Start a booked session", "start <session-id> <student-id>".yellow());
    println!("  {:34} Send a message in your session", "say <message>".yellow());
    println!("  {:34} Show your session transcript", "transcript".yellow());
    println!("  {:34} End your session", "end".yellow());
    println!("  {:34} Exit the console", "quit".yellow());
    println!();
    println!("Press Enter on an empty line to check for new messages.");
    println!();
}
