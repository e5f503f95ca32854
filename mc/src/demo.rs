//! Scripted walkthrough of the SOS flow
//!
//! A student raises an SOS, a counselor responds, both chat (with a simulated
//! student reply), and the counselor ends the session.

use std::time::Duration;

use colored::Colorize;
use eyre::{Result, eyre};
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, info};

use crate::auth::UserDirectory;
use crate::config::Config;
use crate::console::{DEFAULT_INSTITUTION, render_alert, render_transcript, render_view};
use crate::desk::CareDesk;
use crate::domain::User;

/// Run the walkthrough; `fast` shortens pauses and reply delays
pub async fn run_demo(config: &Config, fast: bool) -> Result<()> {
    debug!(fast, "run_demo: called");
    let mut config = config.clone();
    if fast {
        config.replies.min_delay_ms = 50;
        config.replies.max_delay_ms = 100;
    }
    let pause = if fast {
        Duration::from_millis(50)
    } else {
        Duration::from_millis(800)
    };

    let directory = UserDirectory::seeded();
    let student = login(&directory, "student1")?;
    let counselor = login(&directory, "counselor1")?;

    let desk = CareDesk::start(&config);
    let mut events = desk.subscribe();

    step(1, &format!("{} raises an SOS", student.name));
    let alert = desk
        .raise_sos(&student, "I can't stop panicking before my exam")
        .await?;
    println!("{}", render_alert(&alert));
    tokio::time::sleep(pause).await;

    step(2, &format!("{} opens the counselor dashboard", counselor.name));
    print!("{}", render_view(&desk.dashboard(&counselor).await?, &counselor));
    tokio::time::sleep(pause).await;

    step(3, "The counselor responds to the alert");
    let session = desk.respond_to_alert(&counselor, &alert.id).await?;
    println!("Session {} is live", session.session_id.bright_white());
    for alert in desk.alert_feed(&counselor).await? {
        println!("{}", render_alert(&alert));
    }
    tokio::time::sleep(pause).await;

    step(4, "They talk");
    desk.send(&student, "Thank you. My chest feels tight and I can't focus.").await?;
    tokio::time::sleep(pause).await;
    desk.send(&counselor, "Let's slow down together. Breathe in for four counts.")
        .await?;
    println!("{}", "Waiting for the student to reply...".dimmed());
    tokio::time::sleep(config.replies.max_delay() + pause).await;
    if let Some(session) = desk.transcript(&student).await? {
        print!("{}", render_transcript(&session));
    }

    step(5, "The counselor ends the session");
    match desk.end_session(&counselor).await? {
        Some(session) => println!(
            "Session {} ended with {} messages",
            session.session_id,
            session.messages.len()
        ),
        None => println!("{}", "The session had already ended".dimmed()),
    }
    print!("{}", render_view(&desk.dashboard(&student).await?, &student));

    let mut log = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => log.push(event.event_type()),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    println!();
    println!("{} {}", "Events:".bright_cyan(), log.join(", ").dimmed());

    desk.shutdown().await;
    info!(events = log.len(), "Demo finished");
    Ok(())
}

fn login(directory: &UserDirectory, username: &str) -> Result<User> {
    directory
        .authenticate(username, "demo", DEFAULT_INSTITUTION)
        .ok_or_else(|| eyre!("Demo user {} is missing", username))
}

fn step(n: usize, title: &str) {
    println!();
    println!("{} {}", format!("[{}]", n).bright_cyan().bold(), title.bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fast_demo_completes() {
        run_demo(&Config::default(), true).await.unwrap();
    }
}
