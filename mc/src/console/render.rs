//! Text rendering for the console and demo

use colored::Colorize;

use crate::dashboard::DashboardView;
use crate::domain::{Alert, AlertStatus, Message, Role, Sender, Session, User};
use crate::events::CareEvent;

pub fn render_user(user: &User) -> String {
    let role = match user.role {
        Role::Student => "student".green(),
        Role::Counselor => "counselor".blue(),
        Role::Admin => "admin".magenta(),
    };
    let mut line = format!(
        "{:<12} {:<10} {:<20} id={} institution={}",
        user.username, role, user.name, user.id, user.institution_code
    );
    if let Some(specialization) = &user.specialization {
        line.push_str(&format!(" ({})", specialization));
    }
    if let (Some(usn), Some(section)) = (&user.usn, &user.section) {
        line.push_str(&format!(" usn={} section={}", usn, section));
    }
    line
}

pub fn render_alert(alert: &Alert) -> String {
    let status = match alert.status {
        AlertStatus::New => "NEW".red().bold(),
        AlertStatus::Acknowledged => "acknowledged".dimmed(),
    };
    format!(
        "{} [{}] {} ({}): {} at {}",
        alert.id.yellow(),
        status,
        alert.student_name,
        alert.student_id,
        alert.reason,
        alert.timestamp.format("%H:%M:%S")
    )
}

pub fn render_message(message: &Message) -> String {
    let who = match message.sender {
        Sender::Student => "Student".green(),
        Sender::Counselor => "Counselor".blue(),
    };
    format!("  [{}] {}: {}", message.timestamp.format("%H:%M:%S"), who, message.text)
}

pub fn render_transcript(session: &Session) -> String {
    let mut out = format!(
        "{} {} (student {}, counselor {})\n",
        "Session".bright_cyan(),
        session.session_id,
        session.student_id,
        session.counselor_id
    );
    for message in &session.messages {
        out.push_str(&render_message(message));
        out.push('\n');
    }
    out
}

pub fn render_view(view: &DashboardView, user: &User) -> String {
    let mut out = format!("{} {}\n", "Dashboard for".bright_cyan().bold(), user.name);
    match view {
        DashboardView::Student { live_session } => match live_session {
            Some(session) => {
                out.push_str(&format!("You are in a live session with counselor {}.\n", session.counselor_id));
                out.push_str(&render_transcript(session));
            }
            None => {
                if let Some(profile) = &user.profile {
                    out.push_str(&format!("Stress level: {}/10\n", profile.stress_level));
                    for (subject, marks) in &profile.internal_marks {
                        let attendance = profile.attendance.get(subject).copied().unwrap_or_default();
                        out.push_str(&format!("  {:<10} marks {:>3}  attendance {:>3}%\n", subject, marks, attendance));
                    }
                }
                out.push_str("No live session. Type `sos <reason>` if you need help now.\n");
            }
        },
        DashboardView::Counselor {
            live_session,
            new_alerts,
        } => {
            let count = if *new_alerts > 0 {
                new_alerts.to_string().red().bold()
            } else {
                new_alerts.to_string().normal()
            };
            out.push_str(&format!("New SOS alerts: {}\n", count));
            match live_session {
                Some(session) => out.push_str(&render_transcript(session)),
                None => out.push_str("No live session.\n"),
            }
        }
        DashboardView::Admin => {
            out.push_str("Administration overview. Sessions and alerts are handled by counselors.\n");
        }
    }
    out
}

/// Notification line for an event the user should see, if any
///
/// Users are not told about their own messages; alerts go to counselors.
pub fn render_event(event: &CareEvent, user: &User) -> Option<String> {
    if !event.concerns(&user.id) {
        return None;
    }
    match event {
        CareEvent::AlertRaised { alert } if user.role == Role::Counselor => {
            Some(format!("{} {}", "SOS!".red().bold(), render_alert(alert)))
        }
        CareEvent::AlertAcknowledged { alert_id, student_id } if user.id == *student_id => {
            Some(format!("{} Your alert {} was seen by a counselor", "*".green(), alert_id))
        }
        CareEvent::SessionStarted {
            session_id,
            counselor_id,
            ..
        } if user.id != *counselor_id => Some(format!("{} Session {} started", "*".green(), session_id)),
        CareEvent::MessageAppended {
            student_id, message, ..
        } => {
            let own = if user.id == *student_id {
                Sender::Student
            } else {
                Sender::Counselor
            };
            (message.sender != own).then(|| render_message(message))
        }
        CareEvent::SessionEnded { session_id, .. } => {
            Some(format!("{} Session {} ended", "*".yellow(), session_id))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserDirectory;
    use crate::domain::DEFAULT_GREETING;

    fn user(username: &str) -> User {
        colored::control::set_override(false);
        UserDirectory::seeded().find_by_username(username).cloned().unwrap()
    }

    #[test]
    fn test_alert_raised_only_for_counselors() {
        let alert = Alert::new("3", "John Doe", "Panic");
        let event = CareEvent::AlertRaised { alert };

        assert!(render_event(&event, &user("counselor1")).unwrap().contains("John Doe"));
        assert!(render_event(&event, &user("student1")).is_none());
        assert!(render_event(&event, &user("admin")).is_none());
    }

    #[test]
    fn test_own_messages_are_not_echoed() {
        let event = CareEvent::MessageAppended {
            session_id: "sess-1".to_string(),
            student_id: "3".to_string(),
            counselor_id: "counselor-1".to_string(),
            message: Message::new(Sender::Student, "I'm anxious"),
        };

        assert!(render_event(&event, &user("student1")).is_none());
        let line = render_event(&event, &user("counselor1")).unwrap();
        assert!(line.contains("Student: I'm anxious"));
        // Not a participant
        assert!(render_event(&event, &user("counselor2")).is_none());
    }

    #[test]
    fn test_render_views() {
        let student = user("student1");
        let view = DashboardView::Student { live_session: None };
        let text = render_view(&view, &student);
        assert!(text.contains("Stress level: 6/10"));
        assert!(text.contains("sos <reason>"));

        let counselor = user("counselor1");
        let session = Session::new("sess-1", "3", "counselor-1", DEFAULT_GREETING, 1);
        let view = DashboardView::Counselor {
            live_session: Some(session),
            new_alerts: 2,
        };
        let text = render_view(&view, &counselor);
        assert!(text.contains("New SOS alerts: 2"));
        assert!(text.contains(DEFAULT_GREETING));
    }
}
