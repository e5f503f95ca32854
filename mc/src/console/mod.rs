//! Interactive terminal console
//!
//! A line-oriented front end over [`CareDesk`](crate::desk::CareDesk): log in
//! as one of the demo users, view the dashboard for that role, and drive
//! alerts and sessions. Notifications from the event bus are printed before
//! each prompt.

mod command;
mod render;
mod session;

pub use command::{ConsoleCommand, DEFAULT_INSTITUTION, ParseError, parse_command};
pub use render::{render_alert, render_event, render_message, render_transcript, render_user, render_view};
pub use session::Console;
