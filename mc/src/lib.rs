//! MindCare - counseling session and SOS alert coordination
//!
//! The coordination core behind the student, counselor and admin dashboards
//! of a student wellness platform. Students raise SOS alerts; counselors
//! acknowledge them and hold one-to-one chat sessions with students.
//!
//! # Core Concepts
//!
//! - **Actors own state**: the alert and session registries are tokio tasks
//!   driven by command channels, so every operation runs to completion in order
//! - **Keyed sessions**: many sessions can be live at once, but each user is in
//!   at most one of them
//! - **Events, not polling**: every change is broadcast on the [`EventBus`]
//! - **Cancellable replies**: simulated replies die with their session
//!
//! # Modules
//!
//! - [`domain`] - Alert, session, message and user types
//! - [`alerts`] - SOS alert registry
//! - [`sessions`] - Counseling session registry
//! - [`events`] - Broadcast event bus
//! - [`replies`] - Delayed simulated replies
//! - [`dashboard`] - Role-based dashboard selection
//! - [`desk`] - Role-checked user actions over the registries
//! - [`auth`] - Mock user directory and saved login
//! - [`console`] - Interactive terminal front end
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod alerts;
pub mod auth;
pub mod cli;
pub mod config;
pub mod console;
pub mod dashboard;
pub mod demo;
pub mod desk;
pub mod domain;
pub mod events;
pub mod replies;
pub mod sessions;

// Re-export commonly used types
pub use alerts::{AckOutcome, AlertError, AlertRegistry};
pub use auth::{LoginStore, UserDirectory};
pub use config::Config;
pub use dashboard::{DashboardView, select_view};
pub use desk::{CareDesk, DeskError, DeskResult};
pub use domain::{Alert, AlertStatus, Message, Role, Sender, Session, User};
pub use events::{CareEvent, EventBus};
pub use replies::{CannedResponder, ReplyScheduler, Responder};
pub use sessions::{SessionError, SessionRegistry};
