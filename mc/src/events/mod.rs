//! Event bus for cross-view state propagation
//!
//! Dashboards render independently of each other. Every registry mutation
//! emits a [`CareEvent`] on a shared [`EventBus`] so each view can refresh
//! without polling.
//!
//! ```text
//!   AlertRegistry      SessionRegistry
//!        │                   │
//!        └──────► EventBus ◄─┘
//!                    │
//!     ┌──────────────┼────────────────┐
//!     ▼              ▼                ▼
//!  student view  counselor view  ReplyScheduler
//! ```

mod bus;
mod types;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, EventBus};
pub use types::CareEvent;
