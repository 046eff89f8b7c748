//! Session lifecycle and countdown.
//!
//! - `timer`: the time-boxed `Session` and its `SessionStatus`
//! - `clock`: injectable monotonic time sources

mod clock;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use timer::{Session, SessionStatus};
