//! Domain types for the schedule assistant.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod route;
mod segment;
mod station;
mod time;

pub use route::{Route, UserId};
pub use segment::Segment;
pub use station::{InvalidStationId, Station, StationId};
pub use time::Countdown;
