//! Conversation handling.
//!
//! A transport hands each inbound message to [`Dialogue::receive`] and sends
//! back the returned [`Reply`]. Everything in between, from intent parsing to
//! route persistence, lives here.

mod intent;
mod machine;
mod reply;
mod sessions;
mod state;
mod templates;

pub use intent::{
    BACK, DONT_SAVE, FIND_SCHEDULE, GET_SCHEDULE, MAIN_MENU, MY_ROUTES, SAVE, delete_label,
    route_label,
};
pub use machine::{Dialogue, Transition};
pub use reply::{Keyboard, Reply};
pub use sessions::{SessionSlot, Sessions};
pub use state::DialogueState;
pub use templates::{NEXT_DAY_DISPLAY_LIMIT, RoutesTemplate, ScheduleTemplate, TODAY_DISPLAY_LIMIT, render};
