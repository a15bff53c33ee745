//! The dialogue state machine.
//!
//! `Dialogue::handle` is a function of (state, text, user, now) returning the
//! next state and the reply. It never touches transport framing; the only
//! side effects are external lookups and route store mutations.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, info, warn};

use crate::cache::CacheConfig;
use crate::domain::{Route, Station, UserId};
use crate::schedule::{FetcherConfig, ScheduleFetcher, ScheduleSource};
use crate::stations::{ResolveError, StationDirectory, StationResolver, popular_names};
use crate::store::{RouteError, RouteStore};

use super::intent::{
    BACK, Command, DONT_SAVE, FIND_SCHEDULE, GET_SCHEDULE, MAIN_MENU, MY_ROUTES, MainIntent,
    ManageIntent, SAVE, SaveIntent, delete_label, find_route_named, is_back, parse_command,
    parse_main, parse_manage, parse_save, route_label,
};
use super::reply::{Keyboard, Reply};
use super::sessions::Sessions;
use super::state::DialogueState;
use super::templates::{RoutesTemplate, ScheduleTemplate, render};

const STATION_NOT_FOUND: &str = "❌ Station not found. Try again:";
const FETCH_FAILED: &str = "❌ Could not get the schedule. Please try again later.";
const NO_TRAINS: &str = "❌ No trains found for today or tomorrow.";

/// Outcome of handling one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: DialogueState,
    pub reply: Reply,
}

impl Transition {
    fn new(state: DialogueState, reply: Reply) -> Self {
        Self { state, reply }
    }
}

/// Drives conversations for all users.
///
/// Generic over the station directory and the schedule source so tests can
/// substitute in-memory fakes.
pub struct Dialogue<D, S> {
    resolver: StationResolver<D>,
    fetcher: ScheduleFetcher<S>,
    store: Arc<RouteStore>,
    sessions: Sessions,
}

impl<D, S> Dialogue<D, S> {
    /// The route store this dialogue writes to.
    pub fn store(&self) -> &RouteStore {
        &self.store
    }
}

impl<D: StationDirectory, S: ScheduleSource> Dialogue<D, S> {
    pub fn new(
        directory: D,
        schedules: S,
        store: Arc<RouteStore>,
        cache_config: &CacheConfig,
        fetcher_config: FetcherConfig,
    ) -> Self {
        Self {
            resolver: StationResolver::new(directory, cache_config),
            fetcher: ScheduleFetcher::new(schedules, fetcher_config),
            store,
            sessions: Sessions::new(),
        }
    }

    /// Handle a message against the user's stored session.
    ///
    /// The user's session stays locked until the reply is ready, so a user's
    /// messages are processed one at a time, in arrival order. The stored
    /// state is only replaced once handling completes, so an abandoned call
    /// leaves the previous state in place. Sessions that come to rest are
    /// released.
    pub async fn receive(&self, user: UserId, text: &str, now: DateTime<FixedOffset>) -> Transition {
        let transition = {
            let slot = self.sessions.slot(user);
            let mut session = slot.lock().await;

            let transition = self.handle(user, session.clone(), text, now).await;
            *session = transition.state.clone();
            transition
        };

        if transition.state.is_resting() {
            self.sessions.release(user);
        }

        transition
    }

    /// Compute the next state and reply for one message.
    pub async fn handle(
        &self,
        user: UserId,
        state: DialogueState,
        text: &str,
        now: DateTime<FixedOffset>,
    ) -> Transition {
        let from = state.name();

        let transition = match parse_command(text) {
            Some(Command::Start) => self.start(user),
            Some(Command::Cancel) => cancel(user),
            None => match state {
                DialogueState::SelectingAction => self.on_main_menu(user, text, now).await,
                DialogueState::ChoosingOrigin => self.on_origin(user, text).await,
                DialogueState::ChoosingDestination { origin } => {
                    self.on_destination(user, origin, text, now).await
                }
                DialogueState::ConfirmingSave {
                    origin,
                    destination,
                    awaiting_name,
                } => self.on_confirm_save(user, origin, destination, awaiting_name, text),
                DialogueState::ManagingRoutes => self.on_manage(user, text, now).await,
                DialogueState::Cancelled => Transition::new(
                    DialogueState::Cancelled,
                    Reply::text("Send /start to look up a schedule."),
                ),
            },
        };

        debug!(user = %user, from, to = transition.state.name(), "dialogue transition");
        transition
    }

    // ------------------------------------------------------------------------
    // State handlers
    // ------------------------------------------------------------------------

    fn start(&self, user: UserId) -> Transition {
        info!(user = %user, "conversation started");
        Transition::new(
            DialogueState::SelectingAction,
            Reply::new(
                "Hi! I look up commuter train schedules.\nChoose an action:",
                self.main_keyboard(user),
            ),
        )
    }

    async fn on_main_menu(&self, user: UserId, text: &str, now: DateTime<FixedOffset>) -> Transition {
        let routes = self.store.list(user);

        match parse_main(text, &routes) {
            MainIntent::Route(index) => {
                let schedule = self.route_schedule(&routes[index], now).await;
                Transition::new(
                    DialogueState::SelectingAction,
                    Reply::new(schedule, self.main_keyboard(user)),
                )
            }
            MainIntent::GetSchedule => ask_origin(),
            MainIntent::ManageRoutes => self.show_routes(user),
            MainIntent::Unknown => self.main_menu(user, "Please choose an action from the menu:"),
        }
    }

    async fn on_origin(&self, user: UserId, text: &str) -> Transition {
        if is_back(text) {
            return self.main_menu(user, "Choose an action:");
        }

        match self.resolve(text).await {
            Some(origin) => {
                let message = format!("📍 From: {}\nNow choose the arrival station:", origin.name);
                Transition::new(
                    DialogueState::ChoosingDestination { origin },
                    Reply::new(message, station_keyboard()),
                )
            }
            None => Transition::new(DialogueState::ChoosingOrigin, Reply::text(STATION_NOT_FOUND)),
        }
    }

    async fn on_destination(
        &self,
        user: UserId,
        origin: Station,
        text: &str,
        now: DateTime<FixedOffset>,
    ) -> Transition {
        if is_back(text) {
            return ask_origin();
        }

        let Some(destination) = self.resolve(text).await else {
            return Transition::new(
                DialogueState::ChoosingDestination { origin },
                Reply::text(STATION_NOT_FOUND),
            );
        };

        let schedule = self.schedule(&origin, &destination, now).await;

        if self.store.has_room(user) {
            Transition::new(
                DialogueState::ConfirmingSave {
                    origin,
                    destination,
                    awaiting_name: false,
                },
                Reply::new(
                    "Save this route to favorites?",
                    Keyboard::Buttons(vec![vec![SAVE.to_string(), DONT_SAVE.to_string()]]),
                )
                .preceded_by(schedule),
            )
        } else {
            let warning = format!(
                "You already have {} saved routes. Delete one under \"{}\" to save new ones.",
                self.store.max_routes(),
                MY_ROUTES
            );
            Transition::new(
                DialogueState::SelectingAction,
                Reply::new(warning, self.main_keyboard(user)).preceded_by(schedule),
            )
        }
    }

    fn on_confirm_save(
        &self,
        user: UserId,
        origin: Station,
        destination: Station,
        awaiting_name: bool,
        text: &str,
    ) -> Transition {
        if !awaiting_name {
            return match parse_save(text) {
                SaveIntent::Save => Transition::new(
                    DialogueState::ConfirmingSave {
                        origin,
                        destination,
                        awaiting_name: true,
                    },
                    Reply::new(
                        "Enter a name for this route (e.g. Home-Work):",
                        Keyboard::Remove,
                    ),
                ),
                SaveIntent::Decline => self.main_menu(user, "OK, not saved. Choose an action:"),
            };
        }

        let outcome = match self.store.add(user, text, origin.clone(), destination.clone()) {
            Ok(route) => format!("✅ Route \"{}\" saved!", route.name),
            Err(RouteError::EmptyName) => {
                return Transition::new(
                    DialogueState::ConfirmingSave {
                        origin,
                        destination,
                        awaiting_name: true,
                    },
                    Reply::text("The name can't be empty. Enter a name for this route:"),
                );
            }
            Err(RouteError::NameTooLong { max }) => {
                return Transition::new(
                    DialogueState::ConfirmingSave {
                        origin,
                        destination,
                        awaiting_name: true,
                    },
                    Reply::text(format!(
                        "That name is too long (max {max} characters). Try a shorter one:"
                    )),
                );
            }
            Err(RouteError::DuplicatePair { existing }) => {
                format!("ℹ️ This route is already saved as \"{existing}\".")
            }
            Err(RouteError::CapacityExceeded { limit }) => {
                format!("❌ You already have {limit} saved routes. Delete one to save a new route.")
            }
            Err(e @ RouteError::IndexOutOfRange { .. }) => {
                warn!(user = %user, error = %e, "unexpected route store error");
                "❌ Could not save the route.".to_string()
            }
        };

        self.main_menu(user, outcome)
    }

    async fn on_manage(&self, user: UserId, text: &str, now: DateTime<FixedOffset>) -> Transition {
        let routes = self.store.list(user);

        match parse_manage(text, &routes) {
            ManageIntent::MainMenu => self.main_menu(user, "Choose an action:"),
            ManageIntent::FindSchedule => ask_origin(),
            ManageIntent::Delete(name) => {
                let outcome = match find_route_named(&name, &routes) {
                    None => format!("There is no route named \"{name}\"."),
                    Some(index) => match self.store.delete(user, index) {
                        Ok(removed) => format!("🗑 Route \"{}\" deleted.", removed.name),
                        Err(e) => {
                            warn!(user = %user, error = %e, "route vanished before delete");
                            "That route no longer exists.".to_string()
                        }
                    },
                };
                self.show_routes(user).prepend(outcome)
            }
            ManageIntent::Route(index) => {
                let schedule = self.route_schedule(&routes[index], now).await;
                self.show_routes(user).prepend(schedule)
            }
            ManageIntent::Unknown => self
                .show_routes(user)
                .prepend("Please choose a route or an action from the menu:"),
        }
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Resolve a station, folding every failure into `None`.
    async fn resolve(&self, text: &str) -> Option<Station> {
        match self.resolver.resolve(text).await {
            Ok(station) => Some(station),
            Err(e @ ResolveError::NotFound(_)) => {
                debug!(error = %e, "station not resolved");
                None
            }
            Err(e @ ResolveError::Lookup(_)) => {
                warn!(error = %e, "station lookup failed, asking user to retry");
                None
            }
        }
    }

    /// Fetch and render the schedule for a pair.
    async fn schedule(
        &self,
        origin: &Station,
        destination: &Station,
        now: DateTime<FixedOffset>,
    ) -> String {
        match self.fetcher.fetch_upcoming(origin, destination, now).await {
            Ok(upcoming) if upcoming.is_empty() => NO_TRAINS.to_string(),
            Ok(upcoming) => render(&ScheduleTemplate::new(
                &origin.name,
                &destination.name,
                &upcoming,
                now,
            )),
            Err(_) => FETCH_FAILED.to_string(),
        }
    }

    async fn route_schedule(&self, route: &Route, now: DateTime<FixedOffset>) -> String {
        self.schedule(&route.origin, &route.destination, now).await
    }

    /// The route overview, or the empty state when nothing is saved.
    fn show_routes(&self, user: UserId) -> Transition {
        let routes = self.store.list(user);

        if routes.is_empty() {
            return Transition::new(
                DialogueState::ManagingRoutes,
                Reply::new(
                    "You have no saved routes yet. Find a schedule and save it.",
                    Keyboard::Buttons(vec![
                        vec![FIND_SCHEDULE.to_string()],
                        vec![MAIN_MENU.to_string()],
                    ]),
                ),
            );
        }

        let mut rows: Vec<Vec<String>> = routes
            .iter()
            .map(|r| vec![route_label(&r.name), delete_label(&r.name)])
            .collect();
        rows.push(vec![FIND_SCHEDULE.to_string(), MAIN_MENU.to_string()]);

        Transition::new(
            DialogueState::ManagingRoutes,
            Reply::new(
                render(&RoutesTemplate::new(&routes, self.store.max_routes())),
                Keyboard::Buttons(rows),
            ),
        )
    }

    /// Main menu: the two actions, then one button per saved route.
    fn main_keyboard(&self, user: UserId) -> Keyboard {
        let mut labels = vec![GET_SCHEDULE.to_string(), MY_ROUTES.to_string()];
        labels.extend(self.store.list(user).iter().map(|r| route_label(&r.name)));
        Keyboard::column(labels)
    }

    fn main_menu(&self, user: UserId, message: impl Into<String>) -> Transition {
        Transition::new(
            DialogueState::SelectingAction,
            Reply::new(message, self.main_keyboard(user)),
        )
    }
}

impl Transition {
    /// Put a message before the transition's reply.
    fn prepend(mut self, message: impl Into<String>) -> Self {
        self.reply = self.reply.preceded_by(message);
        self
    }
}

fn cancel(user: UserId) -> Transition {
    info!(user = %user, "conversation cancelled");
    Transition::new(
        DialogueState::Cancelled,
        Reply::new(
            "Goodbye! Send /start whenever you need a schedule.",
            Keyboard::Remove,
        ),
    )
}

fn ask_origin() -> Transition {
    Transition::new(
        DialogueState::ChoosingOrigin,
        Reply::new(
            "Choose the departure station from the list or type its name:",
            station_keyboard(),
        ),
    )
}

/// Popular stations plus a back button.
fn station_keyboard() -> Keyboard {
    Keyboard::column(popular_names().chain([BACK]))
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod machine_tests;
