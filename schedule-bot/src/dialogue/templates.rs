//! Askama templates for schedule and route-list messages.

use askama::Template;
use chrono::{DateTime, FixedOffset};
use tracing::error;

use crate::domain::{Route, Segment};
use crate::schedule::Upcoming;

/// Trips shown for today before summarizing the rest.
pub const TODAY_DISPLAY_LIMIT: usize = 10;

/// Trips shown for the next-day fallback.
pub const NEXT_DAY_DISPLAY_LIMIT: usize = 5;

// ============================================================================
// Message Templates
// ============================================================================

/// Schedule message for one origin/destination pair.
#[derive(Template)]
#[template(path = "schedule.txt")]
pub struct ScheduleTemplate {
    pub heading: &'static str,
    pub origin: String,
    pub destination: String,
    /// Service date, `dd.mm.yyyy`.
    pub date: String,
    pub trips: Vec<TripView>,
    /// Trips left out by the display cap.
    pub remaining: usize,
}

/// Saved-route overview.
#[derive(Template)]
#[template(path = "routes.txt")]
pub struct RoutesTemplate {
    pub routes: Vec<RouteView>,
    pub limit: usize,
}

// ============================================================================
// View Models
// ============================================================================

/// A trip formatted for display.
#[derive(Debug, Clone)]
pub struct TripView {
    pub departs: String,
    pub arrives: String,
    pub title: String,
    pub duration_mins: i64,
    /// Time until departure; only shown for today's trips.
    pub countdown: Option<String>,
}

impl TripView {
    fn from_segment(segment: &Segment, now: Option<DateTime<FixedOffset>>) -> Self {
        Self {
            departs: segment.departure.format("%H:%M").to_string(),
            arrives: segment.arrival.format("%H:%M").to_string(),
            title: segment.title.clone(),
            duration_mins: segment.duration_mins(),
            countdown: now.map(|now| segment.countdown(now).to_string()),
        }
    }
}

/// A saved route formatted for display.
#[derive(Debug, Clone)]
pub struct RouteView {
    pub name: String,
    pub origin: String,
    pub destination: String,
}

impl From<&Route> for RouteView {
    fn from(route: &Route) -> Self {
        Self {
            name: route.name.clone(),
            origin: route.origin.name.clone(),
            destination: route.destination.name.clone(),
        }
    }
}

impl ScheduleTemplate {
    /// Build the message for a non-empty `Upcoming`, applying the display caps.
    pub fn new(
        origin: &str,
        destination: &str,
        upcoming: &Upcoming,
        now: DateTime<FixedOffset>,
    ) -> Self {
        let (heading, limit, now) = if upcoming.is_next_day() {
            ("Tomorrow's trains", NEXT_DAY_DISPLAY_LIMIT, None)
        } else {
            ("Upcoming trains", TODAY_DISPLAY_LIMIT, Some(now))
        };

        let trips = upcoming
            .segments
            .iter()
            .take(limit)
            .map(|s| TripView::from_segment(s, now))
            .collect();

        // The next-day list is already short; only today's overflow is counted.
        let remaining = if upcoming.is_next_day() {
            0
        } else {
            upcoming.segments.len().saturating_sub(limit)
        };

        Self {
            heading,
            origin: origin.to_string(),
            destination: destination.to_string(),
            date: upcoming.date.format("%d.%m.%Y").to_string(),
            trips,
            remaining,
        }
    }
}

impl RoutesTemplate {
    pub fn new(routes: &[Route], limit: usize) -> Self {
        Self {
            routes: routes.iter().map(RouteView::from).collect(),
            limit,
        }
    }
}

/// Render a template to message text.
pub fn render<T: Template>(template: &T) -> String {
    match template.render() {
        Ok(text) => text.trim_end().to_string(),
        Err(e) => {
            error!(error = %e, "template render failed");
            format!("Template error: {}", e)
        }
    }
}
