//! Calendar and member listings.

use famcal_core::FamilyEvent;
use famcal_providers::mock;
use famcal_service::DataOrigin;
use serde::Serialize;
use tracing::debug;

use crate::app::App;
use crate::cli::CalendarArgs;
use crate::commands::print_json;
use crate::error::ClientResult;
use crate::render;

/// JSON shape of the calendar listing.
#[derive(Debug, Serialize)]
struct CalendarListing<'a> {
    country: &'a str,
    origin: DataOrigin,
    events: Vec<FamilyEvent>,
}

/// Loads the calendar and prints the events selected by `args`.
pub async fn show(app: &App, args: &CalendarArgs, json: bool) -> ClientResult<()> {
    let listing = load(app, args).await;

    if json {
        return print_json(&listing);
    }

    if let Some(notice) = render::origin_notice(listing.origin, listing.country) {
        eprintln!("{}", notice);
    }
    println!("{}", render::events(&listing.events, &app.calendar().members()));
    Ok(())
}

async fn load<'a>(app: &'a App, args: &CalendarArgs) -> CalendarListing<'a> {
    let calendar = app.calendar();
    if let Some(previous) = calendar.last_update() {
        debug!(last_update = %previous, "previous calendar load");
    }
    let origin = calendar.load(app.country()).await;

    let mut events = if args.high_priority {
        calendar.high_priority()
    } else if let Some(member) = args.member.as_deref() {
        calendar.events_by_member(member)
    } else {
        calendar.view(args.filter)
    };
    events.retain(|e| args.filter.matches(e));

    CalendarListing {
        country: app.country(),
        origin,
        events,
    }
}

/// Prints the family members.
pub fn members(json: bool) -> ClientResult<()> {
    let members = mock::family_members()?;
    if json {
        print_json(&members)
    } else {
        println!("{}", render::members(&members));
        Ok(())
    }
}
