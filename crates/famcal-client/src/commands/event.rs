//! Family event editing.

use famcal_core::{EventDraft, EventPatch, FamilyEvent};
use famcal_providers::mock;
use famcal_service::ServiceError;

use crate::app::App;
use crate::commands::print_json;
use crate::error::{ClientError, ClientResult};
use crate::render;

/// Creates an event from `draft` and prints it.
pub fn add(app: &App, draft: EventDraft, json: bool) -> ClientResult<()> {
    let event = app.calendar().create_event(draft)?;
    print_event("Created", &event, json)
}

/// Applies `patch` to the event `id` and prints the result.
pub fn update(app: &App, id: &str, patch: EventPatch, json: bool) -> ClientResult<()> {
    if patch == EventPatch::default() {
        return Err(ClientError::Usage("nothing to update".to_string()));
    }
    let event = app.calendar().update_event(id, patch)?;
    print_event("Updated", &event, json)
}

/// Deletes the event `id`.
pub fn delete(app: &App, id: &str) -> ClientResult<()> {
    if !app.calendar().delete_event(id)? {
        return Err(ServiceError::not_found(id).into());
    }
    println!("Deleted {}", id);
    Ok(())
}

fn print_event(verb: &str, event: &FamilyEvent, json: bool) -> ClientResult<()> {
    if json {
        return print_json(event);
    }
    let members = mock::family_members().unwrap_or_default();
    println!("{}: {}", verb, render::events(std::slice::from_ref(event), &members));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use famcal_service::{KeyValueStore, MemoryStore};

    use crate::config::ClientConfig;

    fn app() -> (App, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let app = App::with_store(ClientConfig::default(), store.clone());
        (app, store)
    }

    #[test]
    fn add_then_delete() {
        let (app, store) = app();
        add(&app, EventDraft::new("Dentist", "2025-04-21"), false).unwrap();

        let saved: Vec<FamilyEvent> =
            serde_json::from_str(&store.get("family_events").unwrap().unwrap()).unwrap();
        let created = saved.iter().find(|e| e.title == "Dentist").unwrap();
        let id = created.id.clone().unwrap();
        assert!(id.starts_with("evt_"));

        delete(&app, &id).unwrap();
        let err = delete(&app, &id).unwrap_err();
        assert!(matches!(err, ClientError::Service(ServiceError::NotFound { .. })));
    }

    #[test]
    fn invalid_draft_is_rejected_before_writing() {
        let (app, store) = app();
        let err = add(&app, EventDraft::new("  ", "2025-04-21"), false).unwrap_err();
        assert!(matches!(err, ClientError::Service(ServiceError::Validation(_))));
        assert!(store.get("family_events").unwrap().is_none());
    }

    #[test]
    fn empty_patch_is_a_usage_error() {
        let (app, _) = app();
        let err = update(&app, "evt_1", EventPatch::default(), false).unwrap_err();
        assert!(matches!(err, ClientError::Usage(_)));
    }

    #[test]
    fn holiday_events_cannot_be_deleted() {
        let (app, _) = app();
        let err = delete(&app, "holiday_2025-05-01").unwrap_err();
        assert!(matches!(
            err,
            ClientError::Service(ServiceError::HolidayEventImmutable { .. })
        ));
    }
}
