//! Calendar orchestration.
//!
//! [`CalendarService`] composes the family members, the family events and
//! the holidays of the selected country into one calendar view, and owns
//! the create/update/delete operations on user events.
//!
//! Family events live in the durable store under `family_events`. Until the
//! first change is saved, the embedded sample events stand in for them.
//! Holiday events are never stored; they are rebuilt from the holiday batch
//! on every merge.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use famcal_core::{
    EVENT_ID_PREFIX, EventDraft, EventFilter, EventPatch, FamilyEvent, FamilyMember,
    HOLIDAY_ID_PREFIX, HolidayRecord, Priority,
};
use famcal_providers::mock;
use tracing::{debug, error, info, warn};

use crate::error::{ServiceError, ServiceResult, StoreError, StoreResult};
use crate::fetch::{DataOrigin, HolidayBatch, HolidayFetchService, normalize_country};
use crate::store::KeyValueStore;

/// Store key of the time the calendar was last loaded.
pub const LAST_UPDATE_KEY: &str = "lastUpdate";

/// Store key of the persisted family events.
pub const EVENTS_KEY: &str = "family_events";

#[derive(Debug, Default)]
struct CalendarState {
    country: String,
    members: Vec<FamilyMember>,
    events: Vec<FamilyEvent>,
    holidays: Vec<HolidayRecord>,
    origin: Option<DataOrigin>,
}

/// The family calendar.
pub struct CalendarService {
    fetcher: Arc<HolidayFetchService>,
    store: Arc<dyn KeyValueStore>,
    state: RwLock<CalendarState>,
}

impl CalendarService {
    /// Creates an empty calendar; call [`load`](Self::load) to populate it.
    pub fn new(fetcher: Arc<HolidayFetchService>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            fetcher,
            store,
            state: RwLock::new(CalendarState::default()),
        }
    }

    /// Returns the holiday fetch service.
    pub fn fetcher(&self) -> &Arc<HolidayFetchService> {
        &self.fetcher
    }

    /// Loads members, family events and the holidays of `country`, then
    /// records the load time.
    pub async fn load(&self, country: &str) -> DataOrigin {
        let batch = self.fetcher.fetch_tagged(country).await;
        let members = mock::family_members().unwrap_or_else(|e| {
            error!(error = %e, "failed to load family members");
            Vec::new()
        });
        let events = self.stored_events().unwrap_or_else(|e| {
            warn!(error = %e, "saved events unreadable, showing sample events");
            sample_events()
        });

        let origin = batch.origin;
        {
            let mut state = self.write_state();
            state.country = normalize_country(country);
            state.members = members;
            state.events = events;
            state.holidays = batch.records;
            state.origin = Some(origin);
        }

        if let Err(e) = self.store.set(LAST_UPDATE_KEY, &Utc::now().to_rfc3339()) {
            error!(error = %e, "failed to record last update");
        }

        info!(country = %normalize_country(country), origin = %origin, "calendar loaded");
        origin
    }

    /// Switches to another country's holidays, keeping members and events.
    pub async fn change_country(&self, country: &str) -> DataOrigin {
        let batch = self.fetcher.fetch_tagged(country).await;
        self.apply_holidays(country, batch)
    }

    /// Switches to the holidays of `country` for an explicit `year`.
    pub async fn change_year(&self, country: &str, year: i32) -> DataOrigin {
        let batch = self.fetcher.fetch_for_year(country, year).await;
        self.apply_holidays(country, batch)
    }

    fn apply_holidays(&self, country: &str, batch: HolidayBatch) -> DataOrigin {
        let mut state = self.write_state();
        state.country = normalize_country(country);
        state.holidays = batch.records;
        state.origin = Some(batch.origin);
        debug!(country = %state.country, origin = %batch.origin, "holidays replaced");
        batch.origin
    }

    /// Family events followed by holiday events, sorted by start.
    ///
    /// Events with the same start keep that order.
    pub fn all_events(&self) -> Vec<FamilyEvent> {
        let state = self.read_state();
        let mut merged: Vec<FamilyEvent> = state
            .events
            .iter()
            .cloned()
            .chain(state.holidays.iter().map(FamilyEvent::from_holiday))
            .collect();
        merged.sort_by_key(|event| event.start);
        merged
    }

    /// The merged events passing `filter`.
    pub fn view(&self, filter: EventFilter) -> Vec<FamilyEvent> {
        self.all_events()
            .into_iter()
            .filter(|event| filter.matches(event))
            .collect()
    }

    /// The merged events with high priority.
    pub fn high_priority(&self) -> Vec<FamilyEvent> {
        self.all_events()
            .into_iter()
            .filter(|event| event.priority == Priority::High)
            .collect()
    }

    /// The merged events assigned to `member_id`.
    pub fn events_by_member(&self, member_id: &str) -> Vec<FamilyEvent> {
        self.all_events()
            .into_iter()
            .filter(|event| event.is_assigned_to(member_id))
            .collect()
    }

    /// The loaded holidays falling in `month` (1-12).
    pub fn holidays_in_month(&self, month: u32) -> Vec<HolidayRecord> {
        self.read_state()
            .holidays
            .iter()
            .filter(|holiday| holiday.month_number() == month)
            .cloned()
            .collect()
    }

    /// The loaded holidays.
    pub fn holidays(&self) -> Vec<HolidayRecord> {
        self.read_state().holidays.clone()
    }

    /// The family members.
    pub fn members(&self) -> Vec<FamilyMember> {
        self.read_state().members.clone()
    }

    /// Origin of the loaded holidays, or `None` before the first load.
    pub fn origin(&self) -> Option<DataOrigin> {
        self.read_state().origin
    }

    /// The selected country code.
    pub fn country(&self) -> String {
        self.read_state().country.clone()
    }

    /// When the calendar was last loaded, across invocations.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        let raw = self.store.get(LAST_UPDATE_KEY).ok().flatten()?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }

    /// Validates and stores a new family event.
    ///
    /// Validation runs before anything is read or written.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for invalid input and
    /// [`ServiceError::Store`] if the saved events cannot be read or the
    /// event cannot be saved.
    pub fn create_event(&self, draft: EventDraft) -> ServiceResult<FamilyEvent> {
        let mut event = draft.into_event()?;

        let mut events = self.stored_events()?;
        let now = Utc::now();
        let mut millis = now.timestamp_millis();
        let id = loop {
            let candidate = format!("{}{}", EVENT_ID_PREFIX, millis);
            if !events.iter().any(|e| e.id.as_deref() == Some(candidate.as_str())) {
                break candidate;
            }
            millis += 1;
        };
        event.id = Some(id.clone());
        event.created_at = Some(now);

        events.push(event.clone());
        self.save_events(&events)?;
        self.write_state().events = events;

        info!(id = %id, title = %event.title, "created event");
        Ok(event)
    }

    /// Applies `patch` to the family event `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::HolidayEventImmutable`] for holiday events,
    /// [`ServiceError::NotFound`] for unknown ids, [`ServiceError::Validation`]
    /// if the result is invalid and [`ServiceError::Store`] if it cannot be
    /// saved.
    pub fn update_event(&self, id: &str, patch: EventPatch) -> ServiceResult<FamilyEvent> {
        if id.starts_with(HOLIDAY_ID_PREFIX) {
            return Err(ServiceError::holiday_event_immutable(id));
        }

        let mut events = self.stored_events()?;
        let index = events
            .iter()
            .position(|e| e.id.as_deref() == Some(id))
            .ok_or_else(|| ServiceError::not_found(id))?;

        let updated = patch.apply(&events[index])?;
        events[index] = updated.clone();
        self.save_events(&events)?;
        self.write_state().events = events;

        info!(id = %id, "updated event");
        Ok(updated)
    }

    /// Deletes the family event `id`. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::HolidayEventImmutable`] for holiday events and
    /// [`ServiceError::Store`] if the saved events cannot be read or the
    /// change cannot be saved.
    pub fn delete_event(&self, id: &str) -> ServiceResult<bool> {
        if id.starts_with(HOLIDAY_ID_PREFIX) {
            return Err(ServiceError::holiday_event_immutable(id));
        }

        let mut events = self.stored_events()?;
        let before = events.len();
        events.retain(|e| e.id.as_deref() != Some(id));
        if events.len() == before {
            debug!(id = %id, "no event to delete");
            return Ok(false);
        }

        self.save_events(&events)?;
        self.write_state().events = events;

        info!(id = %id, "deleted event");
        Ok(true)
    }

    /// The persisted family events, or the sample events if none are saved.
    ///
    /// A saved list that cannot be read or decoded is an error, so callers
    /// that write never replace it.
    fn stored_events(&self) -> StoreResult<Vec<FamilyEvent>> {
        match self.store.get(EVENTS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(sample_events()),
        }
    }

    fn save_events(&self, events: &[FamilyEvent]) -> Result<(), StoreError> {
        let json = serde_json::to_string(events)?;
        self.store.set(EVENTS_KEY, &json)
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, CalendarState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, CalendarState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn sample_events() -> Vec<FamilyEvent> {
    mock::family_events().unwrap_or_else(|e| {
        error!(error = %e, "failed to load sample events");
        Vec::new()
    })
}

impl std::fmt::Debug for CalendarService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarService")
            .field("state", &*self.read_state())
            .finish_non_exhaustive()
    }
}
