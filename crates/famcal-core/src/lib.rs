//! Core types: holidays, family events, members, validation, tracing

pub mod event;
pub mod holiday;
pub mod member;
pub mod time;
pub mod tracing;

pub use event::{
    EVENT_ID_PREFIX, EventDraft, EventFilter, EventPatch, FamilyEvent, HOLIDAY_ID_PREFIX, Priority,
    UNTITLED, ValidationError,
};
pub use holiday::{classify_holiday, HolidayKind, HolidayRecord, Weekday};
pub use member::FamilyMember;
pub use time::{EventTime, EventTimeParseError};
pub use tracing::{
    init_tracing, init_tracing_with_layer, BoxedLayer, TracingConfig, TracingError,
    TracingOutputFormat,
};
