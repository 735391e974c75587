//! Appointment slot composition and the multi-step booking form.
//!
//! ```rust
//! use std::sync::Arc;
//! use bizdesk_booking::{AppointmentSlotRequest, BookingOptions, SlotComposer};
//! use bizdesk_core::FixedClock;
//! use chrono::{NaiveDate, TimeZone, Utc};
//!
//! let now = Utc.with_ymd_and_hms(2025, 3, 10, 14, 0, 0).unwrap();
//! let composer = SlotComposer::new(BookingOptions::default(), Utc, Arc::new(FixedClock::new(now))).unwrap();
//!
//! let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
//! assert!(composer.to_submission_payload(&AppointmentSlotRequest::new(date, 9, 0)).is_err());
//!
//! let window = composer.to_submission_payload(&AppointmentSlotRequest::new(date, 15, 0)).unwrap();
//! assert_eq!(window.duration_minutes(), 60);
//! ```

pub mod error;
pub mod form;
pub mod options;
pub mod slot;

pub use error::{ValidationError, ValidationKind};
pub use form::{
    is_section_complete, AppointmentDraft, BookingFields, BookingForm, ClientContact, FormField, FormSection,
};
pub use options::{
    BookingOptions, BookingOptionsBuilder, DEFAULT_DURATION_MINUTES, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES,
};
pub use slot::{
    is_date_disabled, validate_duration, validate_not_past, AppointmentSlotRequest, AppointmentTimeWindow,
    SlotComposer, PAST_TIME_MESSAGE,
};
