//! Appointment slot composition.
//!
//! Turns a calendar date, an hour, a quantized minute and a duration into an
//! absolute time window. Availability against other bookings is the booking
//! backend's job; this layer only guarantees structural and temporal
//! validity of the requested window.

use std::ops::RangeInclusive;
use std::sync::Arc;

use bizdesk_core::errors::DeskResult;
use bizdesk_core::Clock;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationKind};
use crate::options::{BookingOptions, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};

pub const PAST_TIME_MESSAGE: &str = "Cannot schedule appointments in the past";

/// `false` iff `instant` is strictly before `now`.
pub fn validate_not_past<Tz: TimeZone>(instant: &DateTime<Tz>, now: &DateTime<Utc>) -> bool {
    instant.with_timezone(&Utc) >= *now
}

/// Whether `minutes` is a bookable duration (15 to 480 inclusive).
pub fn validate_duration(minutes: u32) -> bool {
    (MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes)
}

fn duration_error() -> ValidationError {
    ValidationError::field(
        ValidationKind::InvalidDuration,
        "duration",
        format!(
            "Duration must be between {} and {} minutes",
            MIN_DURATION_MINUTES, MAX_DURATION_MINUTES
        ),
    )
}

/// Picker-level check: a date is disabled when it falls before today in the
/// business time zone. Any time later today keeps today enabled.
pub fn is_date_disabled<Tz: TimeZone>(date: NaiveDate, now: &DateTime<Utc>, tz: &Tz) -> bool {
    date < now.with_timezone(tz).date_naive()
}

/// The in-progress scheduling input of one booking form session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentSlotRequest {
    pub date: NaiveDate,
    pub hour: u32,
    pub minute: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

impl AppointmentSlotRequest {
    pub fn new(date: NaiveDate, hour: u32, minute: u32) -> Self {
        Self {
            date,
            hour,
            minute,
            duration_minutes: None,
        }
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }
}

/// Submission-ready window: absolute start plus duration.
///
/// Only produced by [`SlotComposer::to_submission_payload`] or by
/// deserializing a record whose duration is bookable and whose end is a
/// representable instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowRecord")]
pub struct AppointmentTimeWindow {
    start: DateTime<Utc>,
    duration_minutes: u32,
    #[serde(skip_serializing)]
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct WindowRecord {
    start: DateTime<Utc>,
    duration_minutes: u32,
}

impl TryFrom<WindowRecord> for AppointmentTimeWindow {
    type Error = ValidationError;

    fn try_from(record: WindowRecord) -> Result<Self, Self::Error> {
        Self::try_new(record.start, record.duration_minutes)
    }
}

impl AppointmentTimeWindow {
    fn try_new(start: DateTime<Utc>, duration_minutes: u32) -> Result<Self, ValidationError> {
        if !validate_duration(duration_minutes) {
            return Err(duration_error());
        }
        let end = start
            .checked_add_signed(Duration::minutes(i64::from(duration_minutes)))
            .ok_or_else(|| {
                ValidationError::field(
                    ValidationKind::InvalidTime,
                    "date",
                    "This appointment would end after the last supported date",
                )
            })?;
        Ok(Self {
            start,
            duration_minutes,
            end,
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn start_in<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        self.start.with_timezone(tz)
    }
}

/// Composes and validates slots for one business.
#[derive(Clone)]
pub struct SlotComposer<Tz: TimeZone> {
    options: BookingOptions,
    tz: Tz,
    clock: Arc<dyn Clock>,
}

impl<Tz: TimeZone> SlotComposer<Tz> {
    /// Fails with `BadRequest` when `options` do not pass
    /// [`BookingOptions::validate`].
    pub fn new(options: BookingOptions, tz: Tz, clock: Arc<dyn Clock>) -> DeskResult<Self> {
        options.validate()?;
        Ok(Self { options, tz, clock })
    }

    pub fn options(&self) -> &BookingOptions {
        &self.options
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Hours offered by the picker. Fixed by configuration.
    pub fn hour_options(&self) -> RangeInclusive<u32> {
        self.options.hours()
    }

    pub fn minute_options(&self) -> &[u32] {
        &self.options.minute_steps
    }

    pub fn check_hour(&self, hour: u32) -> Result<(), ValidationError> {
        if self.options.hours().contains(&hour) {
            Ok(())
        } else {
            Err(ValidationError::field(
                ValidationKind::InvalidTime,
                "hour",
                format!(
                    "Hour must be between {} and {}",
                    self.options.open_hour, self.options.close_hour
                ),
            ))
        }
    }

    /// Minutes are never rounded to the nearest step.
    pub fn check_minute(&self, minute: u32) -> Result<(), ValidationError> {
        if self.options.minute_steps.contains(&minute) {
            Ok(())
        } else {
            let steps = self
                .options
                .minute_steps
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Err(ValidationError::field(
                ValidationKind::InvalidTime,
                "minute",
                format!("Minute must be one of {steps}"),
            ))
        }
    }

    pub fn check_duration(&self, minutes: u32) -> Result<(), ValidationError> {
        if validate_duration(minutes) {
            Ok(())
        } else {
            Err(duration_error())
        }
    }

    /// Local `date` at `hour:minute:00.000` in the business time zone.
    ///
    /// A DST fold resolves to the earlier instant; a DST gap is `InvalidTime`.
    pub fn compose_instant(&self, date: NaiveDate, hour: u32, minute: u32) -> Result<DateTime<Tz>, ValidationError> {
        self.check_hour(hour)?;
        self.check_minute(minute)?;

        let naive = date.and_hms_opt(hour, minute, 0).ok_or_else(|| {
            ValidationError::field(ValidationKind::InvalidTime, "hour", "Invalid time of day")
        })?;

        self.tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
            ValidationError::field(
                ValidationKind::InvalidTime,
                "hour",
                "This time does not exist in the business time zone",
            )
        })
    }

    pub fn is_date_disabled(&self, date: NaiveDate) -> bool {
        is_date_disabled(date, &self.clock.now(), &self.tz)
    }

    /// Final check before handing the window to the booking backend, against
    /// the live clock. No side effects.
    pub fn to_submission_payload(&self, request: &AppointmentSlotRequest) -> Result<AppointmentTimeWindow, ValidationError> {
        let instant = self.compose_instant(request.date, request.hour, request.minute)?;

        if !validate_not_past(&instant, &self.clock.now()) {
            return Err(ValidationError::field(ValidationKind::InvalidTime, "hour", PAST_TIME_MESSAGE));
        }

        let duration = request.duration_minutes.unwrap_or(self.options.default_duration);
        self.check_duration(duration)?;

        AppointmentTimeWindow::try_new(instant.with_timezone(&Utc), duration)
    }
}
