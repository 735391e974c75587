//! Multi-step booking form.
//!
//! Sections run Client -> Schedule -> Notes. Leaving a section forward
//! validates exactly that section's fields and is blocked while any of them
//! holds an error. Going back is always allowed.

use bizdesk_core::TenantContext;
use bizdesk_schema::SchemaErrors;
use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use crate::error::{ValidationError, ValidationKind};
use crate::slot::{AppointmentSlotRequest, AppointmentTimeWindow, SlotComposer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    ClientName,
    ClientEmail,
    ClientPhone,
    Service,
    Provider,
    Date,
    Hour,
    Minute,
    Duration,
    Notes,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::ClientName => "client_name",
            FormField::ClientEmail => "client_email",
            FormField::ClientPhone => "client_phone",
            FormField::Service => "service",
            FormField::Provider => "provider",
            FormField::Date => "date",
            FormField::Hour => "hour",
            FormField::Minute => "minute",
            FormField::Duration => "duration",
            FormField::Notes => "notes",
        }
    }

    pub fn section(&self) -> FormSection {
        match self {
            FormField::ClientName | FormField::ClientEmail | FormField::ClientPhone => FormSection::Client,
            FormField::Service
            | FormField::Provider
            | FormField::Date
            | FormField::Hour
            | FormField::Minute
            | FormField::Duration => FormSection::Schedule,
            FormField::Notes => FormSection::Notes,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormSection {
    Client,
    Schedule,
    Notes,
}

impl FormSection {
    pub const ORDER: [FormSection; 3] = [FormSection::Client, FormSection::Schedule, FormSection::Notes];

    pub fn fields(&self) -> &'static [FormField] {
        match self {
            FormSection::Client => &[FormField::ClientName, FormField::ClientEmail, FormField::ClientPhone],
            FormSection::Schedule => &[
                FormField::Service,
                FormField::Provider,
                FormField::Date,
                FormField::Hour,
                FormField::Minute,
                FormField::Duration,
            ],
            FormSection::Notes => &[FormField::Notes],
        }
    }

    pub fn next(&self) -> Option<FormSection> {
        match self {
            FormSection::Client => Some(FormSection::Schedule),
            FormSection::Schedule => Some(FormSection::Notes),
            FormSection::Notes => None,
        }
    }

    pub fn previous(&self) -> Option<FormSection> {
        match self {
            FormSection::Client => None,
            FormSection::Schedule => Some(FormSection::Client),
            FormSection::Notes => Some(FormSection::Schedule),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormSection::Client => "client",
            FormSection::Schedule => "schedule",
            FormSection::Notes => "notes",
        }
    }
}

/// True iff none of `fields` currently holds an error in `errors`.
pub fn is_section_complete(fields: &[FormField], errors: &SchemaErrors) -> bool {
    !fields.iter().any(|f| errors.has_field(f.as_str()))
}

/// Raw values as the user typed/picked them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookingFields {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub service_id: Option<String>,
    pub provider_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub duration_minutes: Option<u32>,
    pub notes: String,
}

#[derive(Debug, Validate)]
struct ClientDetails {
    #[validate(length(min = 1, message = "Client name is required"))]
    client_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    client_email: String,
    #[validate(custom(function = "validate_phone"))]
    client_phone: String,
}

fn validate_phone(phone: &str) -> Result<(), validator::ValidationError> {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'));
    let digits = phone.chars().filter(char::is_ascii_digit).count();

    if allowed && (7..=15).contains(&digits) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("phone");
        err.message = Some("Please enter a valid phone number".into());
        Err(err)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// What the booking backend receives on create.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub client: ClientContact,
    pub service_id: String,
    pub provider_id: String,
    pub window: AppointmentTimeWindow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One booking form session. Owned by a single UI form and never shared.
pub struct BookingForm<Tz: TimeZone> {
    tenant: TenantContext,
    composer: SlotComposer<Tz>,
    fields: BookingFields,
    errors: SchemaErrors,
    section: FormSection,
}

impl<Tz: TimeZone> BookingForm<Tz> {
    pub fn new(tenant: TenantContext, composer: SlotComposer<Tz>) -> Self {
        Self {
            tenant,
            composer,
            fields: BookingFields::default(),
            errors: SchemaErrors::new(),
            section: FormSection::Client,
        }
    }

    pub fn tenant(&self) -> &TenantContext {
        &self.tenant
    }

    pub fn composer(&self) -> &SlotComposer<Tz> {
        &self.composer
    }

    pub fn fields(&self) -> &BookingFields {
        &self.fields
    }

    pub fn errors(&self) -> &SchemaErrors {
        &self.errors
    }

    pub fn section(&self) -> FormSection {
        self.section
    }

    pub fn hour_options(&self) -> Vec<u32> {
        self.composer.hour_options().collect()
    }

    pub fn minute_options(&self) -> &[u32] {
        self.composer.minute_options()
    }

    pub fn is_section_complete(&self, section: FormSection) -> bool {
        is_section_complete(section.fields(), &self.errors)
    }

    // ---- edits: each clears the edited field's error ----

    pub fn set_client_name(&mut self, value: impl Into<String>) {
        self.fields.client_name = value.into();
        self.touch(FormField::ClientName);
    }

    pub fn set_client_email(&mut self, value: impl Into<String>) {
        self.fields.client_email = value.into();
        self.touch(FormField::ClientEmail);
    }

    pub fn set_client_phone(&mut self, value: impl Into<String>) {
        self.fields.client_phone = value.into();
        self.touch(FormField::ClientPhone);
    }

    pub fn set_service(&mut self, service_id: Option<String>) {
        self.fields.service_id = service_id;
        self.touch(FormField::Service);
    }

    pub fn set_provider(&mut self, provider_id: Option<String>) {
        self.fields.provider_id = provider_id;
        self.touch(FormField::Provider);
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.fields.date = date;
        self.touch(FormField::Date);
    }

    pub fn set_hour(&mut self, hour: Option<u32>) {
        self.fields.hour = hour;
        self.touch(FormField::Hour);
    }

    pub fn set_minute(&mut self, minute: Option<u32>) {
        self.fields.minute = minute;
        self.touch(FormField::Minute);
    }

    pub fn set_duration(&mut self, minutes: Option<u32>) {
        self.fields.duration_minutes = minutes;
        self.touch(FormField::Duration);
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.fields.notes = notes.into();
        self.touch(FormField::Notes);
    }

    fn touch(&mut self, field: FormField) {
        self.errors.clear_field(field.as_str());
    }

    // ---- validation ----

    /// Re-derive errors for `section`'s fields only. Returns completeness.
    pub fn validate_section(&mut self, section: FormSection) -> bool {
        for field in section.fields() {
            self.errors.clear_field(field.as_str());
        }
        let found = match section {
            FormSection::Client => self.client_errors(),
            FormSection::Schedule => self.schedule_errors(),
            FormSection::Notes => self.notes_errors(),
        };
        self.errors.merge(found);
        self.is_section_complete(section)
    }

    fn client_errors(&self) -> SchemaErrors {
        let details = ClientDetails {
            client_name: self.fields.client_name.trim().to_string(),
            client_email: self.fields.client_email.trim().to_string(),
            client_phone: self.fields.client_phone.trim().to_string(),
        };
        bizdesk_schema::check(&details)
    }

    fn schedule_errors(&self) -> SchemaErrors {
        let mut errors = SchemaErrors::new();
        let f = &self.fields;

        if f.service_id.as_deref().map_or(true, |s| s.trim().is_empty()) {
            errors.push_field(FormField::Service.as_str(), "Please select a service");
        }
        if f.provider_id.as_deref().map_or(true, |s| s.trim().is_empty()) {
            errors.push_field(FormField::Provider.as_str(), "Please select a provider");
        }

        match f.date {
            None => errors.push_field(FormField::Date.as_str(), "Please select a date"),
            Some(date) if self.composer.is_date_disabled(date) => {
                errors.push_field(FormField::Date.as_str(), "Date cannot be in the past")
            }
            Some(_) => {}
        }

        match f.hour {
            None => errors.push_field(FormField::Hour.as_str(), "Please select an hour"),
            Some(hour) => {
                if let Err(e) = self.composer.check_hour(hour) {
                    errors.merge(e.errors);
                }
            }
        }

        match f.minute {
            None => errors.push_field(FormField::Minute.as_str(), "Please select minutes"),
            Some(minute) => {
                if let Err(e) = self.composer.check_minute(minute) {
                    errors.merge(e.errors);
                }
            }
        }

        if let Some(duration) = f.duration_minutes {
            if let Err(e) = self.composer.check_duration(duration) {
                errors.merge(e.errors);
            }
        }

        errors
    }

    fn notes_errors(&self) -> SchemaErrors {
        let mut errors = SchemaErrors::new();
        let max = self.composer.options().notes_max_len;
        if self.fields.notes.chars().count() > max {
            errors.push_field(FormField::Notes.as_str(), format!("Notes must be at most {max} characters"));
        }
        errors
    }

    fn incomplete(&self, section: FormSection) -> ValidationError {
        let mut errors = self.errors.clone();
        let names: Vec<&str> = section.fields().iter().map(FormField::as_str).collect();
        errors.retain_fields(&names);
        ValidationError::new(
            ValidationKind::IncompleteSection,
            format!("Please complete the {} section before continuing", section.as_str()),
            errors,
        )
    }

    // ---- transitions ----

    /// Move to the next section if the current one validates. On the last
    /// section this only validates and stays put.
    pub fn advance(&mut self) -> Result<FormSection, ValidationError> {
        let from = self.section;
        if !self.validate_section(from) {
            debug!(tenant = %self.tenant.tenant_id, section = from.as_str(), "advance blocked");
            return Err(self.incomplete(from));
        }

        let Some(to) = from.next() else {
            return Ok(from);
        };
        self.section = to;
        debug!(tenant = %self.tenant.tenant_id, from = from.as_str(), to = to.as_str(), "section changed");
        Ok(to)
    }

    pub fn back(&mut self) -> FormSection {
        if let Some(prev) = self.section.previous() {
            debug!(tenant = %self.tenant.tenant_id, from = self.section.as_str(), to = prev.as_str(), "section changed");
            self.section = prev;
        }
        self.section
    }

    /// Tab click: any earlier section, or the next one through `advance`.
    pub fn go_to(&mut self, target: FormSection) -> Result<FormSection, ValidationError> {
        if target <= self.section {
            while self.section > target {
                self.back();
            }
            return Ok(self.section);
        }
        if Some(target) != self.section.next() {
            let skipped = self.section;
            return Err(ValidationError::new(
                ValidationKind::IncompleteSection,
                format!("Please complete the {} section before continuing", skipped.as_str()),
                SchemaErrors::new(),
            ));
        }
        self.advance()
    }

    /// Validate everything and build the payload for the booking backend.
    ///
    /// On failure the form stays editable: errors are populated and the
    /// form moves to the first section that needs attention.
    pub fn submit(&mut self) -> Result<AppointmentDraft, ValidationError> {
        let mut first_incomplete = None;
        for section in FormSection::ORDER {
            if !self.validate_section(section) && first_incomplete.is_none() {
                first_incomplete = Some(section);
            }
        }
        if let Some(section) = first_incomplete {
            self.section = section;
            debug!(tenant = %self.tenant.tenant_id, section = section.as_str(), "submit blocked");
            let mut err = self.incomplete(section);
            err.errors = self.errors.clone();
            return Err(err);
        }

        let (Some(service_id), Some(provider_id), Some(date), Some(hour), Some(minute)) = (
            self.fields.service_id.clone(),
            self.fields.provider_id.clone(),
            self.fields.date,
            self.fields.hour,
            self.fields.minute,
        ) else {
            // validate_section(Schedule) guarantees these are present
            return Err(self.incomplete(FormSection::Schedule));
        };

        let request = AppointmentSlotRequest {
            date,
            hour,
            minute,
            duration_minutes: self.fields.duration_minutes,
        };

        let window = match self.composer.to_submission_payload(&request) {
            Ok(window) => window,
            Err(err) => {
                self.errors.merge(err.errors.clone());
                self.section = FormSection::Schedule;
                debug!(tenant = %self.tenant.tenant_id, kind = err.kind.as_str(), "submit rejected: {}", err);
                return Err(err);
            }
        };

        let notes = self.fields.notes.trim();
        let draft = AppointmentDraft {
            client: ClientContact {
                name: self.fields.client_name.trim().to_string(),
                email: self.fields.client_email.trim().to_string(),
                phone: self.fields.client_phone.trim().to_string(),
            },
            service_id: service_id.trim().to_string(),
            provider_id: provider_id.trim().to_string(),
            window,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        };

        info!(
            tenant = %self.tenant.tenant_id,
            service = %draft.service_id,
            provider = %draft.provider_id,
            start = %draft.window.start(),
            duration = draft.window.duration_minutes(),
            "appointment ready for submission"
        );

        Ok(draft)
    }
}
