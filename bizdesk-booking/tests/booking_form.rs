use std::sync::Arc;

use bizdesk_booking::{
    BookingForm, BookingOptions, FormField, FormSection, SlotComposer, ValidationKind, PAST_TIME_MESSAGE,
};
use bizdesk_core::errors::DeskError;
use bizdesk_core::{FixedClock, TenantContext};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn day(y: i32, mo: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, mo, d).unwrap()
}

fn form_at(now: DateTime<Utc>) -> BookingForm<Utc> {
    let composer = SlotComposer::new(BookingOptions::default(), Utc, Arc::new(FixedClock::new(now))).unwrap();
    BookingForm::new(TenantContext::new("bella-barbers"), composer)
}

fn fill_client(form: &mut BookingForm<Utc>) {
    form.set_client_name("Dana Reyes");
    form.set_client_email("dana@example.com");
    form.set_client_phone("+1 555 010 2030");
}

fn fill_schedule(form: &mut BookingForm<Utc>, date: NaiveDate, hour: u32, minute: u32) {
    form.set_service(Some("svc-haircut".into()));
    form.set_provider(Some("prov-ana".into()));
    form.set_date(Some(date));
    form.set_hour(Some(hour));
    form.set_minute(Some(minute));
}

#[test]
fn cannot_leave_client_section_with_errors() {
    let mut form = form_at(at(2025, 3, 10, 14, 0));
    form.set_client_name("Dana Reyes");
    form.set_client_email("not-an-email");

    let err = form.advance().unwrap_err();
    assert_eq!(err.kind, ValidationKind::IncompleteSection);
    assert_eq!(form.section(), FormSection::Client);

    assert!(form.errors().has_field("client_email"));
    assert!(form.errors().has_field("client_phone"));
    assert!(!form.errors().has_field("client_name"));
    // advancing only validated the client section
    assert!(!form.errors().has_field("service"));
    assert!(form.is_section_complete(FormSection::Schedule));
}

#[test]
fn editing_a_field_clears_its_error() {
    let mut form = form_at(at(2025, 3, 10, 14, 0));
    assert!(form.advance().is_err());
    assert!(form.errors().has_field(FormField::ClientName.as_str()));

    form.set_client_name("Dana");
    assert!(!form.errors().has_field(FormField::ClientName.as_str()));
    assert!(form.errors().has_field(FormField::ClientEmail.as_str()));
}

#[test]
fn client_errors_do_not_affect_schedule_completeness() {
    let mut form = form_at(at(2025, 3, 10, 14, 0));
    fill_client(&mut form);
    form.advance().unwrap();

    fill_schedule(&mut form, day(2025, 3, 11), 10, 0);
    form.set_client_phone("12");
    form.validate_section(FormSection::Client);

    assert!(!form.is_section_complete(FormSection::Client));
    assert!(form.validate_section(FormSection::Schedule));
}

#[test]
fn tabs_go_back_freely_but_forward_one_step() {
    let mut form = form_at(at(2025, 3, 10, 14, 0));
    assert!(form.go_to(FormSection::Notes).is_err());
    assert_eq!(form.section(), FormSection::Client);

    fill_client(&mut form);
    assert_eq!(form.go_to(FormSection::Schedule).unwrap(), FormSection::Schedule);
    assert_eq!(form.go_to(FormSection::Client).unwrap(), FormSection::Client);
    assert_eq!(form.back(), FormSection::Client);
}

#[test]
fn same_day_earlier_time_is_rejected_at_submit() {
    let mut form = form_at(at(2025, 3, 10, 14, 0));
    fill_client(&mut form);
    fill_schedule(&mut form, day(2025, 3, 10), 9, 0);

    // the date itself passes the picker-level check
    assert!(form.validate_section(FormSection::Schedule));

    let err = form.submit().unwrap_err();
    assert_eq!(err.kind, ValidationKind::InvalidTime);
    assert_eq!(form.section(), FormSection::Schedule);
    assert_eq!(form.errors().messages("hour"), vec![PAST_TIME_MESSAGE]);

    form.set_hour(Some(15));
    let draft = form.submit().unwrap();
    assert_eq!(draft.window.start(), at(2025, 3, 10, 15, 0));
    assert_eq!(draft.window.duration_minutes(), 60);
}

#[test]
fn past_dates_are_blocked_in_the_schedule_section() {
    let mut form = form_at(at(2025, 3, 10, 23, 0));
    fill_client(&mut form);
    fill_schedule(&mut form, day(2025, 3, 9), 10, 0);

    form.advance().unwrap();
    let err = form.advance().unwrap_err();
    assert_eq!(err.kind, ValidationKind::IncompleteSection);
    assert_eq!(err.errors.messages("date"), vec!["Date cannot be in the past"]);
}

#[test]
fn unquantized_minutes_and_bad_durations_block_the_schedule() {
    let mut form = form_at(at(2025, 3, 10, 8, 0));
    fill_client(&mut form);
    fill_schedule(&mut form, day(2025, 3, 12), 10, 20);
    form.set_duration(Some(500));

    assert!(!form.validate_section(FormSection::Schedule));
    assert!(form.errors().has_field("minute"));
    assert!(form.errors().has_field("duration"));

    form.set_minute(Some(15));
    form.set_duration(Some(30));
    assert!(form.validate_section(FormSection::Schedule));
}

#[test]
fn last_section_is_validated_on_advance() {
    let mut form = form_at(at(2025, 3, 10, 8, 0));
    fill_client(&mut form);
    form.advance().unwrap();
    fill_schedule(&mut form, day(2025, 3, 14), 10, 0);
    form.advance().unwrap();

    form.set_notes("x".repeat(1001));
    let err = form.advance().unwrap_err();
    assert_eq!(err.kind, ValidationKind::IncompleteSection);
    assert_eq!(form.section(), FormSection::Notes);
    assert_eq!(err.errors.messages("notes"), vec!["Notes must be at most 1000 characters"]);

    form.set_notes("Bring the blue folder");
    assert_eq!(form.advance().unwrap(), FormSection::Notes);
}

#[test]
fn submit_reports_every_incomplete_section() {
    let mut form = form_at(at(2025, 3, 10, 8, 0));
    form.set_notes("x".repeat(1001));

    let err = form.submit().unwrap_err();
    assert_eq!(err.kind, ValidationKind::IncompleteSection);
    assert_eq!(form.section(), FormSection::Client);
    assert!(err.errors.has_field("client_name"));
    assert!(err.errors.has_field("service"));
    assert!(err.errors.has_field("notes"));

    let desk: DeskError = err.into();
    assert_eq!(desk.code(), 422);
    let json = desk.to_json();
    assert_eq!(json["data"]["reason"], "incomplete_section");
    assert_eq!(json["errors"]["notes"][0], "Notes must be at most 1000 characters");
}

#[test]
fn successful_submission_builds_the_backend_payload() {
    let mut form = form_at(at(2025, 3, 10, 8, 0));
    fill_client(&mut form);
    form.advance().unwrap();
    fill_schedule(&mut form, day(2025, 3, 14), 16, 45);
    form.set_duration(Some(90));
    form.advance().unwrap();
    form.set_notes("  Prefers the window seat  ");

    let draft = form.submit().unwrap();
    assert_eq!(draft.client.email, "dana@example.com");
    assert_eq!(draft.service_id, "svc-haircut");
    assert_eq!(draft.notes.as_deref(), Some("Prefers the window seat"));
    assert_eq!(draft.window.end(), at(2025, 3, 14, 18, 15));

    let json = serde_json::to_value(&draft).unwrap();
    assert_eq!(json["window"]["duration_minutes"], 90);
    assert_eq!(json["provider_id"], "prov-ana");
}

#[test]
fn pickers_follow_configuration() {
    let options = BookingOptions::builder()
        .open_hour(9)
        .close_hour(12)
        .minute_steps([0, 30])
        .build()
        .unwrap();
    let composer = SlotComposer::new(options, Utc, Arc::new(FixedClock::new(at(2025, 3, 10, 8, 0)))).unwrap();
    let form = BookingForm::new(TenantContext::new("t"), composer);

    assert_eq!(form.hour_options(), vec![9, 10, 11, 12]);
    assert_eq!(form.minute_options(), &[0, 30]);
}
