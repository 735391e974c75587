//! Booking configuration.

use std::ops::RangeInclusive;

use bizdesk_core::errors::{DeskError, DeskResult};
use bizdesk_core::DeskConfigSnapshot;
use serde::{Deserialize, Serialize};

pub const MIN_DURATION_MINUTES: u32 = 15;
pub const MAX_DURATION_MINUTES: u32 = 480;
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

const DEFAULT_OPEN_HOUR: u32 = 8;
const DEFAULT_CLOSE_HOUR: u32 = 20;
const DEFAULT_MINUTE_STEPS: [u32; 4] = [0, 15, 30, 45];
const DEFAULT_NOTES_MAX_LEN: usize = 1000;

/// Per-business booking rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingOptions {
    /// First bookable hour of the day.
    pub open_hour: u32,
    /// Last bookable hour of the day (inclusive).
    pub close_hour: u32,
    /// Allowed minute values, sorted and unique.
    pub minute_steps: Vec<u32>,
    /// Applied when a request leaves the duration empty.
    pub default_duration: u32,
    pub notes_max_len: usize,
}

impl Default for BookingOptions {
    fn default() -> Self {
        Self {
            open_hour: DEFAULT_OPEN_HOUR,
            close_hour: DEFAULT_CLOSE_HOUR,
            minute_steps: DEFAULT_MINUTE_STEPS.to_vec(),
            default_duration: DEFAULT_DURATION_MINUTES,
            notes_max_len: DEFAULT_NOTES_MAX_LEN,
        }
    }
}

impl BookingOptions {
    pub fn builder() -> BookingOptionsBuilder {
        BookingOptionsBuilder::new()
    }

    /// Read `booking.*` keys, falling back to defaults for absent keys.
    /// A present but unparseable value is an error, not a silent default.
    pub fn from_config(config: &DeskConfigSnapshot) -> DeskResult<Self> {
        let defaults = Self::default();
        let mut builder = Self::builder();

        builder = builder.open_hour(read_u32(config, "booking.open_hour")?.unwrap_or(defaults.open_hour));
        builder = builder.close_hour(read_u32(config, "booking.close_hour")?.unwrap_or(defaults.close_hour));
        builder = builder.default_duration(
            read_u32(config, "booking.default_duration")?.unwrap_or(defaults.default_duration),
        );

        if let Some(steps) = config.get_list("booking.minute_steps") {
            let parsed = steps
                .iter()
                .map(|s| {
                    s.parse::<u32>().map_err(|_| {
                        DeskError::bad_request(format!("booking.minute_steps: '{s}' is not a minute value"))
                            .into_anyhow()
                    })
                })
                .collect::<DeskResult<Vec<u32>>>()?;
            builder = builder.minute_steps(parsed);
        }

        if config.get("booking.notes_max_len").is_some() {
            let len = config.get_usize("booking.notes_max_len").ok_or_else(|| {
                DeskError::bad_request("booking.notes_max_len must be a non-negative integer").into_anyhow()
            })?;
            builder = builder.notes_max_len(len);
        }

        builder.build()
    }

    pub fn validate(&self) -> DeskResult<()> {
        if self.close_hour > 23 {
            bizdesk_core::bail_desk!(bad_request, "close_hour must be at most 23, got {}", self.close_hour);
        }
        if self.open_hour > self.close_hour {
            bizdesk_core::bail_desk!(
                bad_request,
                "open_hour ({}) must not be after close_hour ({})",
                self.open_hour,
                self.close_hour
            );
        }
        if self.minute_steps.is_empty() {
            bizdesk_core::bail_desk!(bad_request, "minute_steps must list at least one minute value");
        }
        if let Some(bad) = self.minute_steps.iter().find(|m| **m >= 60) {
            bizdesk_core::bail_desk!(bad_request, "minute_steps values must be below 60, got {}", bad);
        }
        if self.minute_steps.windows(2).any(|w| w[0] >= w[1]) {
            bizdesk_core::bail_desk!(bad_request, "minute_steps must be sorted and unique");
        }
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&self.default_duration) {
            bizdesk_core::bail_desk!(
                bad_request,
                "default_duration must be between {} and {} minutes",
                MIN_DURATION_MINUTES,
                MAX_DURATION_MINUTES
            );
        }
        Ok(())
    }

    pub fn hours(&self) -> RangeInclusive<u32> {
        self.open_hour..=self.close_hour
    }
}

fn read_u32(config: &DeskConfigSnapshot, key: &str) -> DeskResult<Option<u32>> {
    match config.get(key) {
        None => Ok(None),
        Some(raw) => config
            .get_u32(key)
            .map(Some)
            .ok_or_else(|| DeskError::bad_request(format!("{key}: '{raw}' is not a valid number")).into_anyhow()),
    }
}

/// Builder for [`BookingOptions`].
#[derive(Clone, Debug, Default)]
pub struct BookingOptionsBuilder {
    options: BookingOptions,
}

impl BookingOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_hour(mut self, hour: u32) -> Self {
        self.options.open_hour = hour;
        self
    }

    pub fn close_hour(mut self, hour: u32) -> Self {
        self.options.close_hour = hour;
        self
    }

    /// Sorted and deduplicated on `build`.
    pub fn minute_steps(mut self, steps: impl IntoIterator<Item = u32>) -> Self {
        self.options.minute_steps = steps.into_iter().collect();
        self
    }

    pub fn default_duration(mut self, minutes: u32) -> Self {
        self.options.default_duration = minutes;
        self
    }

    pub fn notes_max_len(mut self, len: usize) -> Self {
        self.options.notes_max_len = len;
        self
    }

    pub fn build(mut self) -> DeskResult<BookingOptions> {
        self.options.minute_steps.sort_unstable();
        self.options.minute_steps.dedup();
        self.options.validate()?;
        Ok(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdesk_core::DeskConfig;

    #[test]
    fn defaults_match_the_standard_service_window() {
        let options = BookingOptions::from_config(&DeskConfig::new().snapshot()).unwrap();
        assert_eq!(options, BookingOptions::default());
        assert_eq!(options.hours(), 8..=20);
        assert_eq!(options.minute_steps, vec![0, 15, 30, 45]);
        assert_eq!(options.default_duration, 60);
    }

    #[test]
    fn config_keys_override_defaults() {
        let mut config = DeskConfig::new();
        config.set("booking.open_hour", "9");
        config.set("booking.close_hour", "17");
        config.set("booking.minute_steps", "30, 0, 30");
        config.set("booking.default_duration", "45");

        let options = BookingOptions::from_config(&config.snapshot()).unwrap();
        assert_eq!(options.hours(), 9..=17);
        assert_eq!(options.minute_steps, vec![0, 30]);
        assert_eq!(options.default_duration, 45);
    }

    #[test]
    fn inconsistent_options_are_rejected() {
        assert!(BookingOptions::builder().open_hour(18).close_hour(9).build().is_err());
        assert!(BookingOptions::builder().close_hour(24).build().is_err());
        assert!(BookingOptions::builder().minute_steps([0, 60]).build().is_err());
        assert!(BookingOptions::builder().minute_steps(Vec::new()).build().is_err());
        assert!(BookingOptions::builder().default_duration(10).build().is_err());
    }

    #[test]
    fn hand_built_options_must_be_normalized() {
        let unsorted = BookingOptions {
            minute_steps: vec![30, 0],
            ..BookingOptions::default()
        };
        assert!(unsorted.validate().is_err());

        let past_midnight = BookingOptions {
            close_hour: 24,
            ..BookingOptions::default()
        };
        let err = past_midnight.validate().unwrap_err();
        assert_eq!(DeskError::from_anyhow(&err).unwrap().code(), 400);
    }

    #[test]
    fn unparseable_values_are_errors() {
        let mut config = DeskConfig::new();
        config.set("booking.open_hour", "nine");
        let err = BookingOptions::from_config(&config.snapshot()).unwrap_err();
        let desk = DeskError::from_anyhow(&err).unwrap();
        assert_eq!(desk.code(), 400);
        assert!(desk.message.contains("booking.open_hour"));

        let mut config = DeskConfig::new();
        config.set("booking.minute_steps", "0,quarter");
        assert!(BookingOptions::from_config(&config.snapshot()).is_err());
    }
}
