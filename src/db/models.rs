//! Domain models for the growbook store.
//!
//! These models are storage-agnostic value types. A store hands out owned
//! copies and keeps no reference to what it returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{DbResult, StoreError};
use crate::db::utils::{format_timestamp, now, parse_timestamp};

/// Store-assigned identity. `0` means the record has not been persisted yet.
pub type Id = i64;

/// A seed breeder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Breeder {
    pub id: Id,
    /// Unique within the store.
    pub name: String,
    #[serde(default)]
    pub homepage: String,
}

impl Breeder {
    pub fn new(name: impl Into<String>, homepage: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            homepage: homepage.into(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    /// Reject breeders that may not be stored. The name must not be blank.
    pub fn validate(&self) -> DbResult<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::other("Breeder name must not be empty"));
        }
        Ok(())
    }
}

/// A strain offered by a breeder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Strain {
    pub id: Id,
    pub breeder_id: Id,
    /// Filled in on read, ignored on write.
    #[serde(default)]
    pub breeder_name: String,
    /// Unique within the breeder.
    pub name: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub homepage: String,
    /// Reference into the external seedfinder catalog.
    #[serde(default)]
    pub seedfinder: String,
}

impl Strain {
    pub fn new(breeder_id: Id, name: impl Into<String>) -> Self {
        Self {
            breeder_id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}

/// A grow, from germination to harvest.
///
/// State is derived from the timestamps: a growlog is ongoing while
/// `finished_on` is unset and flowering once `flower_on` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Growlog {
    pub id: Id,
    /// Unique within the store.
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_on: DateTime<Utc>,
    #[serde(default)]
    pub flower_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_on: Option<DateTime<Utc>>,
}

impl Growlog {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            created_on: now(),
            flower_on: None,
            finished_on: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    pub fn is_ongoing(&self) -> bool {
        self.finished_on.is_none()
    }

    pub fn is_finished(&self) -> bool {
        self.finished_on.is_some()
    }

    pub fn is_flowering(&self) -> bool {
        self.flower_on.is_some()
    }

    pub fn set_flower_on(&mut self, flower_on: Option<DateTime<Utc>>) {
        self.flower_on = flower_on;
    }

    pub fn set_finished_on(&mut self, finished_on: Option<DateTime<Utc>>) {
        self.finished_on = finished_on;
    }

    pub fn created_on_format(&self, fmt: &str) -> String {
        format_timestamp(&self.created_on, fmt)
    }

    /// Formatted flowering date, or an empty string while not flowering.
    pub fn flower_on_format(&self, fmt: &str) -> String {
        self.flower_on
            .as_ref()
            .map(|ts| format_timestamp(ts, fmt))
            .unwrap_or_default()
    }

    /// Formatted finishing date, or an empty string while ongoing.
    pub fn finished_on_format(&self, fmt: &str) -> String {
        self.finished_on
            .as_ref()
            .map(|ts| format_timestamp(ts, fmt))
            .unwrap_or_default()
    }

    /// Parse a timestamp previously produced by one of the `*_format` methods.
    pub fn parse_timestamp(text: &str, fmt: &str) -> DbResult<DateTime<Utc>> {
        parse_timestamp(text, fmt)
    }
}

/// A dated note in a growlog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowlogEntry {
    pub id: Id,
    pub growlog_id: Id,
    pub text: String,
    pub created_on: DateTime<Utc>,
}

impl GrowlogEntry {
    pub fn new(growlog_id: Id, text: impl Into<String>) -> Self {
        Self {
            id: 0,
            growlog_id,
            text: text.into(),
            created_on: now(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    pub fn created_on_format(&self, fmt: &str) -> String {
        format_timestamp(&self.created_on, fmt)
    }
}
