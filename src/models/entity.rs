//! Entity (person or article) model.
//!
//! An entity is one input row: a mentor, a mentee, a paper, a reviewer or
//! a conference attendee. Entities are created once at ingestion and are
//! never mutated during matching.

use serde::{Deserialize, Serialize};

/// Stable identifier of an entity within its role (PersonID, PaperID).
pub type EntityId = u64;

/// How an entity attends the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attendance {
    /// Physically present at the venue.
    Onsite,
    /// Remote participation.
    Virtual,
}

/// A person or article taking part in a matching run.
///
/// Text fields are kept as an ordered list so the profile vectorizer can
/// concatenate them in a fixed order. Passing the same field twice
/// doubles its weight in term frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier within the entity's role.
    pub id: EntityId,
    /// Display name (used for fuzzy exclusion matching).
    pub name: String,
    /// Topical profile fields, in concatenation order. `None` = missing.
    pub profile_fields: Vec<Option<String>>,
    /// Location-related fields (career location, region), same convention.
    pub location_fields: Vec<Option<String>>,
    /// Institutions the entity belongs to.
    pub affiliations: Vec<String>,
    /// Academic seniority level (higher = more senior).
    pub seniority: Option<u8>,
    /// Offset from UTC in hours.
    pub utc_offset: Option<f64>,
    /// Onsite or virtual attendance.
    pub attendance: Option<Attendance>,
    /// Free-text names of people this entity asked not to be matched with.
    pub exclusion_requests: Vec<String>,
}

impl Entity {
    /// Creates an entity with the given ID and no attributes.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            name: String::new(),
            profile_fields: Vec::new(),
            location_fields: Vec::new(),
            affiliations: Vec::new(),
            seniority: None,
            utc_offset: None,
            attendance: None,
            exclusion_requests: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends a profile field.
    pub fn with_profile_field(mut self, field: impl Into<String>) -> Self {
        self.profile_fields.push(Some(field.into()));
        self
    }

    /// Appends a profile field that may be missing.
    pub fn with_optional_profile_field(mut self, field: Option<String>) -> Self {
        self.profile_fields.push(field);
        self
    }

    /// Appends a location field.
    pub fn with_location_field(mut self, field: impl Into<String>) -> Self {
        self.location_fields.push(Some(field.into()));
        self
    }

    /// Adds an affiliation.
    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliations.push(affiliation.into());
        self
    }

    /// Sets the seniority level.
    pub fn with_seniority(mut self, level: u8) -> Self {
        self.seniority = Some(level);
        self
    }

    /// Sets the UTC offset in hours.
    pub fn with_utc_offset(mut self, hours: f64) -> Self {
        self.utc_offset = Some(hours);
        self
    }

    /// Sets the attendance mode.
    pub fn with_attendance(mut self, attendance: Attendance) -> Self {
        self.attendance = Some(attendance);
        self
    }

    /// Adds a raw exclusion request (may list several comma-separated names).
    pub fn with_exclusion_request(mut self, request: impl Into<String>) -> Self {
        self.exclusion_requests.push(request.into());
        self
    }

    /// Profile fields as borrowed optional strings.
    pub fn profile_refs(&self) -> Vec<Option<&str>> {
        self.profile_fields.iter().map(|f| f.as_deref()).collect()
    }

    /// Location fields as borrowed optional strings.
    pub fn location_refs(&self) -> Vec<Option<&str>> {
        self.location_fields.iter().map(|f| f.as_deref()).collect()
    }

    /// Whether any location field carries text.
    pub fn has_location(&self) -> bool {
        self.location_fields
            .iter()
            .any(|f| f.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}
