//! Site domain model.
//!
//! # Responsibility
//! - Define the canonical archaeological site record and its create input.
//! - Validate create input before any store call is issued.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes.
//! - `created_at` is stamped once at creation and never mutated.
//! - Coordinates are explicit optionals; absence is never encoded as `(0, 0)`.
//! - A location with only one of latitude/longitude has no coordinates.

use crate::model::identity::IdentityId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned stable identifier for a site document.
pub type SiteId = String;

/// Lifecycle state of a site. Archiving replaces physical deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    #[default]
    Active,
    Inactive,
    Archived,
}

impl SiteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Archived => "archived",
        }
    }
}

/// Where a site is. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Degrees in `[-90, 90]`. Never NaN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Degrees in `[-180, 180]`. Never NaN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    /// Returns `(latitude, longitude)` only when both are known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// Canonical site record as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub status: SiteStatus,
    /// Unix epoch milliseconds.
    pub date_discovered: i64,
    /// Unix epoch milliseconds, store-assigned at creation.
    pub created_at: i64,
    #[serde(default = "IdentityId::anonymous")]
    pub created_by: IdentityId,
    /// Ids of artifacts owned by this site, in insertion order.
    #[serde(default)]
    pub artifacts: Vec<String>,
    /// Opaque media references. Nothing writes these yet.
    #[serde(default)]
    pub images: Vec<String>,
}

/// Create input for [`Site`].
///
/// Store-owned fields (`id`, `created_at`, `created_by`) are absent by
/// construction; the record store client stamps them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteDraft {
    pub name: String,
    pub description: String,
    pub location: Location,
    pub period: String,
    pub status: SiteStatus,
    /// Unix epoch milliseconds.
    pub date_discovered: i64,
}

impl SiteDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Validates required fields and coordinate ranges.
    ///
    /// # Errors
    /// - `MissingName` / `MissingDescription` for blank required text.
    /// - `NonFiniteCoordinate` for NaN or infinite degrees.
    /// - `LatitudeOutOfRange` / `LongitudeOutOfRange` for out-of-range degrees.
    pub fn validate(&self) -> Result<(), SiteValidationError> {
        if self.name.trim().is_empty() {
            return Err(SiteValidationError::MissingName);
        }
        if self.description.trim().is_empty() {
            return Err(SiteValidationError::MissingDescription);
        }
        if let Some(lat) = self.location.latitude {
            if !lat.is_finite() {
                return Err(SiteValidationError::NonFiniteCoordinate("latitude"));
            }
            if !(-90.0..=90.0).contains(&lat) {
                return Err(SiteValidationError::LatitudeOutOfRange(lat));
            }
        }
        if let Some(lng) = self.location.longitude {
            if !lng.is_finite() {
                return Err(SiteValidationError::NonFiniteCoordinate("longitude"));
            }
            if !(-180.0..=180.0).contains(&lng) {
                return Err(SiteValidationError::LongitudeOutOfRange(lng));
            }
        }
        Ok(())
    }

    /// Builds the persisted record from validated input and store stamps.
    pub(crate) fn into_site(self, id: SiteId, created_at: i64, created_by: IdentityId) -> Site {
        Site {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            location: normalize_location(self.location),
            period: self.period.trim().to_string(),
            status: self.status,
            date_discovered: self.date_discovered,
            created_at,
            created_by,
            artifacts: Vec::new(),
            images: Vec::new(),
        }
    }
}

fn normalize_location(location: Location) -> Location {
    Location {
        address: non_blank(location.address),
        country: non_blank(location.country),
        region: non_blank(location.region),
        latitude: location.latitude,
        longitude: location.longitude,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Validation failures for [`SiteDraft`].
#[derive(Debug, Clone, PartialEq)]
pub enum SiteValidationError {
    MissingName,
    MissingDescription,
    NonFiniteCoordinate(&'static str),
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl Display for SiteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "site name is required"),
            Self::MissingDescription => write!(f, "site description is required"),
            Self::NonFiniteCoordinate(field) => write!(f, "{field} must be a finite number"),
            Self::LatitudeOutOfRange(value) => {
                write!(f, "latitude {value} is outside [-90, 90]")
            }
            Self::LongitudeOutOfRange(value) => {
                write!(f, "longitude {value} is outside [-180, 180]")
            }
        }
    }
}

impl Error for SiteValidationError {}

#[cfg(test)]
mod tests {
    use super::{Location, Site, SiteDraft, SiteValidationError};

    #[test]
    fn blank_name_is_rejected() {
        let draft = SiteDraft::new("   ", "ruins");
        assert_eq!(draft.validate(), Err(SiteValidationError::MissingName));
    }

    #[test]
    fn blank_description_is_rejected() {
        let draft = SiteDraft::new("Villa", "");
        assert_eq!(draft.validate(), Err(SiteValidationError::MissingDescription));
    }

    #[test]
    fn non_finite_and_out_of_range_coordinates_are_rejected() {
        let mut draft = SiteDraft::new("Villa", "ruins");
        draft.location.latitude = Some(f64::NAN);
        assert_eq!(
            draft.validate(),
            Err(SiteValidationError::NonFiniteCoordinate("latitude"))
        );

        draft.location.latitude = Some(91.0);
        assert_eq!(
            draft.validate(),
            Err(SiteValidationError::LatitudeOutOfRange(91.0))
        );

        draft.location.latitude = Some(10.0);
        draft.location.longitude = Some(-180.5);
        assert_eq!(
            draft.validate(),
            Err(SiteValidationError::LongitudeOutOfRange(-180.5))
        );
    }

    #[test]
    fn coordinates_require_both_components() {
        let half = Location {
            latitude: Some(41.9),
            ..Location::default()
        };
        assert_eq!(half.coordinates(), None);

        let origin = Location {
            latitude: Some(0.0),
            longitude: Some(0.0),
            ..Location::default()
        };
        assert_eq!(origin.coordinates(), Some((0.0, 0.0)));
    }

    #[test]
    fn into_site_trims_and_drops_blank_location_parts() {
        let mut draft = SiteDraft::new("  Roman Villa ", "ruins");
        draft.location.address = Some("  ".to_string());
        draft.location.country = Some(" Italy ".to_string());
        let site = draft.into_site("s1".to_string(), 10, "u1".into());

        assert_eq!(site.name, "Roman Villa");
        assert_eq!(site.location.address, None);
        assert_eq!(site.location.country.as_deref(), Some("Italy"));
        assert!(site.artifacts.is_empty());
        assert_eq!(site.created_at, 10);
    }

    #[test]
    fn document_without_creator_decodes_as_anonymous() {
        let site =
            SiteDraft::new("Skara Brae", "village").into_site("s1".to_string(), 10, "u1".into());
        assert!(!site.created_by.is_anonymous());

        let mut body = serde_json::to_value(&site).expect("encode site");
        body.as_object_mut()
            .expect("site encodes as an object")
            .remove("createdBy")
            .expect("creator field present");
        let legacy: Site = serde_json::from_value(body).expect("decode legacy site");
        assert!(legacy.created_by.is_anonymous());
        assert_eq!(legacy.name, "Skara Brae");
    }
}
