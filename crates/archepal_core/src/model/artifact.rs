//! Artifact domain model and catalog enumerations.
//!
//! # Responsibility
//! - Define the cataloged artifact record and its create input.
//! - Own the fixed catalogs (type, material, condition, significance).
//!
//! # Invariants
//! - Every artifact references exactly one owning site.
//! - `Significance` ordering is `Low < Medium < High < VeryHigh`.
//! - Tags are lowercase, trimmed and unique.

use crate::model::site::SiteId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static TAG_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,;\n]+").expect("valid tag separator regex"));

/// Store-assigned stable identifier for an artifact document.
pub type ArtifactId = String;

macro_rules! catalog_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl $name {
            /// All catalog entries in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Display label, identical to the stored value.
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// Parses a display label (exact match after trimming).
            pub fn parse_label(value: &str) -> Option<Self> {
                match value.trim() {
                    $($label => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

catalog_enum! {
    /// Physical-object category.
    ArtifactType {
        Coin => "Coin",
        Ceramic => "Ceramic",
        Weapon => "Weapon",
        Glass => "Glass",
        PersonalOrnament => "Personal Ornament",
        Sculpture => "Sculpture",
        Other => "Other",
    }
}

catalog_enum! {
    /// Primary material.
    Material {
        Gold => "Gold",
        Silver => "Silver",
        Bronze => "Bronze",
        Iron => "Iron",
        Terracotta => "Terracotta",
        Ceramic => "Ceramic",
        Glass => "Glass",
        Marble => "Marble",
        Stone => "Stone",
        Bone => "Bone",
        Wood => "Wood",
        Other => "Other",
    }
}

catalog_enum! {
    /// Preservation state at cataloging time.
    Condition {
        Excellent => "Excellent",
        Good => "Good",
        Fair => "Fair",
        Fragment => "Fragment",
        Poor => "Poor",
    }
}

catalog_enum! {
    /// Ordinal importance. Variant order defines `Ord`.
    Significance {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        VeryHigh => "Very High",
    }
}

/// Canonical artifact record as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub id: ArtifactId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ArtifactType,
    pub period: String,
    pub material: Material,
    pub condition: Condition,
    #[serde(default)]
    pub dimensions: String,
    #[serde(default)]
    pub find_location: String,
    /// Unix epoch milliseconds.
    pub excavation_date: i64,
    pub significance: Significance,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub find_context: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finder: Option<String>,
    pub site_id: SiteId,
    /// Unix epoch milliseconds, store-assigned at creation.
    pub created_at: i64,
}

/// Create input for [`Artifact`].
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactDraft {
    pub name: String,
    pub kind: ArtifactType,
    pub period: String,
    pub material: Material,
    pub condition: Condition,
    pub dimensions: String,
    pub find_location: String,
    pub excavation_date: i64,
    pub significance: Significance,
    pub description: String,
    pub find_context: Option<String>,
    pub tags: Vec<String>,
    pub finder: Option<String>,
    pub site_id: SiteId,
}

impl ArtifactDraft {
    /// Creates a draft with required catalog fields; free text starts empty.
    pub fn new(
        site_id: impl Into<SiteId>,
        name: impl Into<String>,
        kind: ArtifactType,
        period: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            period: period.into(),
            material: Material::Other,
            condition: Condition::Good,
            dimensions: String::new(),
            find_location: String::new(),
            excavation_date: 0,
            significance: Significance::Medium,
            description: String::new(),
            find_context: None,
            tags: Vec::new(),
            finder: None,
            site_id: site_id.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ArtifactValidationError> {
        if self.name.trim().is_empty() {
            return Err(ArtifactValidationError::MissingName);
        }
        if self.period.trim().is_empty() {
            return Err(ArtifactValidationError::MissingPeriod);
        }
        if self.site_id.trim().is_empty() {
            return Err(ArtifactValidationError::MissingSite);
        }
        Ok(())
    }

    pub(crate) fn into_artifact(self, id: ArtifactId, created_at: i64) -> Artifact {
        Artifact {
            id,
            name: self.name.trim().to_string(),
            kind: self.kind,
            period: self.period.trim().to_string(),
            material: self.material,
            condition: self.condition,
            dimensions: self.dimensions,
            find_location: self.find_location,
            excavation_date: self.excavation_date,
            significance: self.significance,
            description: self.description,
            find_context: self.find_context.filter(|text| !text.trim().is_empty()),
            tags: normalize_tags(&self.tags),
            finder: self.finder.filter(|text| !text.trim().is_empty()),
            site_id: self.site_id,
            created_at,
        }
    }
}

/// Splits a free-form tag field on commas, semicolons or newlines.
pub fn parse_tags(raw: &str) -> BTreeSet<String> {
    let parts = TAG_SEPARATOR_RE.split(raw).collect::<Vec<_>>();
    normalize_tags(&parts)
}

/// Trims, lowercases and deduplicates tags; blanks are dropped.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> BTreeSet<String> {
    tags.iter()
        .map(|tag| tag.as_ref().trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Validation failures for [`ArtifactDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactValidationError {
    MissingName,
    MissingPeriod,
    MissingSite,
}

impl Display for ArtifactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "artifact name is required"),
            Self::MissingPeriod => write!(f, "artifact period is required"),
            Self::MissingSite => write!(f, "artifact must reference an owning site"),
        }
    }
}

impl Error for ArtifactValidationError {}

#[cfg(test)]
mod tests {
    use super::{
        parse_tags, ArtifactDraft, ArtifactType, ArtifactValidationError, Material, Significance,
    };

    #[test]
    fn significance_is_ordinal() {
        assert!(Significance::Low < Significance::Medium);
        assert!(Significance::High < Significance::VeryHigh);
        assert_eq!(Significance::VeryHigh.label(), "Very High");
    }

    #[test]
    fn catalog_labels_round_trip_through_parse() {
        for material in Material::ALL {
            assert_eq!(Material::parse_label(material.label()), Some(*material));
        }
        assert_eq!(
            ArtifactType::parse_label(" Personal Ornament "),
            Some(ArtifactType::PersonalOrnament)
        );
        assert_eq!(ArtifactType::parse_label("coin"), None);
    }

    #[test]
    fn catalog_serializes_as_label() {
        let json = serde_json::to_string(&Significance::VeryHigh).expect("serialize");
        assert_eq!(json, "\"Very High\"");
    }

    #[test]
    fn parse_tags_normalizes_and_dedupes() {
        let tags = parse_tags("Roman, coin ;ROMAN\n , gold");
        let collected = tags.into_iter().collect::<Vec<_>>();
        assert_eq!(collected, vec!["coin", "gold", "roman"]);
    }

    #[test]
    fn draft_requires_name_period_and_site() {
        let draft = ArtifactDraft::new("site-1", "", ArtifactType::Coin, "Roman");
        assert_eq!(draft.validate(), Err(ArtifactValidationError::MissingName));

        let draft = ArtifactDraft::new("site-1", "Aureus", ArtifactType::Coin, " ");
        assert_eq!(draft.validate(), Err(ArtifactValidationError::MissingPeriod));

        let draft = ArtifactDraft::new("", "Aureus", ArtifactType::Coin, "Roman");
        assert_eq!(draft.validate(), Err(ArtifactValidationError::MissingSite));
    }

    #[test]
    fn into_artifact_drops_blank_optionals() {
        let mut draft = ArtifactDraft::new("site-1", "Aureus", ArtifactType::Coin, "Roman");
        draft.finder = Some("  ".to_string());
        draft.tags = vec!["Gold".to_string(), "gold".to_string()];
        let artifact = draft.into_artifact("a1".to_string(), 5);

        assert_eq!(artifact.finder, None);
        assert_eq!(artifact.tags.len(), 1);
        assert_eq!(artifact.site_id, "site-1");
    }
}
