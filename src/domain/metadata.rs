use serde::{Deserialize, Serialize};

/// Off-chain metadata of one hound, reduced to the traits the raffle inspects
///
/// Fields absent from the metadata payload deserialize as empty labels, which
/// never match a configured ineligible trait.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoundMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mouth: String,
    #[serde(default)]
    pub face: String,
    #[serde(default)]
    pub torso: String,
    #[serde(default)]
    pub form: String,
}

impl HoundMetadata {
    /// Label of the given trait category
    pub fn trait_value(&self, category: TraitCategory) -> &str {
        match category {
            TraitCategory::Form => &self.form,
            TraitCategory::Face => &self.face,
            TraitCategory::Mouth => &self.mouth,
            TraitCategory::Torso => &self.torso,
        }
    }
}

/// Trait categories tracked for eligibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitCategory {
    Form,
    Face,
    Mouth,
    Torso,
}

impl TraitCategory {
    pub const ALL: [TraitCategory; 4] = [
        TraitCategory::Form,
        TraitCategory::Face,
        TraitCategory::Mouth,
        TraitCategory::Torso,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TraitCategory::Form => "form",
            TraitCategory::Face => "face",
            TraitCategory::Mouth => "mouth",
            TraitCategory::Torso => "torso",
        }
    }
}

impl std::fmt::Display for TraitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
