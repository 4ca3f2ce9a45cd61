//! Trait-based eligibility of burned hounds

use std::collections::HashSet;

use crate::config::IneligibleTraitsConfig;
use crate::domain::{HoundMetadata, TraitCategory};

/// Disqualifying trait labels, one set per category
///
/// Built once from configuration and passed by reference wherever eligibility
/// is decided. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IneligibleTraits {
    forms: HashSet<String>,
    faces: HashSet<String>,
    mouths: HashSet<String>,
    torsos: HashSet<String>,
}

impl IneligibleTraits {
    pub fn new<I, S>(forms: I, faces: I, mouths: I, torsos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            forms: forms.into_iter().map(Into::into).collect(),
            faces: faces.into_iter().map(Into::into).collect(),
            mouths: mouths.into_iter().map(Into::into).collect(),
            torsos: torsos.into_iter().map(Into::into).collect(),
        }
    }

    fn set(&self, category: TraitCategory) -> &HashSet<String> {
        match category {
            TraitCategory::Form => &self.forms,
            TraitCategory::Face => &self.faces,
            TraitCategory::Mouth => &self.mouths,
            TraitCategory::Torso => &self.torsos,
        }
    }

    /// Categories whose label on this hound is disqualifying
    pub fn disqualifying_traits(&self, metadata: &HoundMetadata) -> Vec<TraitCategory> {
        TraitCategory::ALL
            .into_iter()
            .filter(|category| self.set(*category).contains(metadata.trait_value(*category)))
            .collect()
    }

    /// A hound is eligible when none of its tracked traits is disqualifying
    pub fn is_eligible(&self, metadata: &HoundMetadata) -> bool {
        TraitCategory::ALL
            .into_iter()
            .all(|category| !self.set(category).contains(metadata.trait_value(category)))
    }

    pub fn is_empty(&self) -> bool {
        TraitCategory::ALL
            .into_iter()
            .all(|category| self.set(category).is_empty())
    }
}

impl From<&IneligibleTraitsConfig> for IneligibleTraits {
    fn from(config: &IneligibleTraitsConfig) -> Self {
        Self::new(
            config.forms.iter().cloned(),
            config.faces.iter().cloned(),
            config.mouths.iter().cloned(),
            config.torsos.iter().cloned(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hound(form: &str, face: &str, mouth: &str, torso: &str) -> HoundMetadata {
        HoundMetadata {
            name: None,
            form: form.into(),
            face: face.into(),
            mouth: mouth.into(),
            torso: torso.into(),
        }
    }

    fn traits() -> IneligibleTraits {
        IneligibleTraits::new(
            vec!["skeleton"],
            vec!["ghost"],
            vec!["fangs"],
            vec!["armor"],
        )
    }

    #[test]
    fn test_clean_hound_is_eligible() {
        let meta = hound("normal", "normal", "grin", "plain");
        assert!(traits().is_eligible(&meta));
        assert!(traits().disqualifying_traits(&meta).is_empty());
    }

    #[test]
    fn test_any_single_matching_trait_disqualifies() {
        let cases = [
            (hound("skeleton", "normal", "grin", "plain"), TraitCategory::Form),
            (hound("normal", "ghost", "grin", "plain"), TraitCategory::Face),
            (hound("normal", "normal", "fangs", "plain"), TraitCategory::Mouth),
            (hound("normal", "normal", "grin", "armor"), TraitCategory::Torso),
        ];

        for (meta, category) in cases {
            assert!(!traits().is_eligible(&meta), "{} should disqualify", category);
            assert_eq!(traits().disqualifying_traits(&meta), vec![category]);
        }
    }

    #[test]
    fn test_face_is_checked_against_face_set() {
        // A face label that only appears in the mouth list must not disqualify
        let traits = IneligibleTraits::new(
            Vec::<String>::new(),
            vec!["ghost".to_string()],
            vec!["laser".to_string()],
            Vec::new(),
        );
        assert!(traits.is_eligible(&hound("normal", "laser", "grin", "plain")));
        assert!(!traits.is_eligible(&hound("normal", "ghost", "grin", "plain")));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(traits().is_eligible(&hound("normal", "Ghost", "grin", "plain")));
        assert!(traits().is_eligible(&hound("normal", "ghost ", "grin", "plain")));
    }

    #[test]
    fn test_missing_traits_never_match() {
        assert!(traits().is_eligible(&HoundMetadata::default()));
    }

    #[test]
    fn test_from_config() {
        let config = IneligibleTraitsConfig {
            forms: vec!["skeleton".into()],
            faces: vec![],
            mouths: vec!["fangs".into()],
            torsos: vec![],
        };
        let traits = IneligibleTraits::from(&config);
        assert!(!traits.is_empty());
        assert!(!traits.is_eligible(&hound("skeleton", "", "", "")));
        assert!(!traits.is_eligible(&hound("", "", "fangs", "")));
        assert!(IneligibleTraits::default().is_empty());
    }
}
