//! # Organigram
//!
//! The organigram is a JSON list of units. Each unit names its parent by
//! the parent's identifier in the organigram. Extracted units are also the
//! lookup tables other extractors use to resolve a unit from a free-text
//! name or from an email address.

use std::collections::HashMap;

use mex_core::{
    Email, ExtractedOrganizationalUnitIdentifier, Link, MergedOrganizationIdentifier,
    MergedOrganizationalUnitIdentifier, MergedPrimarySourceIdentifier, Settings, Text,
    TextLanguage,
};
use mex_model::extracted::ExtractedData;
use mex_model::ExtractedOrganizationalUnit;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::identity::IdentityStore;
use crate::primary_source::read_records;

/// A bilingual name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganigramName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub de: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
}

impl OrganigramName {
    fn texts(&self) -> impl Iterator<Item = Text> + '_ {
        [(&self.de, TextLanguage::De), (&self.en, TextLanguage::En)]
            .into_iter()
            .filter_map(|(value, language)| {
                value
                    .as_deref()
                    .filter(|value| !value.is_empty())
                    .map(|value| Text::new(value, Some(language)))
            })
    }
}

/// A raw organigram unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganigramUnit {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_unit: Option<String>,
    pub name: OrganigramName,
    #[serde(default)]
    pub alternative_name: Vec<OrganigramName>,
    #[serde(default)]
    pub short_name: Vec<String>,
    #[serde(default)]
    pub email: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Read the organigram configured by `settings.organigram_path`.
pub fn extract_organigram_units(settings: &Settings) -> Result<Vec<OrganigramUnit>, ExtractError> {
    let path = settings.organigram_file();
    let units: Vec<OrganigramUnit> = read_records(&path)?;
    tracing::info!(path = %path.display(), units = units.len(), "extracted organigram units");
    Ok(units)
}

/// Transform organigram units into extracted organizational units.
///
/// Parents are resolved to the stable target identifier of the unit with
/// that organigram identifier; unknown parents are dropped with a warning.
///
/// # Errors
///
/// Returns `ExtractError::Value` for malformed email addresses or URLs.
pub fn transform_organigram_units(
    units: &[OrganigramUnit],
    primary_source: &MergedPrimarySourceIdentifier,
    unit_of: Option<&MergedOrganizationIdentifier>,
    identities: &mut dyn IdentityStore,
) -> Result<Vec<ExtractedOrganizationalUnit>, ExtractError> {
    let identities_by_unit: HashMap<&str, _> = units
        .iter()
        .map(|unit| (unit.identifier.as_str(), identities.assign(primary_source, &unit.identifier)))
        .collect();

    units
        .iter()
        .map(|unit| {
            let identity = &identities_by_unit[unit.identifier.as_str()];
            let parent_unit = match unit.parent_unit.as_deref() {
                None => None,
                Some(parent) => match identities_by_unit.get(parent) {
                    Some(parent_identity) => {
                        Some(parent_identity.stable_target_id_as::<MergedOrganizationalUnitIdentifier>())
                    }
                    None => {
                        tracing::warn!(unit = %unit.identifier, parent, "unknown parent unit");
                        None
                    }
                },
            };
            Ok(ExtractedOrganizationalUnit {
                extracted: ExtractedData::new(primary_source.clone(), unit.identifier.clone()),
                identifier: identity.identifier_as::<ExtractedOrganizationalUnitIdentifier>(),
                stable_target_id: identity.stable_target_id_as(),
                alternative_name: unit.alternative_name.iter().flat_map(OrganigramName::texts).collect(),
                email: unit
                    .email
                    .iter()
                    .map(|email| Email::new(email.as_str()))
                    .collect::<Result<_, _>>()?,
                name: unit.name.texts().collect(),
                parent_unit,
                short_name: unit.short_name.iter().map(|name| Text::new(name.as_str(), None)).collect(),
                unit_of: unit_of.cloned().into_iter().collect(),
                website: unit.website.as_deref().map(Link::parse).transpose()?.into_iter().collect(),
            })
        })
        .collect()
}

/// Every name a unit is known by: names, short names, alternative names.
/// May contain duplicates.
pub fn get_synonyms(unit: &ExtractedOrganizationalUnit) -> impl Iterator<Item = &Text> {
    unit.name
        .iter()
        .chain(unit.short_name.iter())
        .chain(unit.alternative_name.iter())
}

/// Map every synonym value to the unit's stable target identifier.
pub fn get_unit_merged_ids_by_synonyms<'a>(
    units: impl IntoIterator<Item = &'a ExtractedOrganizationalUnit>,
) -> HashMap<String, MergedOrganizationalUnitIdentifier> {
    units
        .into_iter()
        .flat_map(|unit| {
            get_synonyms(unit).map(move |synonym| (synonym.value.clone(), unit.stable_target_id.clone()))
        })
        .collect()
}

/// Map every lowercased email address to the unit's stable target identifier.
pub fn get_unit_merged_ids_by_emails<'a>(
    units: impl IntoIterator<Item = &'a ExtractedOrganizationalUnit>,
) -> HashMap<String, MergedOrganizationalUnitIdentifier> {
    units
        .into_iter()
        .flat_map(|unit| {
            unit.email
                .iter()
                .map(move |email| (email.as_str().to_lowercase(), unit.stable_target_id.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::DummyIdentityStore;
    use mex_model::{ExtractedModel, InstanceValidator};

    const ORGANIGRAM: &str = r#"[
        {
            "identifier": "parent-unit",
            "name": {"de": "Abteilung", "en": "Department"},
            "shortName": ["PRNT"],
            "email": ["PARENT@example.com"],
            "website": "https://www.rki.de/abteilung"
        },
        {
            "identifier": "child-unit",
            "parentUnit": "parent-unit",
            "name": {"de": "Fachgebiet 99"},
            "alternativeName": [{"en": "Field Department 99"}],
            "shortName": ["FG 99"],
            "email": ["fg99@example.com", "Info@Example.com"]
        },
        {
            "identifier": "orphan-unit",
            "parentUnit": "gone",
            "name": {"en": "Orphan"}
        }
    ]"#;

    fn units() -> Vec<OrganigramUnit> {
        serde_json::from_str(ORGANIGRAM).unwrap()
    }

    fn extracted() -> Vec<ExtractedOrganizationalUnit> {
        transform_organigram_units(
            &units(),
            &MergedPrimarySourceIdentifier::from_seed(100),
            Some(&MergedOrganizationIdentifier::from_seed(101)),
            &mut DummyIdentityStore,
        )
        .unwrap()
    }

    #[test]
    fn test_extract_from_settings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("organigram.json"), ORGANIGRAM).unwrap();
        let settings = Settings {
            assets_dir: dir.path().to_path_buf(),
            organigram_path: "organigram.json".into(),
            ..Settings::default()
        };
        assert_eq!(extract_organigram_units(&settings).unwrap(), units());
    }

    #[test]
    fn test_malformed_organigram() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("organigram.json"), r#"{"not": "a list"}"#).unwrap();
        let settings = Settings {
            assets_dir: dir.path().to_path_buf(),
            organigram_path: "organigram.json".into(),
            ..Settings::default()
        };
        assert!(matches!(
            extract_organigram_units(&settings),
            Err(ExtractError::Parse { .. })
        ));
    }

    #[test]
    fn test_parent_is_resolved() {
        let units = extracted();
        assert_eq!(units[1].parent_unit.as_ref(), Some(&units[0].stable_target_id));
        assert_eq!(units[0].parent_unit, None);
        assert_eq!(units[2].parent_unit, None);
    }

    #[test]
    fn test_names_carry_languages() {
        let units = extracted();
        assert_eq!(
            units[0].name,
            vec![
                Text::new("Abteilung", Some(TextLanguage::De)),
                Text::new("Department", Some(TextLanguage::En)),
            ]
        );
        assert_eq!(
            units[1].alternative_name,
            vec![Text::new("Field Department 99", Some(TextLanguage::En))]
        );
        assert_eq!(units[0].website.len(), 1);
    }

    #[test]
    fn test_extracted_units_are_valid() {
        let validator = InstanceValidator::new();
        for unit in extracted() {
            validator.validate_document(&unit.to_document().unwrap()).unwrap();
        }
    }

    #[test]
    fn test_merged_ids_by_synonyms() {
        let units = extracted();
        let by_synonym = get_unit_merged_ids_by_synonyms(&units);
        assert_eq!(by_synonym["FG 99"], units[1].stable_target_id);
        assert_eq!(by_synonym["Field Department 99"], units[1].stable_target_id);
        assert_eq!(by_synonym["Department"], units[0].stable_target_id);
        assert_eq!(get_synonyms(&units[1]).count(), 3);
    }

    #[test]
    fn test_merged_ids_by_emails_are_lowercased() {
        let units = extracted();
        let by_email = get_unit_merged_ids_by_emails(&units);
        assert_eq!(by_email["parent@example.com"], units[0].stable_target_id);
        assert_eq!(by_email["info@example.com"], units[1].stable_target_id);
        assert_eq!(by_email.len(), 3);
    }

    #[test]
    fn test_invalid_email_fails_transform() {
        let mut units = units();
        units[0].email = vec!["not an email".to_string()];
        let err = transform_organigram_units(
            &units,
            &MergedPrimarySourceIdentifier::from_seed(100),
            None,
            &mut DummyIdentityStore,
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::Value(_)));
    }
}
