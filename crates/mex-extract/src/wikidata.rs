//! # Wikidata Organizations
//!
//! Wikidata entities as returned by the `wbgetentities` API, reduced to the
//! labels, aliases and claims an organization is described by. Claims are
//! keyed by property id; only the properties below are read.
//!
//! | Property | Field           |
//! |----------|-----------------|
//! | P856     | website         |
//! | P213     | isni id         |
//! | P6782    | ror id          |
//! | P1448    | official name   |
//! | P1813    | short name      |
//! | P1705    | native label    |
//! | P4871    | gepris id       |
//! | P227     | gnd id          |
//! | P214     | viaf id         |

use std::path::Path;

use mex_core::{
    ExtractedOrganizationIdentifier, Link, MergedOrganizationIdentifier,
    MergedPrimarySourceIdentifier, Text, TextLanguage,
};
use mex_model::extracted::ExtractedData;
use mex_model::ExtractedOrganization;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::identity::IdentityStore;
use crate::primary_source::read_records;

/// The value of a claim. Bare strings carry no language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawValue")]
pub struct ClaimValue {
    pub text: Option<String>,
    pub language: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Bare(Option<String>),
    Monolingual {
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        language: Option<String>,
    },
}

impl From<RawValue> for ClaimValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Bare(text) => Self { text, language: None },
            RawValue::Monolingual { text, language } => Self { text, language },
        }
    }
}

impl ClaimValue {
    fn to_text(&self) -> Option<Text> {
        let text = self.text.as_deref().filter(|text| !text.is_empty())?;
        let language = self.language.as_deref().and_then(TextLanguage::from_tag);
        Some(Text::new(text, language))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataValue {
    #[serde(default)]
    pub value: ClaimValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mainsnak {
    #[serde(default)]
    pub datavalue: DataValue,
}

/// A single statement about an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub mainsnak: Mainsnak,
}

impl Claim {
    pub fn value(&self) -> &ClaimValue {
        &self.mainsnak.datavalue.value
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "P856", default)]
    pub website: Vec<Claim>,
    #[serde(rename = "P213", default)]
    pub isni_id: Vec<Claim>,
    #[serde(rename = "P6782", default)]
    pub ror_id: Vec<Claim>,
    #[serde(rename = "P1448", default)]
    pub official_name: Vec<Claim>,
    #[serde(rename = "P1813", default)]
    pub short_name: Vec<Claim>,
    #[serde(rename = "P1705", default)]
    pub native_label: Vec<Claim>,
    #[serde(rename = "P4871", default)]
    pub gepris_id: Vec<Claim>,
    #[serde(rename = "P227", default)]
    pub gnd_id: Vec<Claim>,
    #[serde(rename = "P214", default)]
    pub viaf_id: Vec<Claim>,
}

/// A label or alias in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub language: String,
    pub value: String,
}

impl Label {
    fn to_text(&self) -> Text {
        Text::new(self.value.as_str(), TextLanguage::from_tag(&self.language))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    #[serde(default)]
    pub de: Option<Label>,
    #[serde(default)]
    pub en: Option<Label>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aliases {
    #[serde(default)]
    pub de: Vec<Label>,
    #[serde(default)]
    pub en: Vec<Label>,
}

/// A wikidata entity describing an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikidataOrganization {
    /// The Q-id, e.g. `Q679041`.
    #[serde(rename = "id")]
    pub identifier: String,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub claims: Claims,
    #[serde(default)]
    pub aliases: Aliases,
}

/// Read a JSON list of wikidata entities.
pub fn load_wikidata_organizations(path: &Path) -> Result<Vec<WikidataOrganization>, ExtractError> {
    let organizations: Vec<WikidataOrganization> = read_records(path)?;
    tracing::info!(
        path = %path.display(),
        organizations = organizations.len(),
        "loaded wikidata organizations"
    );
    Ok(organizations)
}

/// Transform a wikidata entity into an extracted organization.
///
/// The official name comes from P1448 and falls back to the entity labels.
/// Identifier claims are expanded into links to their registries; values
/// that do not form a valid URL are dropped with a warning.
///
/// # Errors
///
/// Returns `ExtractError::MissingOfficialName` if the entity has neither
/// an official name claim nor a label.
pub fn transform_wikidata_organization(
    organization: &WikidataOrganization,
    primary_source: &MergedPrimarySourceIdentifier,
    identities: &mut dyn IdentityStore,
) -> Result<ExtractedOrganization, ExtractError> {
    let claims = &organization.claims;

    let mut official_name = texts(&claims.official_name);
    if official_name.is_empty() {
        let labels = &organization.labels;
        official_name = labels.de.iter().chain(labels.en.iter()).map(Label::to_text).collect();
    }
    if official_name.is_empty() {
        return Err(ExtractError::MissingOfficialName(organization.identifier.clone()));
    }

    let aliases = &organization.aliases;
    let alternative_name = aliases
        .de
        .iter()
        .chain(aliases.en.iter())
        .map(Label::to_text)
        .chain(texts(&claims.native_label))
        .collect();

    let identity = identities.assign(primary_source, &organization.identifier);
    Ok(ExtractedOrganization {
        extracted: ExtractedData::new(primary_source.clone(), organization.identifier.clone()),
        identifier: identity.identifier_as::<ExtractedOrganizationIdentifier>(),
        stable_target_id: identity.stable_target_id_as::<MergedOrganizationIdentifier>(),
        alternative_name,
        gepris_id: links(&claims.gepris_id, |id| {
            format!("https://gepris.dfg.de/gepris/institution/{id}")
        }),
        gnd_id: links(&claims.gnd_id, |id| format!("https://d-nb.info/gnd/{id}")),
        isni_id: links(&claims.isni_id, |id| {
            format!("https://isni.org/isni/{}", id.replace(' ', ""))
        }),
        official_name,
        ror_id: links(&claims.ror_id, |id| format!("https://ror.org/{id}")),
        short_name: texts(&claims.short_name),
        viaf_id: links(&claims.viaf_id, |id| format!("https://viaf.org/viaf/{id}")),
        website: links(&claims.website, str::to_string),
        wikidata_id: links_from(
            std::iter::once(organization.identifier.as_str()),
            |id| format!("https://www.wikidata.org/entity/{id}"),
        ),
    })
}

fn texts(claims: &[Claim]) -> Vec<Text> {
    claims.iter().filter_map(|claim| claim.value().to_text()).collect()
}

fn links(claims: &[Claim], url: impl Fn(&str) -> String) -> Vec<Link> {
    links_from(
        claims.iter().filter_map(|claim| claim.value().text.as_deref()),
        url,
    )
}

fn links_from<'a>(ids: impl Iterator<Item = &'a str>, url: impl Fn(&str) -> String) -> Vec<Link> {
    ids.filter(|id| !id.is_empty())
        .filter_map(|id| match Link::parse(&url(id)) {
            Ok(link) => Some(link),
            Err(error) => {
                tracing::warn!(id, %error, "skipping wikidata claim");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::DummyIdentityStore;
    use mex_model::{ExtractedModel, InstanceValidator};

    const ENTITY: &str = r#"{
        "id": "Q679041",
        "type": "item",
        "labels": {
            "de": {"language": "de", "value": "Robert Koch-Institut"},
            "en": {"language": "en", "value": "Robert Koch Institute"}
        },
        "aliases": {
            "de": [{"language": "de", "value": "RKI"}],
            "en": [{"language": "en", "value": "Robert Koch Institut"}]
        },
        "claims": {
            "P856": [{"mainsnak": {"datavalue": {"value": "https://www.rki.de/"}}}],
            "P213": [{"mainsnak": {"datavalue": {"value": "0000 0001 0940 3744"}}}],
            "P6782": [{"mainsnak": {"datavalue": {"value": "01k5qnb77"}}}],
            "P1448": [
                {"mainsnak": {"datavalue": {"value": {"text": "Robert Koch-Institut", "language": "de"}}}},
                {"mainsnak": {"datavalue": {"value": {"text": "Robert Koch Institute", "language": "en"}}}}
            ],
            "P1813": [{"mainsnak": {"datavalue": {"value": {"text": "RKI", "language": "de"}}}}],
            "P4871": [{"mainsnak": {"datavalue": {"value": "10179"}}}],
            "P227": [{"mainsnak": {"datavalue": {"value": "2020307-3"}}}],
            "P214": [{"mainsnak": {"datavalue": {"value": null}}}],
            "P31": [{"mainsnak": {"datavalue": {"value": {"id": "Q31855"}}}}]
        }
    }"#;

    fn organization() -> WikidataOrganization {
        serde_json::from_str(ENTITY).unwrap()
    }

    fn transform(organization: &WikidataOrganization) -> Result<ExtractedOrganization, ExtractError> {
        transform_wikidata_organization(
            organization,
            &MergedPrimarySourceIdentifier::from_seed(42),
            &mut DummyIdentityStore,
        )
    }

    #[test]
    fn test_claim_values_accept_strings_and_null() {
        let organization = organization();
        assert_eq!(
            organization.claims.website[0].value(),
            &ClaimValue {
                text: Some("https://www.rki.de/".to_string()),
                language: None
            }
        );
        assert_eq!(organization.claims.viaf_id[0].value(), &ClaimValue::default());
        assert_eq!(
            organization.claims.short_name[0].value().language.as_deref(),
            Some("de")
        );
    }

    #[test]
    fn test_transform_organization() {
        let extracted = transform(&organization()).unwrap();
        assert_eq!(extracted.extracted.identifier_in_primary_source, "Q679041");
        assert_eq!(
            extracted.official_name,
            vec![
                Text::new("Robert Koch-Institut", Some(TextLanguage::De)),
                Text::new("Robert Koch Institute", Some(TextLanguage::En)),
            ]
        );
        assert_eq!(extracted.short_name, vec![Text::new("RKI", Some(TextLanguage::De))]);
        assert_eq!(extracted.alternative_name.len(), 2);
        assert_eq!(
            extracted.isni_id[0].url.as_str(),
            "https://isni.org/isni/0000000109403744"
        );
        assert_eq!(extracted.ror_id[0].url.as_str(), "https://ror.org/01k5qnb77");
        assert_eq!(
            extracted.gepris_id[0].url.as_str(),
            "https://gepris.dfg.de/gepris/institution/10179"
        );
        assert_eq!(extracted.gnd_id[0].url.as_str(), "https://d-nb.info/gnd/2020307-3");
        assert!(extracted.viaf_id.is_empty());
        assert_eq!(
            extracted.wikidata_id[0].url.as_str(),
            "https://www.wikidata.org/entity/Q679041"
        );

        InstanceValidator::new()
            .validate_document(&extracted.to_document().unwrap())
            .unwrap();
    }

    #[test]
    fn test_official_name_falls_back_to_labels() {
        let mut organization = organization();
        organization.claims.official_name.clear();
        let extracted = transform(&organization).unwrap();
        assert_eq!(
            extracted.official_name,
            vec![
                Text::new("Robert Koch-Institut", Some(TextLanguage::De)),
                Text::new("Robert Koch Institute", Some(TextLanguage::En)),
            ]
        );
    }

    #[test]
    fn test_missing_official_name() {
        let organization: WikidataOrganization =
            serde_json::from_str(r#"{"id": "Q1", "labels": {}, "claims": {}, "aliases": {}}"#).unwrap();
        assert!(matches!(
            transform(&organization),
            Err(ExtractError::MissingOfficialName(id)) if id == "Q1"
        ));
    }

    #[test]
    fn test_invalid_website_is_skipped() {
        let mut organization = organization();
        organization.claims.website[0].mainsnak.datavalue.value.text = Some("not a url".to_string());
        assert!(transform(&organization).unwrap().website.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wikidata.json");
        std::fs::write(&path, format!("[{ENTITY}]")).unwrap();
        let organizations = load_wikidata_organizations(&path).unwrap();
        assert_eq!(organizations, vec![organization()]);
    }
}
