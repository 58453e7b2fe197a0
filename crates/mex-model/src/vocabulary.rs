//! # Controlled Vocabularies
//!
//! A vocabulary is a closed set of concepts published under
//! `https://mex.rki.de/item/<name>`; each concept is identified by a URL
//! under `https://mex.rki.de/concept/`. Models bind a field to a vocabulary
//! through a [`VocabularyEnum`]; generated schemas reference the enum by its
//! class name, the published entity schemas bind the field with `useScheme`.

use serde_json::{json, Value};

/// URL prefix of vocabulary schemes, as used by `useScheme`.
pub const VOCABULARY_SCHEME_PREFIX: &str = "https://mex.rki.de/item/";

/// Static description of one controlled vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    /// Kebab-case vocabulary name, e.g. `data-type`.
    pub name: &'static str,
    /// Class name of the enum, e.g. `DataType`.
    pub class_name: &'static str,
    /// One-line description of the vocabulary.
    pub description: &'static str,
    /// Concept identifiers, in declaration order.
    pub concepts: &'static [&'static str],
}

impl Vocabulary {
    /// The `useScheme` URL of this vocabulary.
    pub fn scheme(&self) -> String {
        format!("{VOCABULARY_SCHEME_PREFIX}{}", self.name)
    }

    /// JSON Schema definition of the enum.
    pub fn definition(&self) -> Value {
        json!({
            "title": self.class_name,
            "description": self.description,
            "type": "string",
            "enum": self.concepts,
        })
    }
}

/// A Rust enum whose variants are the concepts of a vocabulary.
pub trait VocabularyEnum: Sized + Copy + 'static {
    /// The vocabulary this enum represents.
    const VOCABULARY: Vocabulary;

    /// All variants, in declaration order.
    fn variants() -> &'static [Self];

    /// The concept identifier of this variant.
    fn concept_id(&self) -> &'static str;

    /// Look up the variant for a concept identifier.
    fn from_concept_id(concept_id: &str) -> Option<Self> {
        Self::variants()
            .iter()
            .copied()
            .find(|variant| variant.concept_id() == concept_id)
    }
}

macro_rules! vocabulary_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $vocabulary:literal, $description:literal {
            $($variant:ident => $concept:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[doc = $concept]
                $variant,
            )+
        }

        impl VocabularyEnum for $name {
            const VOCABULARY: Vocabulary = Vocabulary {
                name: $vocabulary,
                class_name: stringify!($name),
                description: $description,
                concepts: &[$($concept,)+],
            };

            fn variants() -> &'static [Self] {
                &[$(Self::$variant,)+]
            }

            fn concept_id(&self) -> &'static str {
                match self {
                    $(Self::$variant => $concept,)+
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.concept_id())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let concept_id = String::deserialize(deserializer)?;
                Self::from_concept_id(&concept_id).ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        "{concept_id:?} is not a concept of vocabulary {}",
                        $vocabulary
                    ))
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.concept_id())
            }
        }
    };
}

vocabulary_enum! {
    /// The type of the single piece of information within a datum.
    DataType, "data-type", "The type of the single piece of information within a datum." {
        Integer => "https://mex.rki.de/concept/data-type-1",
        String => "https://mex.rki.de/concept/data-type-2",
        Boolean => "https://mex.rki.de/concept/data-type-3",
        Date => "https://mex.rki.de/concept/data-type-4",
    }
}

vocabulary_enum! {
    /// Who may access a resource.
    AccessRestriction, "access-restriction", "Information about who can access the resource." {
        Open => "https://mex.rki.de/concept/access-restriction-1",
        Restricted => "https://mex.rki.de/concept/access-restriction-2",
    }
}

vocabulary_enum! {
    /// Language of a resource.
    Language, "language", "The language of a resource." {
        German => "https://mex.rki.de/concept/language-1",
        English => "https://mex.rki.de/concept/language-2",
    }
}

vocabulary_enum! {
    /// Central topic of a resource.
    Theme, "theme", "The central topic of a resource." {
        PublicHealth => "https://mex.rki.de/concept/theme-1",
        InfectiousDiseases => "https://mex.rki.de/concept/theme-2",
        Epidemiology => "https://mex.rki.de/concept/theme-3",
    }
}

/// Every vocabulary the models bind to.
pub fn vocabularies() -> [Vocabulary; 4] {
    [
        AccessRestriction::VOCABULARY,
        DataType::VOCABULARY,
        Language::VOCABULARY,
        Theme::VOCABULARY,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_url() {
        assert_eq!(DataType::VOCABULARY.scheme(), "https://mex.rki.de/item/data-type");
        assert_eq!(
            AccessRestriction::VOCABULARY.scheme(),
            "https://mex.rki.de/item/access-restriction"
        );
    }

    #[test]
    fn test_concepts_follow_vocabulary_name() {
        for vocabulary in vocabularies() {
            for concept in vocabulary.concepts {
                let prefix = format!("https://mex.rki.de/concept/{}-", vocabulary.name);
                assert!(concept.starts_with(&prefix), "{concept}");
            }
        }
    }

    #[test]
    fn test_serde_uses_concept_ids() {
        let json = serde_json::to_string(&Theme::Epidemiology).unwrap();
        assert_eq!(json, r#""https://mex.rki.de/concept/theme-3""#);
        let back: Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Theme::Epidemiology);

        let err = serde_json::from_str::<Theme>(r#""https://mex.rki.de/concept/language-1""#)
            .unwrap_err();
        assert!(err.to_string().contains("theme"));
    }

    #[test]
    fn test_definition_lists_all_concepts() {
        let definition = DataType::VOCABULARY.definition();
        assert_eq!(definition["title"], "DataType");
        assert_eq!(definition["enum"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_from_concept_id() {
        assert_eq!(
            Language::from_concept_id("https://mex.rki.de/concept/language-2"),
            Some(Language::English)
        );
        assert_eq!(Language::from_concept_id("english"), None);
    }
}
