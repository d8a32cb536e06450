//! Document classes and their per-type configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::lexicon::KeywordLexicon;
use crate::core::VerifyError;
use crate::core::config::VerifierConfig;

/// The supported document classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Invoice,
    Prescription,
    LabReport,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::Invoice,
        DocumentType::Prescription,
        DocumentType::LabReport,
    ];

    /// Parses a caller-supplied type name, case-insensitively.
    ///
    /// Returns `None` for names outside the enumeration.
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase();
        match normalized.as_str() {
            "invoice" | "invoices" => Some(DocumentType::Invoice),
            "prescription" | "prescriptions" => Some(DocumentType::Prescription),
            "lab_report" | "labreport" | "lab-report" | "lab report" | "lab_reports"
            | "labreports" => Some(DocumentType::LabReport),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::Prescription => "prescription",
            DocumentType::LabReport => "lab_report",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| VerifyError::invalid_input(format!("unknown document type '{s}'")))
    }
}

/// Everything the pipeline needs to know about one document class.
#[derive(Debug, Clone)]
pub struct TypeProfile {
    /// `None` for the fallback profile of an unrecognized type.
    pub document_type: Option<DocumentType>,
    pub lexicon: KeywordLexicon,
    pub match_threshold: usize,
    /// Directory of reference templates; `None` when no corpus exists.
    pub template_dir: Option<PathBuf>,
}

/// Read-only map from document type to profile, plus the fallback.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: HashMap<DocumentType, TypeProfile>,
    fallback: TypeProfile,
}

impl ProfileRegistry {
    /// Builds every profile from the configuration.
    ///
    /// Template directories are resolved against `corpus_root`.
    pub fn from_config(config: &VerifierConfig) -> Self {
        let profiles = DocumentType::ALL
            .iter()
            .map(|&doc_type| {
                let profile_config = config.profiles.get(doc_type);
                let profile = TypeProfile {
                    document_type: Some(doc_type),
                    lexicon: KeywordLexicon::combined(
                        &profile_config.keywords,
                        &config.general_keywords,
                    ),
                    match_threshold: profile_config.match_threshold,
                    template_dir: Some(config.corpus_root.join(&profile_config.template_dir)),
                };
                (doc_type, profile)
            })
            .collect();

        let fallback = TypeProfile {
            document_type: None,
            lexicon: KeywordLexicon::new(&config.general_keywords),
            match_threshold: config.fallback_match_threshold,
            template_dir: None,
        };

        Self { profiles, fallback }
    }

    pub fn get(&self, doc_type: DocumentType) -> &TypeProfile {
        // Every variant is inserted in `from_config`.
        self.profiles.get(&doc_type).unwrap_or(&self.fallback)
    }

    /// Resolves a caller-supplied type name, using the fallback when unknown.
    pub fn resolve(&self, name: &str) -> &TypeProfile {
        match DocumentType::parse(name) {
            Some(doc_type) => self.get(doc_type),
            None => &self.fallback,
        }
    }

    pub fn fallback(&self) -> &TypeProfile {
        &self.fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::VerifierConfig;

    #[test]
    fn test_parse_variants() {
        assert_eq!(DocumentType::parse("INVOICE"), Some(DocumentType::Invoice));
        assert_eq!(DocumentType::parse(" Prescription "), Some(DocumentType::Prescription));
        assert_eq!(DocumentType::parse("labreport"), Some(DocumentType::LabReport));
        assert_eq!(DocumentType::parse("Lab_Report"), Some(DocumentType::LabReport));
        assert_eq!(DocumentType::parse("passport"), None);
        assert!("passport".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_default_thresholds() {
        let registry = ProfileRegistry::from_config(&VerifierConfig::default());
        assert_eq!(registry.get(DocumentType::Invoice).match_threshold, 15);
        assert_eq!(registry.get(DocumentType::Prescription).match_threshold, 20);
        assert_eq!(registry.get(DocumentType::LabReport).match_threshold, 25);
    }

    #[test]
    fn test_unknown_type_uses_fallback() {
        let config = VerifierConfig::default();
        let registry = ProfileRegistry::from_config(&config);
        let profile = registry.resolve("passport");
        assert_eq!(profile.document_type, None);
        assert_eq!(profile.match_threshold, 15);
        assert!(profile.template_dir.is_none());
        assert!(profile.lexicon.contains("signature"));
        assert!(!profile.lexicon.contains("subtotal"));
    }

    #[test]
    fn test_type_lexicon_includes_general_terms() {
        let registry = ProfileRegistry::from_config(&VerifierConfig::default());
        let invoice = registry.get(DocumentType::Invoice);
        assert!(invoice.lexicon.contains("subtotal"));
        assert!(invoice.lexicon.contains("confidential"));
        let rx = registry.get(DocumentType::Prescription);
        assert!(rx.lexicon.contains("rx"));
    }

    #[test]
    fn test_template_dir_resolved_against_root() {
        let mut config = VerifierConfig::default();
        config.corpus_root = PathBuf::from("/srv/corpus");
        let registry = ProfileRegistry::from_config(&config);
        assert_eq!(
            registry.get(DocumentType::LabReport).template_dir,
            Some(PathBuf::from("/srv/corpus/LABREPORTS"))
        );
    }
}
