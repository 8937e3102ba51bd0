//! Closed vocabulary of compliance document tags.
//!
//! Shared between `Course.required_documents` and `Document.kind`. The wire
//! representation (SCREAMING_SNAKE_CASE) is what the storage layer persists
//! inside the serialized requirement list, so it is part of the contract.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Kind of compliance artifact a document represents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    IdCard,
    SocialSecurity,
    MedicalConcept,
    HeightsBasicCert,
    HeightsAdvancedCert,
    RescueCert,
    // Trainer-specific artifacts.
    Cv,
    SstLicense,
    TrainerCert,
}

impl DocumentType {
    /// Stable wire tag, as persisted in requirement lists.
    pub fn as_tag(&self) -> &'static str {
        match self {
            DocumentType::IdCard => "ID_CARD",
            DocumentType::SocialSecurity => "SOCIAL_SECURITY",
            DocumentType::MedicalConcept => "MEDICAL_CONCEPT",
            DocumentType::HeightsBasicCert => "HEIGHTS_BASIC_CERT",
            DocumentType::HeightsAdvancedCert => "HEIGHTS_ADVANCED_CERT",
            DocumentType::RescueCert => "RESCUE_CERT",
            DocumentType::Cv => "CV",
            DocumentType::SstLicense => "SST_LICENSE",
            DocumentType::TrainerCert => "TRAINER_CERT",
        }
    }
}

impl core::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for DocumentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ID_CARD" => Ok(DocumentType::IdCard),
            "SOCIAL_SECURITY" => Ok(DocumentType::SocialSecurity),
            "MEDICAL_CONCEPT" => Ok(DocumentType::MedicalConcept),
            "HEIGHTS_BASIC_CERT" => Ok(DocumentType::HeightsBasicCert),
            "HEIGHTS_ADVANCED_CERT" => Ok(DocumentType::HeightsAdvancedCert),
            "RESCUE_CERT" => Ok(DocumentType::RescueCert),
            "CV" => Ok(DocumentType::Cv),
            "SST_LICENSE" => Ok(DocumentType::SstLicense),
            "TRAINER_CERT" => Ok(DocumentType::TrainerCert),
            other => Err(DomainError::validation(format!(
                "unknown document type tag: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trips_through_from_str() {
        let all = [
            DocumentType::IdCard,
            DocumentType::SocialSecurity,
            DocumentType::MedicalConcept,
            DocumentType::HeightsBasicCert,
            DocumentType::HeightsAdvancedCert,
            DocumentType::RescueCert,
            DocumentType::Cv,
            DocumentType::SstLicense,
            DocumentType::TrainerCert,
        ];
        for kind in all {
            assert_eq!(kind.as_tag().parse::<DocumentType>().unwrap(), kind);
        }
    }

    #[test]
    fn serde_uses_screaming_snake_tags() {
        let json = serde_json::to_string(&DocumentType::HeightsBasicCert).unwrap();
        assert_eq!(json, "\"HEIGHTS_BASIC_CERT\"");

        let parsed: DocumentType = serde_json::from_str("\"MEDICAL_CONCEPT\"").unwrap();
        assert_eq!(parsed, DocumentType::MedicalConcept);
    }

    #[test]
    fn unknown_tag_is_a_validation_error() {
        let err = "DRIVING_LICENSE".parse::<DocumentType>().unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("DRIVING_LICENSE")),
            _ => panic!("expected Validation error"),
        }
    }
}
