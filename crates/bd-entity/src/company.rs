// company.rs — Company: a client organization tasks are performed for.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::{contains_ignore_case, Entity, EntityKind};

/// Company classification used by the list filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CompanyType {
    A,
    B,
    C,
}

impl fmt::Display for CompanyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanyType::A => write!(f, "A"),
            CompanyType::B => write!(f, "B"),
            CompanyType::C => write!(f, "C"),
        }
    }
}

/// A client company. Referenced by `Task.company_id`.
///
/// The extended metadata fields are optional and omitted from JSON when
/// absent — most companies only carry the core identification fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Company {
    /// Server-assigned identifier.
    pub id: String,
    pub name: String,
    /// Tax identifier.
    pub nit: String,
    /// Contact email.
    pub email: String,
    pub company_type: CompanyType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cellphone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dian: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounting_software: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail_server: Option<String>,
}

impl Company {
    /// List filter: matches a specific company type, or everything when
    /// no filter is selected.
    pub fn matches_type(&self, filter: Option<CompanyType>) -> bool {
        filter.map_or(true, |t| self.company_type == t)
    }
}

impl Entity for Company {
    const KIND: EntityKind = EntityKind::Company;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn matches(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query)
            || contains_ignore_case(&self.nit, query)
            || contains_ignore_case(&self.email, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_company() -> Company {
        Company {
            id: "c1".to_string(),
            name: "Acme Ltda".to_string(),
            nit: "900123456-7".to_string(),
            email: "billing@acme.co".to_string(),
            company_type: CompanyType::B,
            cellphone: None,
            dian: None,
            legal_signature: None,
            accounting_software: None,
            mail_server: None,
        }
    }

    #[test]
    fn optional_metadata_omitted_from_json() {
        let company = test_company();
        let json = serde_json::to_string(&company).unwrap();
        assert!(!json.contains("cellphone"));
        assert!(!json.contains("mail_server"));
        // Deserializing JSON without the optional fields should produce None.
        let restored: Company = serde_json::from_str(&json).unwrap();
        assert!(restored.dian.is_none());
    }

    #[test]
    fn extended_metadata_round_trip() {
        let mut company = test_company();
        company.accounting_software = Some("Siigo".to_string());
        let json = serde_json::to_string(&company).unwrap();
        assert!(json.contains("\"accounting_software\""));
        let restored: Company = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.accounting_software, Some("Siigo".to_string()));
    }

    #[test]
    fn matches_name_nit_and_email() {
        let company = test_company();
        assert!(company.matches("acme"));
        assert!(company.matches("900123"));
        assert!(company.matches("BILLING"));
        assert!(!company.matches("globex"));
    }

    #[test]
    fn type_filter() {
        let company = test_company();
        assert!(company.matches_type(None));
        assert!(company.matches_type(Some(CompanyType::B)));
        assert!(!company.matches_type(Some(CompanyType::A)));
    }
}
