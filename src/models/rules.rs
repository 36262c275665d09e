use crate::models::builtin;
use crate::models::Requirements;
use crate::utils::DocCheckError;
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Upper bound on the compiled size of a single field pattern.
const PATTERN_SIZE_LIMIT: usize = 2 * (1 << 20);

lazy_static! {
    static ref BUILTIN_LIBRARY: PatternLibrary =
        PatternLibrary::from_defs(builtin::definitions()).expect("built-in library is valid");
}

/// Extraction rule for one field, as written in a library definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPatternDef {
    pub field: String,
    pub pattern: String,
    /// Capture group holding the value. The full match is used when absent.
    #[serde(default)]
    pub value_group: Option<usize>,
}

/// Uncompiled description of a document type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTypeDef {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub keywords: Vec<String>,
    pub required_fields: Vec<String>,
    #[serde(default)]
    pub field_patterns: Vec<FieldPatternDef>,
    #[serde(default)]
    pub security_features: Vec<String>,
    /// Terms worth two context points each during classification.
    #[serde(default)]
    pub context_terms: Vec<String>,
    /// Whether Devanagari text counts toward the structure score.
    #[serde(default)]
    pub bilingual: bool,
    /// Field whose pattern recognizes the type's identity number.
    #[serde(default)]
    pub identity_number_field: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FieldPattern {
    pub field: String,
    pub regex: Regex,
    pub value_group: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct DocumentTypeSpec {
    pub id: String,
    pub display_name: String,
    pub keywords: Vec<String>,
    pub required_fields: Vec<String>,
    pub field_patterns: Vec<FieldPattern>,
    pub security_features: Vec<String>,
    pub context_terms: Vec<String>,
    pub bilingual: bool,
    pub identity_number_field: Option<String>,
}

impl DocumentTypeSpec {
    pub fn pattern_for(&self, field: &str) -> Option<&FieldPattern> {
        self.field_patterns.iter().find(|p| p.field == field)
    }

    pub fn identity_pattern(&self) -> Option<&FieldPattern> {
        self.identity_number_field
            .as_deref()
            .and_then(|field| self.pattern_for(field))
    }

    pub fn requirements(&self) -> Requirements {
        Requirements {
            document_type: self.id.clone(),
            required_fields: self.required_fields.clone(),
            security_features: self.security_features.clone(),
            keywords: self.keywords.clone(),
        }
    }

    fn compile(def: DocumentTypeDef) -> Result<Self, DocCheckError> {
        let mut field_patterns = Vec::with_capacity(def.field_patterns.len());
        for pattern in def.field_patterns {
            let regex = RegexBuilder::new(&pattern.pattern)
                .case_insensitive(true)
                .size_limit(PATTERN_SIZE_LIMIT)
                .build()
                .map_err(|source| DocCheckError::InvalidPattern {
                    doc_type: def.id.clone(),
                    field: pattern.field.clone(),
                    source,
                })?;

            if let Some(group) = pattern.value_group {
                if group >= regex.captures_len() {
                    return Err(DocCheckError::InvalidLibrary(format!(
                        "field '{}' of '{}' uses capture group {} but the pattern has only {}",
                        pattern.field,
                        def.id,
                        group,
                        regex.captures_len() - 1
                    )));
                }
            }

            field_patterns.push(FieldPattern {
                field: pattern.field,
                regex,
                value_group: pattern.value_group,
            });
        }

        let display_name = def
            .display_name
            .unwrap_or_else(|| title_case(&def.id));

        Ok(DocumentTypeSpec {
            id: def.id,
            display_name,
            keywords: def.keywords,
            required_fields: def.required_fields,
            field_patterns,
            security_features: def.security_features,
            context_terms: def.context_terms,
            bilingual: def.bilingual,
            identity_number_field: def.identity_number_field,
        })
    }
}

/// Immutable registry of document types, in classification order.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    types: Vec<DocumentTypeSpec>,
}

impl PatternLibrary {
    /// The compiled-in library of supported Indian government documents.
    pub fn builtin() -> Self {
        BUILTIN_LIBRARY.clone()
    }

    pub fn from_defs(defs: Vec<DocumentTypeDef>) -> Result<Self, DocCheckError> {
        validate_defs(&defs)?;
        let types = defs
            .into_iter()
            .map(DocumentTypeSpec::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PatternLibrary { types })
    }

    pub fn from_json_str(json: &str) -> Result<Self, DocCheckError> {
        let defs: Vec<DocumentTypeDef> = serde_json::from_str(json)?;
        Self::from_defs(defs)
    }

    pub fn load(path: &Path) -> Result<Self, DocCheckError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn get(&self, id: &str) -> Option<&DocumentTypeSpec> {
        self.types.iter().find(|spec| spec.id == id)
    }

    pub fn lookup(&self, id: &str) -> Result<&DocumentTypeSpec, DocCheckError> {
        self.get(id).ok_or_else(|| DocCheckError::UnknownDocumentType {
            requested: id.to_string(),
            available: self.ids().iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentTypeSpec> {
        self.types.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.types.iter().map(|spec| spec.id.as_str()).collect()
    }

    pub fn requirements(&self, id: &str) -> Result<Requirements, DocCheckError> {
        self.lookup(id).map(DocumentTypeSpec::requirements)
    }

    /// The first registered type carrying an identity-number field.
    pub fn identity_type(&self) -> Option<&DocumentTypeSpec> {
        self.types.iter().find(|spec| spec.identity_pattern().is_some())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn validate_defs(defs: &[DocumentTypeDef]) -> Result<(), DocCheckError> {
    if defs.is_empty() {
        return Err(DocCheckError::InvalidLibrary(
            "library contains no document types".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for def in defs {
        if def.id.trim().is_empty() {
            return Err(DocCheckError::InvalidLibrary(
                "document type with empty id".to_string(),
            ));
        }
        if !seen.insert(def.id.as_str()) {
            return Err(DocCheckError::InvalidLibrary(format!(
                "duplicate document type id: {}",
                def.id
            )));
        }
        if def.required_fields.is_empty() {
            return Err(DocCheckError::InvalidLibrary(format!(
                "document type '{}' has no required fields",
                def.id
            )));
        }

        let mut fields = HashSet::new();
        for pattern in &def.field_patterns {
            if !fields.insert(pattern.field.as_str()) {
                return Err(DocCheckError::InvalidLibrary(format!(
                    "document type '{}' defines field '{}' twice",
                    def.id, pattern.field
                )));
            }
        }

        if let Some(field) = &def.identity_number_field {
            if !fields.contains(field.as_str()) {
                return Err(DocCheckError::InvalidLibrary(format!(
                    "identity number field '{}' of '{}' has no pattern",
                    field, def.id
                )));
            }
        }
    }

    Ok(())
}

/// "income_certificate" -> "Income Certificate".
pub fn title_case(id: &str) -> String {
    id.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
