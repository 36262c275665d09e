use crate::models::rules::{DocumentTypeDef, FieldPatternDef};

const NAME_PATTERN: &str = r"[A-Za-z\s]{3,50}";
const DISTRICT_PATTERN: &str =
    r"(mumbai|pune|nagpur|nashik|aurangabad|kolhapur|satara|sangli|solapur|ahmednagar)";
const CERTIFICATE_NUMBER_PATTERN: &str = r"(cert|certificate|प्रमाणपत्र).*?no\.?\s*:?\s*([A-Z0-9/-]+)";
const ANNUAL_INCOME_PATTERN: &str = r"(?:rs\.?|₹|rupees)\s*(\d{1,3}(?:,\d{3})*)";
const VALIDITY_DATE_PATTERN: &str = r"valid.*?(\d{2}[/-]\d{2}[/-]\d{4})";

/// Twelve digits in groups of four, as printed on an Aadhaar card.
pub const TWELVE_DIGIT_PATTERN: &str = r"\b\d{4}[\s\-]*\d{4}[\s\-]*\d{4}\b";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pattern(field: &str, pattern: &str) -> FieldPatternDef {
    FieldPatternDef {
        field: field.to_string(),
        pattern: pattern.to_string(),
        value_group: None,
    }
}

fn grouped(field: &str, regex: &str, group: usize) -> FieldPatternDef {
    FieldPatternDef {
        value_group: Some(group),
        ..pattern(field, regex)
    }
}

pub fn definitions() -> Vec<DocumentTypeDef> {
    vec![
        DocumentTypeDef {
            id: "aadhaar".to_string(),
            display_name: Some("Aadhaar Card".to_string()),
            keywords: strings(&[
                "aadhaar",
                "aadhar",
                "आधार",
                "unique identification",
                "government of india",
                "uidai",
                "uid",
                "enrollment",
                "enrolment",
                "भारत सरकार",
                "unique identity",
                "identification authority",
            ]),
            required_fields: strings(&["12_digit_number", "name", "dob"]),
            field_patterns: vec![
                pattern("12_digit_number", TWELVE_DIGIT_PATTERN),
                pattern("name", r"[A-Za-z\s]{2,50}"),
                pattern("dob", r"(\d{1,2}[/-]\d{1,2}[/-]\d{4}|\d{4}[/-]\d{1,2}[/-]\d{1,2})"),
                pattern("address", r"(address|पता|s/o|d/o|w/o)"),
            ],
            security_features: strings(&["hologram", "qr code", "secure paper", "watermark"]),
            context_terms: strings(&[
                "male",
                "female",
                "पुरुष",
                "महिला",
                "address",
                "पता",
                "dob",
                "year of birth",
            ]),
            bilingual: false,
            identity_number_field: Some("12_digit_number".to_string()),
        },
        DocumentTypeDef {
            id: "caste_certificate".to_string(),
            display_name: Some("Caste Certificate".to_string()),
            keywords: strings(&[
                "caste certificate",
                "जात प्रमाणपत्र",
                "government of maharashtra",
                "tahsildar",
                "collector",
            ]),
            required_fields: strings(&[
                "name",
                "caste",
                "district",
                "signature_stamp",
                "certificate_number",
            ]),
            field_patterns: vec![
                pattern("name", NAME_PATTERN),
                pattern(
                    "caste",
                    r"(SC|ST|OBC|VJNT|SBC|scheduled caste|scheduled tribe|other backward class)",
                ),
                pattern("district", DISTRICT_PATTERN),
                grouped("certificate_number", CERTIFICATE_NUMBER_PATTERN, 2),
            ],
            security_features: strings(&["government seal", "official signature", "letterhead"]),
            context_terms: strings(&[
                "caste", "जात", "sc", "st", "obc", "backward", "scheduled", "tribe",
            ]),
            bilingual: true,
            identity_number_field: None,
        },
        DocumentTypeDef {
            id: "income_certificate".to_string(),
            display_name: Some("Income Certificate".to_string()),
            keywords: strings(&[
                "income certificate",
                "उत्पन्न प्रमाणपत्र",
                "annual income",
                "tahsildar",
                "revenue department",
            ]),
            required_fields: strings(&[
                "name",
                "annual_income",
                "issuing_authority",
                "certificate_number",
                "validity_date",
            ]),
            field_patterns: vec![
                pattern("name", NAME_PATTERN),
                grouped("annual_income", ANNUAL_INCOME_PATTERN, 1),
                grouped("certificate_number", CERTIFICATE_NUMBER_PATTERN, 2),
                pattern("validity_date", VALIDITY_DATE_PATTERN),
            ],
            security_features: strings(&["government seal", "official signature", "revenue stamp"]),
            context_terms: strings(&["income", "उत्पन्न", "salary", "annual", "rupees", "₹", "rs"]),
            bilingual: true,
            identity_number_field: None,
        },
        DocumentTypeDef {
            id: "domicile_certificate".to_string(),
            display_name: Some("Domicile Certificate".to_string()),
            keywords: strings(&[
                "domicile certificate",
                "निवास प्रमाणपत्र",
                "residence certificate",
                "maharashtra domicile",
            ]),
            required_fields: strings(&[
                "name",
                "address",
                "district",
                "issuing_authority",
                "certificate_number",
            ]),
            field_patterns: vec![
                pattern("name", NAME_PATTERN),
                pattern("address", r"(address|पता|निवास)"),
                pattern("district", DISTRICT_PATTERN),
                grouped("certificate_number", CERTIFICATE_NUMBER_PATTERN, 2),
            ],
            security_features: strings(&["government seal", "official signature", "letterhead"]),
            context_terms: vec![],
            bilingual: true,
            identity_number_field: None,
        },
        DocumentTypeDef {
            id: "birth_certificate".to_string(),
            display_name: Some("Birth Certificate".to_string()),
            keywords: strings(&[
                "birth certificate",
                "जन्म प्रमाणपत्र",
                "registrar",
                "birth registration",
            ]),
            required_fields: strings(&[
                "name",
                "dob",
                "place_of_birth",
                "parents_name",
                "registration_number",
            ]),
            field_patterns: vec![
                pattern("name", NAME_PATTERN),
                pattern("dob", r"\d{2}[/-]\d{2}[/-]\d{4}"),
                pattern("place_of_birth", r"(born at|birth place|जन्म स्थान)"),
                pattern("parents_name", r"(father|mother|पिता|माता)"),
                pattern("registration_number", r"(reg|registration).*?no\.?\s*:?\s*([A-Z0-9/-]+)"),
            ],
            security_features: strings(&["registrar seal", "official signature", "security paper"]),
            context_terms: vec![],
            bilingual: false,
            identity_number_field: None,
        },
        DocumentTypeDef {
            id: "non_creamy_layer".to_string(),
            display_name: Some("Non-Creamy Layer Certificate".to_string()),
            keywords: strings(&[
                "non creamy layer",
                "non-creamy layer",
                "obc certificate",
                "creamy layer",
            ]),
            required_fields: strings(&[
                "name",
                "caste",
                "annual_income",
                "issuing_authority",
                "validity_date",
            ]),
            field_patterns: vec![
                pattern("name", NAME_PATTERN),
                pattern("caste", r"(OBC|other backward class|backward class)"),
                grouped("annual_income", ANNUAL_INCOME_PATTERN, 1),
                pattern("validity_date", VALIDITY_DATE_PATTERN),
            ],
            security_features: strings(&["government seal", "official signature", "letterhead"]),
            context_terms: vec![],
            bilingual: false,
            identity_number_field: None,
        },
    ]
}
