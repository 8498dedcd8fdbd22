//! Entity Registry: canonical name resolution, per-type scoring weight,
//! per-type category (spec §4.1).
//!
//! Process-wide read-only state, built once and shared behind `Lazy`
//! statics. This is the single source of truth for entity semantics; no
//! detector or pipeline stage keeps its own copy of weights or categories.

use crate::types::Category;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const DEFAULT_WEIGHT: u8 = 1;

/// Detector-specific names rewritten to canonical form before merging.
///
/// `ID`/`IDENTIFIER` mapping to `MRN` is intentionally aggressive — carried
/// over unchanged from the reference implementation's alias table (a
/// Stanford PHI-BERT convention). See DESIGN.md.
static ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("PERSON", "NAME"),
        ("PER", "NAME"),
        ("US_SSN", "SSN"),
        ("GPE", "ADDRESS"),
        ("LOC", "ADDRESS"),
        ("CREDITCARDNUMBER", "CREDIT_CARD"),
        ("CREDIT_CARD_NUMBER", "CREDIT_CARD"),
        ("PHONE_NUMBER", "PHONE"),
        ("EMAIL_ADDRESS", "EMAIL"),
        ("DOCTOR", "NAME_PROVIDER"),
        ("PHYSICIAN", "NAME_PROVIDER"),
        ("NURSE", "NAME_PROVIDER"),
        ("STAFF", "NAME_PROVIDER"),
        ("HCW", "NAME_PROVIDER"),
        ("PATIENT", "NAME_PATIENT"),
        ("ID", "MRN"),
        ("IDENTIFIER", "MRN"),
        ("ZIPCODE", "ZIP"),
        ("ZIP_CODE", "ZIP"),
        ("DRIVERS_LICENSE", "DRIVER_LICENSE"),
        ("SWIFT", "SWIFT_BIC"),
        ("BIC", "SWIFT_BIC"),
        ("BTC_ADDRESS", "BITCOIN_ADDRESS"),
        ("ETH_ADDRESS", "ETHEREUM_ADDRESS"),
    ]
    .into_iter()
    .collect()
});

static WEIGHTS: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| {
    use Category::*;
    let _ = DirectIdentifier; // silence unused-import lint when cfg varies
    [
        ("SSN", 10u8),
        ("CREDIT_CARD", 9),
        ("PASSPORT", 9),
        ("DRIVER_LICENSE", 8),
        ("MILITARY_ID", 8),
        ("BANK_ROUTING", 7),
        ("ACCOUNT_NUMBER", 7),
        ("IBAN", 7),
        ("MRN", 7),
        ("NPI", 5),
        ("DEA", 6),
        ("HEALTH_PLAN_ID", 6),
        ("MEMBER_ID", 5),
        ("NAME", 4),
        ("NAME_PATIENT", 6),
        ("NAME_PROVIDER", 3),
        ("NAME_RELATIVE", 4),
        ("ADDRESS", 4),
        ("STREET", 3),
        ("CITY", 2),
        ("STATE", 1),
        ("ZIP", 2),
        ("PHONE", 4),
        ("FAX", 3),
        ("EMAIL", 4),
        ("DOB", 6),
        ("DATE", 2),
        ("AGE", 2),
        ("EMPLOYER", 2),
        ("EMPLOYEE_ID", 3),
        ("CUSIP", 7),
        ("ISIN", 7),
        ("SEDOL", 6),
        ("LEI", 5),
        ("FIGI", 5),
        ("SWIFT_BIC", 6),
        ("BITCOIN_ADDRESS", 7),
        ("ETHEREUM_ADDRESS", 7),
        ("LITECOIN_ADDRESS", 6),
        ("DOGECOIN_ADDRESS", 5),
        ("XRP_ADDRESS", 5),
        ("SOLANA_ADDRESS", 5),
        ("CARDANO_ADDRESS", 5),
        ("SEED_PHRASE", 10),
        ("API_KEY", 8),
        ("AWS_ACCESS_KEY", 9),
        ("AWS_SECRET_KEY", 10),
        ("GITHUB_TOKEN", 8),
        ("GITLAB_TOKEN", 8),
        ("SLACK_TOKEN", 7),
        ("STRIPE_KEY", 9),
        ("PRIVATE_KEY", 10),
        ("JWT", 7),
        ("PASSWORD", 8),
        ("DATABASE_URL", 9),
        ("CLASSIFICATION_MARKING", 10),
        ("FACILITY", 2),
        ("LAB_TEST", 1),
        ("DIAGNOSIS", 3),
        ("MEDICATION", 2),
        ("PROCEDURE", 2),
        ("PAYER", 2),
        ("PHYSICAL_DESC", 1),
        ("DRUG", 2),
    ]
    .into_iter()
    .collect()
});

static CATEGORIES: Lazy<HashMap<&'static str, Category>> = Lazy::new(|| {
    use Category::*;
    [
        ("SSN", DirectIdentifier),
        ("PASSPORT", DirectIdentifier),
        ("DRIVER_LICENSE", DirectIdentifier),
        ("MILITARY_ID", DirectIdentifier),
        ("NAME", DirectIdentifier),
        ("NAME_PATIENT", DirectIdentifier),
        ("NAME_PROVIDER", QuasiIdentifier),
        ("NAME_RELATIVE", QuasiIdentifier),
        ("ADDRESS", QuasiIdentifier),
        ("STREET", QuasiIdentifier),
        ("CITY", QuasiIdentifier),
        ("STATE", QuasiIdentifier),
        ("ZIP", QuasiIdentifier),
        ("DOB", QuasiIdentifier),
        ("DATE", QuasiIdentifier),
        ("AGE", QuasiIdentifier),
        ("EMPLOYER", QuasiIdentifier),
        ("EMPLOYEE_ID", QuasiIdentifier),
        ("PHONE", Contact),
        ("FAX", Contact),
        ("EMAIL", Contact),
        ("CREDIT_CARD", Financial),
        ("BANK_ROUTING", Financial),
        ("ACCOUNT_NUMBER", Financial),
        ("IBAN", Financial),
        ("CUSIP", Financial),
        ("ISIN", Financial),
        ("SEDOL", Financial),
        ("LEI", Financial),
        ("FIGI", Financial),
        ("SWIFT_BIC", Financial),
        ("BITCOIN_ADDRESS", Financial),
        ("ETHEREUM_ADDRESS", Financial),
        ("LITECOIN_ADDRESS", Financial),
        ("DOGECOIN_ADDRESS", Financial),
        ("XRP_ADDRESS", Financial),
        ("SOLANA_ADDRESS", Financial),
        ("CARDANO_ADDRESS", Financial),
        ("SEED_PHRASE", Financial),
        ("MRN", HealthInfo),
        ("NPI", HealthInfo),
        ("DEA", HealthInfo),
        ("HEALTH_PLAN_ID", HealthInfo),
        ("MEMBER_ID", HealthInfo),
        ("API_KEY", Credential),
        ("AWS_ACCESS_KEY", Credential),
        ("AWS_SECRET_KEY", Credential),
        ("GITHUB_TOKEN", Credential),
        ("GITLAB_TOKEN", Credential),
        ("SLACK_TOKEN", Credential),
        ("STRIPE_KEY", Credential),
        ("PRIVATE_KEY", Credential),
        ("JWT", Credential),
        ("PASSWORD", Credential),
        ("DATABASE_URL", Credential),
        ("CLASSIFICATION_MARKING", ClassificationMarking),
        ("LAB_TEST", ClinicalContext),
        ("DIAGNOSIS", ClinicalContext),
        ("MEDICATION", ClinicalContext),
        ("PROCEDURE", ClinicalContext),
        ("PAYER", ClinicalContext),
        ("PHYSICAL_DESC", ClinicalContext),
        ("DRUG", ClinicalContext),
    ]
    .into_iter()
    .collect()
});

/// Strip, uppercase, look up the alias table, return canonical form.
/// Unknown names pass through unchanged, as spec §4.1 requires.
pub fn normalize_type(name: &str, _source: Option<&str>) -> String {
    let upper = name.trim().to_ascii_uppercase();
    match ALIASES.get(upper.as_str()) {
        Some(canonical) => canonical.to_string(),
        None => upper,
    }
}

pub fn get_weight(entity_type: &str) -> u8 {
    let canonical = normalize_type(entity_type, None);
    *WEIGHTS.get(canonical.as_str()).unwrap_or(&DEFAULT_WEIGHT)
}

pub fn get_category(entity_type: &str) -> Category {
    let canonical = normalize_type(entity_type, None);
    *CATEGORIES.get(canonical.as_str()).unwrap_or(&Category::Other)
}
