//! Domain tagging via keyword table.
//!
//! An explicit, reviewable table (keyword fragment → domain) rather than
//! regex buried in control flow, so domain experts can extend it without
//! touching the pipeline. Matching is lowercase substring on fragments,
//! which covers Italian inflection ("fattura"/"fatturare"/"fatturazione"
//! all match "fattur").

use consilium_core::models::Domain;

/// Keyword fragments per domain. Order matters only for readability.
const DOMAIN_KEYWORDS: &[(Domain, &[&str])] = &[
    (
        Domain::Vat,
        &[
            "iva",
            "fattur",
            "aliquota",
            "reverse charge",
            "detraibil",
            "esenzione",
            "corrispettiv",
            "vat",
        ],
    ),
    (
        Domain::DirectTax,
        &[
            "irpef",
            "ires",
            "irap",
            "redditi",
            "ritenuta",
            "acconto",
            "imposta sostitutiva",
            "income tax",
        ],
    ),
    (
        Domain::Payroll,
        &[
            "busta paga",
            "stipendio",
            "tfr",
            "contribut",
            "inps",
            "inail",
            "dipendent",
            "payroll",
        ],
    ),
    (
        Domain::Corporate,
        &[
            "srl", "spa", "statuto", "assemblea", "soci ", "amministrator", "quote societarie",
        ],
    ),
    (
        Domain::Accounting,
        &[
            "bilancio",
            "ammortament",
            "scritture",
            "contabil",
            "rimanenze",
            "balance sheet",
        ],
    ),
    (
        Domain::International,
        &[
            "estero",
            "tedesc",
            "francese",
            "germania",
            "francia",
            "intrastat",
            "intracomunitari",
            "esportazion",
            "importazion",
            "non residente",
            "cross-border",
            "stabile organizzazione",
        ],
    ),
];

/// Detect the domains a text touches. Deduplicated and sorted so the
/// result is stable regardless of keyword order.
pub fn detect(text: &str) -> Vec<Domain> {
    let lower = text.to_lowercase();
    let mut domains: Vec<Domain> = DOMAIN_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(domain, _)| *domain)
        .collect();
    domains.sort();
    domains.dedup();
    domains
}
