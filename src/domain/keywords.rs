//! Built-in keyword lists.
//!
//! Entries are kept as they are commonly written; the lexicon lowercases
//! them on load.

/// Terms that may appear on any kind of document.
pub const GENERAL_KEYWORDS: &[&str] = &[
    "document",
    "file",
    "report",
    "letter",
    "email",
    "memo",
    "name",
    "address",
    "phone number",
    "email address",
    "date",
    "time",
    "subject",
    "attachment",
    "reference",
    "company",
    "organization",
    "department",
    "customer",
    "total",
    "amount",
    "payment",
    "invoice",
    "receipt",
    "description",
    "prescription",
    "notes",
    "terms and conditions",
    "signature",
    "approved",
    "rejected",
    "pending",
    "completed",
    "cancelled",
    "true",
    "false",
    "yes",
    "no",
    "on",
    "off",
    "high",
    "low",
    "important",
    "urgent",
    "confidential",
];

pub const INVOICE_KEYWORDS: &[&str] = &[
    "invoice",
    "bill",
    "receipt",
    "statement",
    "number",
    "date",
    "company name",
    "customer name",
    "billing address",
    "shipping address",
    "item",
    "description",
    "product",
    "service",
    "quantity",
    "unit price",
    "total price",
    "amount",
    "cost",
    "line item",
    "payment terms",
    "payment method",
    "subtotal",
    "tax",
    "vat",
    "gst",
    "total due",
    "balance due",
    "paid",
    "purchase order",
    "order number",
    "sales order",
    "sku",
    "uom",
    "discount",
    "shipping and handling",
    "terms and conditions",
    "notes",
    "authorized signature",
    "labor costs",
    "material costs",
    "change order",
    "retainer",
    "service fee",
    "court fees",
    "billable hours",
    "software license",
    "maintenance fee",
    "subscription fee",
    "finance charge",
    "late fee",
    "interest",
    "account number",
    "payment reference",
    "credit memo",
    "debit memo",
    "refund",
    "adjustment",
    "return",
    "sales tax",
    "shipping cost",
    "insurance cost",
    "warranty",
    "guarantee",
    "reference number",
    "tracking number",
    "net pay",
    "employee name",
    "department",
    "due upon receipt",
];

pub const PRESCRIPTION_KEYWORDS: &[&str] = &[
    "Rx",
    "dispense",
    "patient name",
    "doctor name",
    "pharmacy",
    "medication",
    "drug name",
    "generic name",
    "dosage",
    "strength",
    "form",
    "quantity",
    "refills",
    "directions",
    "instructions",
    "diagnosis",
    "sig",
    "prn",
    "as needed",
    "take with food",
    "avoid alcohol",
    "discontinue if",
    "side effects",
    "allergies",
    "not for use with",
    "expiration date",
    "mg",
    "ml",
    "tab",
    "cap",
    "g",
    "mcg",
    "BID",
    "TID",
    "QID",
    "HS",
    "PO",
    "IM",
    "SQ",
    "PRN",
    "ASA",
    "OTC",
];

pub const LAB_REPORT_KEYWORDS: &[&str] = &[
    "lab report",
    "laboratory report",
    "test results",
    "date",
    "patient name",
    "doctor name",
    "lab name",
    "accession number",
    "reference number",
    "specimen type",
    "test name",
    "test code",
    "panel",
    "profile",
    "analyte",
    "method",
    "reference range",
    "units",
    "result",
    "abnormal",
    "normal",
    "flag",
    "diagnosis",
    "impression",
    "interpretation",
    "recommendation",
    "comments",
    "performed by",
    "reviewed by",
    "released by",
    "CBC",
    "BMP",
    "CMP",
    "HDL",
    "LDL",
    "AST",
    "ALT",
    "PSA",
    "WBC",
    "RBC",
    "Hgb",
    "Hct",
    "PLT",
    "MCHC",
    "MCH",
    "MCV",
    "RDW",
    "Na",
    "K",
    "Cl",
    "CO2",
    "BUN",
    "Cr",
    "Gluc",
    "Ca",
];

/// Converts a static list into owned strings for configuration records.
pub(crate) fn to_owned_list(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
