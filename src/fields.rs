//! # Field Variant Tables
//!
//! ## Purpose
//! Per-attribute ordered lists of the field names each source has used
//! across ingestion batches. Schema drift (`judge` vs `Judge`,
//! `decision date` vs `Decision Date`) is captured here as data; the
//! predicate builder ORs a clause across a table's entries and the
//! normalizer resolves a logical attribute by taking the first non-null
//! entry in table order.
//!
//! Every projection below lists exactly the fields its normalizer reads.

/// Free-text candidate fields shared by both judgement sources.
pub const JUDGEMENT_TEXT_FIELDS: &[&str] = &[
    "all_text",
    "content",
    "text",
    "Text",
    "title",
    "Title",
    "case title",
    "file_name",
    "file name",
];

/// Free-text candidate fields for both statute sources.
pub const STATUTE_TEXT_FIELDS: &[&str] = &[
    "Section Text",
    "Section Title",
    "Name of statute",
    "Name of Statute",
];

// Supreme Court attributes
pub const SC_FILE_NAME_FIELDS: &[&str] = &["file_name", "title"];
pub const SC_JUDGE_FIELDS: &[&str] = &["judgement_by", "bench"];
pub const SC_TITLE_FIELDS: &[&str] = &["file_name", "title"];
pub const SC_DATE_FIELDS: &[&str] = &["judgment_dates", "date_of_judgment", "doc_date"];
pub const SC_CONTENT_FIELDS: &[&str] = &["content", "all_text"];

// High Court attributes
pub const HC_COURT_NAME_FIELDS: &[&str] = &["Court Name", "Court name"];
pub const HC_TITLE_FIELDS: &[&str] = &["title", "Title", "case title", "file_name", "file name"];
pub const HC_CASE_NUMBER_FIELDS: &[&str] = &["case number", "Case Number"];
pub const HC_CNR_FIELDS: &[&str] = &["CNR", "cnr"];
pub const HC_JUDGE_FIELDS: &[&str] = &["judge", "Judge"];
pub const HC_DATE_FIELDS: &[&str] = &["decision date", "Decision Date"];
pub const HC_DISPOSAL_FIELDS: &[&str] = &["disposal nature", "Disposal Nature"];
pub const HC_TEXT_FIELDS: &[&str] = &["text", "Text", "all_text"];

// Statute attributes (shared by central and state acts)
pub const STATUTE_NAME_FIELDS: &[&str] = &["Name of statute", "Name of Statute"];
pub const SECTION_NUMBER_FIELDS: &[&str] = &["Section Number"];
pub const SECTION_TITLE_FIELDS: &[&str] = &["Section Title"];
pub const SECTION_TEXT_FIELDS: &[&str] = &["Section Text"];
pub const STATE_NAME_FIELDS: &[&str] = &["State Name"];

/// Fields fetched for Supreme Court records.
pub const SC_PROJECTION: &[&str] = &[
    "file_name",
    "title",
    "case_no",
    "citation",
    "bench",
    "judgement_by",
    "content",
    "all_text",
    "judgment_dates",
    "date_of_judgment",
    "doc_date",
];

/// Fields fetched for High Court records.
pub const HC_PROJECTION: &[&str] = &[
    "Court Name",
    "Court name",
    "title",
    "Title",
    "case title",
    "case number",
    "Case Number",
    "CNR",
    "cnr",
    "decision date",
    "Decision Date",
    "disposal nature",
    "Disposal Nature",
    "judge",
    "Judge",
    "text",
    "Text",
    "all_text",
];

/// Fields fetched for central act records.
pub const CENTRAL_PROJECTION: &[&str] = &[
    "Name of statute",
    "Name of Statute",
    "Section Number",
    "Section Title",
    "Section Text",
];

/// Fields fetched for state act records.
pub const STATE_PROJECTION: &[&str] = &[
    "State Name",
    "Name of statute",
    "Name of Statute",
    "Section Number",
    "Section Title",
    "Section Text",
];
