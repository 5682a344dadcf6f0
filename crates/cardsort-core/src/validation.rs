//! Template and result validation: structural checks and business rules.
//!
//! Validation runs over the raw JSON value and collects every failure
//! before giving up, so a builder UI can show the user the complete list.
//! Only a clean sweep proceeds to typed deserialization.

use chrono::DateTime;
use serde_json::Value;

use crate::checksum::is_valid_checksum_format;
use crate::error::ValidationErrors;
use crate::ids::{CardId, CategoryId, TemplateId};
use crate::model::{StudyResult, StudyTemplate};

/// Maximum length for labels and titles.
pub const MAX_LABEL_LEN: usize = 100;
/// Maximum length for descriptions.
pub const MAX_DESCRIPTION_LEN: usize = 500;
/// Maximum number of cards in a template.
pub const MAX_CARDS: usize = 100;
/// Maximum number of categories in a template.
pub const MAX_CATEGORIES: usize = 50;

/// Validate a template document.
///
/// Returns the typed template on success, or every rule violation found.
pub fn validate_template(data: &Value) -> Result<StudyTemplate, ValidationErrors> {
    let mut errors = Vec::new();

    let Some(root) = data.as_object() else {
        return Err(ValidationErrors(vec!["template must be a JSON object".into()]));
    };

    check_schema_version(root.get("schemaVersion"), &mut errors);

    match root.get("templateId").and_then(Value::as_str) {
        Some(id) => {
            if let Err(e) = TemplateId::parse(id) {
                errors.push(format!("templateId: {e}"));
            }
        }
        None => errors.push("templateId is required and must be a string".into()),
    }

    let sort_type = check_study(root.get("study"), &mut errors);
    let category_count = check_categories(root.get("categories"), &mut errors);
    check_cards(root.get("cards"), &mut errors);
    check_datetime(root.get("createdAt"), "createdAt", &mut errors);

    // Cross-field rule: a closed sort needs somewhere to put the cards.
    if sort_type == Some("closed") && category_count == Some(0) {
        errors.push("closed sort requires at least one category".into());
    }

    finish(data, errors)
}

/// Validate a result document.
pub fn validate_result(data: &Value) -> Result<StudyResult, ValidationErrors> {
    let mut errors = Vec::new();

    let Some(root) = data.as_object() else {
        return Err(ValidationErrors(vec!["result must be a JSON object".into()]));
    };

    check_schema_version(root.get("schemaVersion"), &mut errors);

    match root.get("templateId").and_then(Value::as_str) {
        Some(id) => {
            if let Err(e) = TemplateId::parse(id) {
                errors.push(format!("templateId: {e}"));
            }
        }
        None => errors.push("templateId is required and must be a string".into()),
    }

    // The checksum format gate runs before any comparison is ever attempted.
    match root.get("templateChecksumSha256").and_then(Value::as_str) {
        Some(sum) if is_valid_checksum_format(sum) => {}
        Some(_) => errors
            .push("templateChecksumSha256 must be exactly 64 lowercase hex characters".into()),
        None => errors.push("templateChecksumSha256 is required and must be a string".into()),
    }

    check_participant(root.get("participant"), &mut errors);
    check_session(root.get("session"), &mut errors);
    check_output(root.get("output"), &mut errors);
    check_telemetry(root.get("telemetry"), &mut errors);

    finish(data, errors)
}

/// Deserialize into the typed model once the rule sweep is clean.
fn finish<T: serde::de::DeserializeOwned>(
    data: &Value,
    mut errors: Vec<String>,
) -> Result<T, ValidationErrors> {
    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }
    match serde_json::from_value(data.clone()) {
        Ok(typed) => Ok(typed),
        Err(e) => {
            errors.push(format!("malformed document: {e}"));
            Err(ValidationErrors(errors))
        }
    }
}

fn check_schema_version(value: Option<&Value>, errors: &mut Vec<String>) {
    match value.and_then(Value::as_str) {
        Some(version) => {
            if version.parse::<semver::Version>().is_err() {
                errors.push(format!("schemaVersion {version:?} is not valid semver"));
            }
        }
        None => errors.push("schemaVersion is required and must be a string".into()),
    }
}

fn check_datetime(value: Option<&Value>, field: &str, errors: &mut Vec<String>) {
    match value.and_then(Value::as_str) {
        Some(s) => {
            if DateTime::parse_from_rfc3339(s).is_err() {
                errors.push(format!("{field} is not a valid ISO 8601 datetime: {s:?}"));
            }
        }
        None => errors.push(format!("{field} is required and must be a string")),
    }
}

fn check_label(value: Option<&Value>, field: &str, errors: &mut Vec<String>) {
    match value.and_then(Value::as_str) {
        Some("") => errors.push(format!("{field} must not be empty")),
        Some(s) if s.chars().count() > MAX_LABEL_LEN => {
            errors.push(format!("{field} must be {MAX_LABEL_LEN} characters or less"))
        }
        Some(_) => {}
        None => errors.push(format!("{field} is required and must be a string")),
    }
}

fn check_description(value: Option<&Value>, field: &str, errors: &mut Vec<String>) {
    match value.and_then(Value::as_str) {
        Some(s) if s.chars().count() > MAX_DESCRIPTION_LEN => errors.push(format!(
            "{field} must be {MAX_DESCRIPTION_LEN} characters or less"
        )),
        Some(_) => {}
        None => errors.push(format!("{field} is required and must be a string")),
    }
}

fn check_bool(value: Option<&Value>, field: &str, errors: &mut Vec<String>) {
    if value.and_then(Value::as_bool).is_none() {
        errors.push(format!("{field} is required and must be a boolean"));
    }
}

/// Returns the sortType string so the caller can apply cross-field rules.
fn check_study<'a>(value: Option<&'a Value>, errors: &mut Vec<String>) -> Option<&'a str> {
    let Some(study) = value.and_then(Value::as_object) else {
        errors.push("study is required and must be an object".into());
        return None;
    };

    check_label(study.get("title"), "study.title", errors);
    check_description(study.get("description"), "study.description", errors);

    match study.get("language").and_then(Value::as_str) {
        Some(lang) if is_language_code(lang) => {}
        Some(lang) => errors.push(format!("study.language {lang:?} is not a valid language code")),
        None => errors.push("study.language is required and must be a string".into()),
    }

    let sort_type = study.get("sortType").and_then(Value::as_str);
    match sort_type {
        Some("open" | "closed" | "hybrid") => {}
        Some(other) => errors.push(format!(
            "study.sortType must be open, closed, or hybrid, got {other:?}"
        )),
        None => errors.push("study.sortType is required and must be a string".into()),
    }

    match study.get("settings").and_then(Value::as_object) {
        Some(settings) => {
            check_bool(settings.get("randomizeCardOrder"), "settings.randomizeCardOrder", errors);
            check_bool(
                settings.get("allowCreateCategories"),
                "settings.allowCreateCategories",
                errors,
            );
            check_bool(
                settings.get("requireAllCardsSorted"),
                "settings.requireAllCardsSorted",
                errors,
            );
            check_bool(settings.get("enableUnsureBucket"), "settings.enableUnsureBucket", errors);
            match settings.get("unsureBucketLabel").and_then(Value::as_str) {
                Some(s) if s.chars().count() > MAX_LABEL_LEN => errors.push(format!(
                    "settings.unsureBucketLabel must be {MAX_LABEL_LEN} characters or less"
                )),
                Some(_) => {}
                None => errors
                    .push("settings.unsureBucketLabel is required and must be a string".into()),
            }
        }
        None => errors.push("study.settings is required and must be an object".into()),
    }

    if study.get("instructionsMarkdown").and_then(Value::as_str).is_none() {
        errors.push("study.instructionsMarkdown is required and must be a string".into());
    }

    sort_type
}

/// Returns the category count so the caller can apply cross-field rules.
fn check_categories(value: Option<&Value>, errors: &mut Vec<String>) -> Option<usize> {
    let Some(categories) = value.and_then(Value::as_array) else {
        errors.push("categories is required and must be an array".into());
        return None;
    };

    if categories.len() > MAX_CATEGORIES {
        errors.push(format!("maximum {MAX_CATEGORIES} categories allowed"));
    }

    let mut seen = std::collections::HashSet::new();
    for (i, category) in categories.iter().enumerate() {
        let Some(obj) = category.as_object() else {
            errors.push(format!("categories[{i}] must be an object"));
            continue;
        };
        match obj.get("id").and_then(Value::as_str) {
            Some(id) => {
                if let Err(e) = CategoryId::parse(id) {
                    errors.push(format!("categories[{i}].id: {e}"));
                } else if !seen.insert(id) {
                    errors.push(format!("categories[{i}].id duplicates {id:?}"));
                }
            }
            None => errors.push(format!("categories[{i}].id is required and must be a string")),
        }
        check_label(obj.get("label"), &format!("categories[{i}].label"), errors);
        check_description(obj.get("description"), &format!("categories[{i}].description"), errors);
    }

    Some(categories.len())
}

fn check_cards(value: Option<&Value>, errors: &mut Vec<String>) {
    let Some(cards) = value.and_then(Value::as_array) else {
        errors.push("cards is required and must be an array".into());
        return;
    };

    if cards.is_empty() {
        errors.push("at least one card is required".into());
    }
    if cards.len() > MAX_CARDS {
        errors.push(format!("maximum {MAX_CARDS} cards allowed"));
    }

    let mut seen = std::collections::HashSet::new();
    for (i, card) in cards.iter().enumerate() {
        let Some(obj) = card.as_object() else {
            errors.push(format!("cards[{i}] must be an object"));
            continue;
        };
        match obj.get("id").and_then(Value::as_str) {
            Some(id) => {
                if let Err(e) = CardId::parse(id) {
                    errors.push(format!("cards[{i}].id: {e}"));
                } else if !seen.insert(id) {
                    errors.push(format!("cards[{i}].id duplicates {id:?}"));
                }
            }
            None => errors.push(format!("cards[{i}].id is required and must be a string")),
        }
        check_label(obj.get("label"), &format!("cards[{i}].label"), errors);
        check_description(obj.get("description"), &format!("cards[{i}].description"), errors);
        if let Some(meta) = obj.get("meta") {
            if !meta.is_object() {
                errors.push(format!("cards[{i}].meta must be an object"));
            }
        }
    }
}

fn check_participant(value: Option<&Value>, errors: &mut Vec<String>) {
    match value.and_then(Value::as_object) {
        Some(participant) => {
            check_label(participant.get("name"), "participant.name", errors);
        }
        None => errors.push("participant is required and must be an object".into()),
    }
}

fn check_session(value: Option<&Value>, errors: &mut Vec<String>) {
    let Some(session) = value.and_then(Value::as_object) else {
        errors.push("session is required and must be an object".into());
        return;
    };

    check_datetime(session.get("startedAt"), "session.startedAt", errors);
    check_datetime(session.get("completedAt"), "session.completedAt", errors);

    match session.get("durationMs").and_then(Value::as_i64) {
        Some(ms) if ms < 0 => errors.push("session.durationMs cannot be negative".into()),
        Some(_) => {}
        None => errors.push("session.durationMs is required and must be an integer".into()),
    }

    match session.get("timezone").and_then(Value::as_str) {
        Some("") => errors.push("session.timezone must not be empty".into()),
        Some(_) => {}
        None => errors.push("session.timezone is required and must be a string".into()),
    }

    if session.get("userAgent").and_then(Value::as_str).is_none() {
        errors.push("session.userAgent is required and must be a string".into());
    }

    match session.get("viewport").and_then(Value::as_object) {
        Some(viewport) => {
            for dim in ["w", "h"] {
                match viewport.get(dim).and_then(Value::as_i64) {
                    Some(v) if v <= 0 => {
                        errors.push(format!("session.viewport.{dim} must be positive"))
                    }
                    Some(_) => {}
                    None => errors.push(format!(
                        "session.viewport.{dim} is required and must be an integer"
                    )),
                }
            }
        }
        None => errors.push("session.viewport is required and must be an object".into()),
    }
}

fn check_output(value: Option<&Value>, errors: &mut Vec<String>) {
    let Some(output) = value.and_then(Value::as_object) else {
        errors.push("output is required and must be an object".into());
        return;
    };

    match output.get("groups").and_then(Value::as_array) {
        Some(groups) => {
            for (i, group) in groups.iter().enumerate() {
                let Some(obj) = group.as_object() else {
                    errors.push(format!("output.groups[{i}] must be an object"));
                    continue;
                };
                if obj.get("categoryId").and_then(Value::as_str).is_none() {
                    errors.push(format!(
                        "output.groups[{i}].categoryId is required and must be a string"
                    ));
                }
                if obj.get("cardIdsInOrder").and_then(Value::as_array).is_none() {
                    errors.push(format!(
                        "output.groups[{i}].cardIdsInOrder is required and must be an array"
                    ));
                }
            }
        }
        None => errors.push("output.groups is required and must be an array".into()),
    }

    if output.get("unsureCardIds").and_then(Value::as_array).is_none() {
        errors.push("output.unsureCardIds is required and must be an array".into());
    }
}

fn check_telemetry(value: Option<&Value>, errors: &mut Vec<String>) {
    let Some(telemetry) = value.and_then(Value::as_object) else {
        errors.push("telemetry is required and must be an object".into());
        return;
    };

    for field in ["movesCount", "undoCount"] {
        match telemetry.get(field).and_then(Value::as_i64) {
            Some(n) if n < 0 => errors.push(format!("telemetry.{field} cannot be negative")),
            Some(_) => {}
            None => errors.push(format!("telemetry.{field} is required and must be an integer")),
        }
    }
}

/// ISO 639-1 code, optionally with an uppercase region ("en", "en-US").
fn is_language_code(s: &str) -> bool {
    let bytes = s.as_bytes();
    match bytes.len() {
        2 => bytes.iter().all(u8::is_ascii_lowercase),
        5 => {
            bytes[0].is_ascii_lowercase()
                && bytes[1].is_ascii_lowercase()
                && bytes[2] == b'-'
                && bytes[3].is_ascii_uppercase()
                && bytes[4].is_ascii_uppercase()
        }
        _ => false,
    }
}
