//! Template and result document exchange.
//!
//! The actual file plumbing lives in the embedding application; this
//! module owns the contract around it: imports are validated with the
//! full error list before anything touches a session, exports re-validate
//! their own output, and results stay bound to the template content they
//! came from via the checksum.

use thiserror::Error;

use cardsort_core::{
    is_valid_checksum_format, validate_result, validate_template, verify_checksum, CoreError,
    Sha256Checksum, StudyResult, StudyTemplate, ValidationErrors,
};
use cardsort_session::{SessionEngine, SessionError};

/// Errors from importing a document.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The input is not JSON at all.
    #[error("not valid JSON: {0}")]
    Parse(String),

    /// The JSON parsed but failed validation; every problem is listed.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// The template validated but its checksum could not be computed.
    #[error("checksum failed: {0}")]
    Checksum(#[from] CoreError),
}

/// Errors from exporting a document.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The document failed its own validation; refusing to write it out.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error("serialization failed: {0}")]
    Serialize(String),
}

/// A validated template together with its content checksum, ready to hand
/// to a session engine.
#[derive(Debug, Clone)]
pub struct LoadedTemplate {
    pub template: StudyTemplate,
    pub checksum: Sha256Checksum,
}

impl LoadedTemplate {
    /// Start a sorting session over this template. The checksum computed
    /// at import time travels with it; the engine never recomputes it.
    pub fn start_session(self) -> Result<SessionEngine, SessionError> {
        let mut engine = SessionEngine::new();
        engine.load_template_with_checksum(self.template, self.checksum)?;
        Ok(engine)
    }
}

/// Parse and validate a template document, then bind its checksum.
///
/// No session state is created here: a document that fails validation is
/// rejected whole, so a partial or corrupt session can never exist.
pub fn import_template(json: &str) -> Result<LoadedTemplate, ImportError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ImportError::Parse(e.to_string()))?;
    let template = validate_template(&value)?;
    let checksum = Sha256Checksum::compute(&template)?;
    tracing::debug!(template_id = %template.template_id, %checksum, "template imported");
    Ok(LoadedTemplate { template, checksum })
}

/// Serialize a template for download. The output is validated before it
/// is returned, so an exported file always re-imports cleanly.
pub fn export_template(template: &StudyTemplate) -> Result<String, ExportError> {
    let value =
        serde_json::to_value(template).map_err(|e| ExportError::Serialize(e.to_string()))?;
    validate_template(&value)?;
    serde_json::to_string_pretty(&value).map_err(|e| ExportError::Serialize(e.to_string()))
}

/// Serialize a result for download, confirming its shape first.
pub fn export_result(result: &StudyResult) -> Result<String, ExportError> {
    let value = serde_json::to_value(result).map_err(|e| ExportError::Serialize(e.to_string()))?;
    validate_result(&value)?;
    serde_json::to_string_pretty(&value).map_err(|e| ExportError::Serialize(e.to_string()))
}

/// Parse and validate a result document.
pub fn import_result(json: &str) -> Result<StudyResult, ImportError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ImportError::Parse(e.to_string()))?;
    Ok(validate_result(&value)?)
}

/// Check that a result was derived from exactly this template's content.
///
/// A query, not a command: malformed checksums and mismatches both come
/// back as `false`.
pub fn verify_result_binding(result: &StudyResult, template: &StudyTemplate) -> bool {
    if !is_valid_checksum_format(&result.template_checksum_sha256) {
        return false;
    }
    verify_checksum(template, &result.template_checksum_sha256)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TemplateBuilder;

    fn sample_template() -> StudyTemplate {
        let mut builder = TemplateBuilder::new();
        builder.study_mut().title = "Navigation sort".to_string();
        builder.add_category("Account");
        builder.add_card("Change password");
        builder.build().unwrap()
    }

    #[test]
    fn test_export_import_round_trip() {
        let template = sample_template();
        let json = export_template(&template).unwrap();
        let loaded = import_template(&json).unwrap();
        assert_eq!(loaded.template, template);
        assert_eq!(
            loaded.checksum,
            Sha256Checksum::compute(&template).unwrap()
        );
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(matches!(
            import_template("not json at all"),
            Err(ImportError::Parse(_))
        ));
    }

    #[test]
    fn test_import_lists_every_problem() {
        let json = r#"{
            "schemaVersion": "nope",
            "templateId": "bad",
            "study": {},
            "categories": [],
            "cards": [],
            "createdAt": "never"
        }"#;
        let err = import_template(json).unwrap_err();
        let ImportError::Invalid(errors) = err else {
            panic!("expected validation failure, got {err:?}");
        };
        assert!(errors.messages().len() >= 5, "got: {:?}", errors.messages());
    }

    #[test]
    fn test_checksum_survives_key_reordering() {
        let template = sample_template();
        let json = export_template(&template).unwrap();
        let checksum = Sha256Checksum::compute(&template).unwrap();

        // Reparse and re-serialize; whatever key order comes out, the
        // canonical checksum must not change.
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let reserialized = serde_json::to_string(&value).unwrap();
        let reloaded = import_template(&reserialized).unwrap();
        assert_eq!(reloaded.checksum, checksum);
    }

    #[test]
    fn test_result_binding() {
        let template = sample_template();
        let loaded = import_template(&export_template(&template).unwrap()).unwrap();
        let card = template.cards[0].id.clone();
        let category = template.categories[0].id.clone();

        let mut engine = loaded.start_session().unwrap();
        engine.move_card(&card, Some(&category), false).unwrap();
        let env = cardsort_session::SessionEnv {
            timezone: "UTC".to_string(),
            user_agent: "cardsort-tests".to_string(),
            viewport: cardsort_core::Viewport { w: 800, h: 600 },
        };
        let result = engine.generate_result("Alice", &env).unwrap();

        assert!(verify_result_binding(&result, &template));

        // Any template drift breaks the binding
        let mut drifted = template.clone();
        drifted.study.title = "Renamed study".to_string();
        assert!(!verify_result_binding(&result, &drifted));
    }

    #[test]
    fn test_export_result_validates_shape() {
        let template = sample_template();
        let loaded = import_template(&export_template(&template).unwrap()).unwrap();
        let card = template.cards[0].id.clone();
        let mut engine = loaded.start_session().unwrap();
        engine.move_card(&card, None, true).unwrap();
        let env = cardsort_session::SessionEnv {
            timezone: "UTC".to_string(),
            user_agent: "cardsort-tests".to_string(),
            viewport: cardsort_core::Viewport { w: 800, h: 600 },
        };
        let result = engine.generate_result("Alice", &env).unwrap();

        let json = export_result(&result).unwrap();
        let back = import_result(&json).unwrap();
        assert_eq!(back, result);

        // A result with a mangled checksum must not export
        let mut bad = result;
        bad.template_checksum_sha256 = "tampered".to_string();
        assert!(matches!(export_result(&bad), Err(ExportError::Invalid(_))));
    }
}
