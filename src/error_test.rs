use super::*;

#[test]
fn notice_carries_code_message_and_flag() {
    let notice = Notice::from_error(&EditorError::UnknownTemplate("/style/x.png".into()));
    assert_eq!(notice.code, "E_UNKNOWN_TEMPLATE");
    assert_eq!(notice.message, "unknown template: /style/x.png");
    assert!(!notice.retryable);
}

#[test]
fn wizard_error_code_passes_through() {
    let err = EditorError::from(WizardError::TemplateRequired);
    assert_eq!(err.error_code(), "E_TEMPLATE_REQUIRED");
    assert_eq!(err.to_string(), WizardError::TemplateRequired.to_string());
}

#[test]
fn export_errors_are_retryable() {
    let err = EditorError::from(ExportError::Rasterize("boom".into()));
    assert!(err.retryable());
    assert!(Notice::from_error(&err).retryable);
}

#[test]
fn config_errors_are_not_retryable() {
    let err = EditorError::from(ConfigError::NoTemplates);
    assert_eq!(err.error_code(), "E_CONFIG_INVALID");
    assert!(!err.retryable());
}

#[test]
fn notice_serializes_as_flat_object() {
    let notice = Notice::from_error(&EditorError::PhotoWithoutTemplate);
    let json = serde_json::to_value(&notice).unwrap();
    assert_eq!(json["code"], "E_TEMPLATE_REQUIRED");
    assert_eq!(json["retryable"], false);
    assert!(json["message"].is_string());
}
