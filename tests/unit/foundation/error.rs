use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PlotshotError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        PlotshotError::invalid_dataset("x")
            .to_string()
            .contains("invalid dataset:")
    );
    assert!(PlotshotError::render("x").to_string().contains("render error:"));
    assert!(PlotshotError::not_found("x").to_string().contains("not found:"));
    assert!(
        PlotshotError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn payload_too_large_reports_size_and_limit() {
    let msg = PlotshotError::payload_too_large(4096, 1024).to_string();
    assert!(msg.contains("4096"));
    assert!(msg.contains("1024"));
}

#[test]
fn client_errors_are_classified() {
    assert!(PlotshotError::invalid_input("x").is_client_error());
    assert!(PlotshotError::payload_too_large(2, 1).is_client_error());
    assert!(PlotshotError::invalid_dataset("x").is_client_error());
    assert!(PlotshotError::not_found("x").is_client_error());
    assert!(!PlotshotError::render("x").is_client_error());
    assert!(!PlotshotError::serde("x").is_client_error());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PlotshotError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
