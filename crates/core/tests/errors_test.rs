use medtrack_core::errors::{MedError, MedResult};
use pretty_assertions::assert_eq;

#[test]
fn test_error_display_messages() {
    assert_eq!(
        MedError::NotFound("Dose with ID 42 not found".to_string()).to_string(),
        "Resource not found: Dose with ID 42 not found"
    );
    assert_eq!(
        MedError::Validation("Unknown timezone: Mars/Base".to_string()).to_string(),
        "Validation error: Unknown timezone: Mars/Base"
    );
    assert_eq!(
        MedError::Conflict("duplicate dose instance".to_string()).to_string(),
        "Conflict: duplicate dose instance"
    );
    assert_eq!(
        MedError::Configuration("no push keys".to_string()).to_string(),
        "Configuration error: no push keys"
    );
}

#[test]
fn test_database_errors_convert_from_eyre() {
    fn repo_call() -> eyre::Result<()> {
        Err(eyre::eyre!("connection refused"))
    }

    fn domain_call() -> MedResult<()> {
        repo_call()?;
        Ok(())
    }

    let err = domain_call().unwrap_err();
    assert!(matches!(err, MedError::Database(_)));
    assert!(err.to_string().contains("connection refused"));
}
