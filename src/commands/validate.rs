use crate::core::{
    config_store::{decode_document, validate_document, ValidationReport},
    error::{DenError, Result},
    print_error, print_info, print_section_header, print_success, print_warning,
    session::Session,
};
use colored::*;
use std::path::PathBuf;

/// Validate the active configuration file strictly: every field required
/// and correctly typed. Errors fail the command, warnings do not.
pub fn execute_validate(session: &Session) -> Result<()> {
    let source = active_source(session)?;
    let document = decode_document(&source)?;
    let report = validate_document(&document);

    print_section_header(&format!("Validating {}", source.display()));
    print_report(&report);

    if report.is_valid {
        if report.warnings.is_empty() {
            print_success("Configuration is valid");
        } else {
            print_success(&format!(
                "Configuration is valid with {} warning(s)",
                report.warnings.len()
            ));
        }
        println!();
        Ok(())
    } else {
        Err(DenError::ValidationFailed {
            count: report.errors.len(),
        })
    }
}

/// The file that loaded, or else the first candidate that exists but failed
/// to load, so decode errors get reported.
fn active_source(session: &Session) -> Result<PathBuf> {
    if let Some(loaded) = session.load_config() {
        return Ok(loaded.source);
    }
    match session.config().lock().existing_candidates().into_iter().next() {
        Some(path) => Ok(path),
        None => {
            print_info("No configuration file found. Run 'den init' to create one.");
            Err(DenError::ConfigNotFound)
        }
    }
}

fn print_report(report: &ValidationReport) {
    for error in &report.errors {
        println!("{} {}", "✕".red(), error.white());
    }
    for warning in &report.warnings {
        print_warning(warning);
    }
    if !report.is_valid {
        print_error("Configuration is invalid");
    }
}
