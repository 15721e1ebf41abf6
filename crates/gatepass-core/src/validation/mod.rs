//! Input validation for the intake pipeline.
//!
//! Validation order and messages mirror the submission preconditions:
//! required fields first, then phone shape, then the photo artifact.

use crate::error::AppError;

/// Maximum lengths for free-form fields. The original console truncated
/// nothing; these bound abuse of the public form.
pub const MAX_NAME_LENGTH: usize = 120;
pub const MAX_VEHICLE_NUMBER_LENGTH: usize = 20;

/// Require a non-empty value after trimming; returns the trimmed value.
pub fn require_trimmed<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed)
}

/// Phone numbers must be exactly 10 decimal digits. No separators, no
/// country codes, no shorter or longer strings.
pub fn validate_phone(phone: &str) -> Result<&str, AppError> {
    let phone = require_trimmed(phone, "Phone number")?;
    if phone.len() != 10 || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Enter a valid 10 digit phone number".to_string(),
        ));
    }
    Ok(phone)
}

/// Normalize a unit identifier: trim, uppercase. Rejects empty input.
pub fn normalize_unit_no(unit_no: &str) -> Result<String, AppError> {
    let trimmed = require_trimmed(unit_no, "Unit number")?;
    Ok(trimmed.to_uppercase())
}

pub fn validate_name(name: &str) -> Result<&str, AppError> {
    let name = require_trimmed(name, "Visitor name")?;
    if name.len() > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "Visitor name exceeds {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(name)
}

/// Optional vehicle number: empty input becomes `None`, never an empty
/// string. Stored trimmed but otherwise verbatim; only the unit identifier
/// is case-normalized.
pub fn normalize_vehicle_number(vehicle_number: &str) -> Result<Option<String>, AppError> {
    let trimmed = vehicle_number.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.len() > MAX_VEHICLE_NUMBER_LENGTH {
        return Err(AppError::Validation(format!(
            "Vehicle number exceeds {} characters",
            MAX_VEHICLE_NUMBER_LENGTH
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// Validate an uploaded photo against configured limits before any remote
/// call is made.
pub fn validate_photo(
    filename: &str,
    content_type: &str,
    size: usize,
    max_size: usize,
    allowed_extensions: &[String],
    allowed_content_types: &[String],
) -> Result<(), AppError> {
    if size == 0 {
        return Err(AppError::Validation("Photo is required".to_string()));
    }
    if size > max_size {
        return Err(AppError::Validation(format!(
            "Photo exceeds maximum size of {} bytes",
            max_size
        )));
    }
    let extension = filename
        .rsplit('.')
        .next()
        .filter(|ext| *ext != filename)
        .map(|ext| ext.to_lowercase())
        .ok_or_else(|| AppError::Validation("Photo filename has no extension".to_string()))?;
    if !allowed_extensions.iter().any(|e| *e == extension) {
        return Err(AppError::Validation(format!(
            "Photo extension '{}' is not allowed",
            extension
        )));
    }
    if !allowed_content_types.iter().any(|c| *c == content_type) {
        return Err(AppError::Validation(format!(
            "Photo content type '{}' is not allowed",
            content_type
        )));
    }
    Ok(())
}
