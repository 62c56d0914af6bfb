use crate::errors::AppError;

/// Checks an inbound `id_number` before any upstream call is made.
///
/// The value must be present, non-blank and made only of ASCII digits.
/// Surrounding whitespace is not tolerated (a padded number is not all digits).
///
/// # Returns
///
/// * `Ok(String)` - the validated ID number.
/// * `Err(AppError::InvalidInput)` - otherwise.
pub fn validate_id_number(raw: Option<&str>) -> Result<String, AppError> {
    let Some(id_number) = raw else {
        return Err(AppError::InvalidInput("id_number is required".to_string()));
    };

    if id_number.trim().is_empty() {
        return Err(AppError::InvalidInput("id_number is required".to_string()));
    }

    if !id_number.chars().all(|c| c.is_ascii_digit()) {
        tracing::warn!("Invalid ID number format received: {:?}", id_number);
        return Err(AppError::InvalidInput(
            "Invalid ID number format".to_string(),
        ));
    }

    Ok(id_number.to_string())
}
