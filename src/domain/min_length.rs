/// Check that `value` is at least `min` characters long.
///
/// Length is measured in UTF-16 code units, the unit browser form validation
/// counts, and the value is kept exactly as submitted. `label` is the
/// human-readable field name used in the error message.
pub(super) fn parse(value: &str, label: &str, min: usize) -> Result<String, String> {
    if value.encode_utf16().count() < min {
        return Err(format!("{} must be at least {} characters.", label, min));
    }
    Ok(value.to_string())
}
