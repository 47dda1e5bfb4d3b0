//! `${VAR}` expansion in configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value` in place.
///
/// Bare `$VAR` is left alone so URLs containing `$` survive. An unset
/// variable without a default is an error naming `field`.
pub(crate) fn expand_in_place(value: &mut String, field: &str) -> Result<(), ConfigError> {
    if !value.contains("${") {
        return Ok(());
    }

    let expanded = shellexpand::env_with_context(value.as_str(), |name| {
        std::env::var(name).map(Some).map_err(|_| name.to_owned())
    })
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause),
    })?;
    *value = expanded.into_owned();
    Ok(())
}

/// [`expand_in_place`] for optional fields.
pub(crate) fn expand_optional(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    match value {
        Some(value) => expand_in_place(value, field),
        None => Ok(()),
    }
}
