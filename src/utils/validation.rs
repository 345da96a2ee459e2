use crate::utils::error::{ParseError, Result};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> ParseError {
    ParseError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// An HTTP(S) parse endpoint with a host to connect to.
pub fn validate_endpoint(field_name: &str, endpoint: &str) -> Result<()> {
    if endpoint.is_empty() {
        return Err(invalid(field_name, endpoint, "Endpoint cannot be empty"));
    }

    let url = Url::parse(endpoint)
        .map_err(|e| invalid(field_name, endpoint, format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(invalid(
                field_name,
                endpoint,
                format!("Unsupported URL scheme: {}", scheme),
            ))
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(field_name, endpoint, "Endpoint has no host"));
    }

    Ok(())
}

/// A parser executable. Bare names are looked up on `PATH` at spawn time and
/// paths may not exist yet (the loader waits), but a path that does exist
/// must be a runnable file.
pub fn validate_command(field_name: &str, program: &str) -> Result<()> {
    if program.trim().is_empty() {
        return Err(invalid(field_name, program, "Command cannot be empty"));
    }

    if program.contains('\0') {
        return Err(invalid(field_name, program, "Command contains null bytes"));
    }

    let path = Path::new(program);
    let is_bare_name = path.components().count() == 1 && !path.is_absolute();
    if is_bare_name {
        return Ok(());
    }

    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(invalid(field_name, program, format!("Cannot inspect command: {}", e))),
    };

    if !metadata.is_file() {
        return Err(invalid(field_name, program, "Command is not a file"));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(invalid(field_name, program, "Command is not executable"));
        }
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}
