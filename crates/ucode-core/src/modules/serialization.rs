use crate::domain::{UcodeError, UcodeResult};
use std::fs;
use std::path::Path;

pub fn format_fixed_f64(value: f64, width: usize, precision: usize) -> String {
    format!(
        "{value:>width$.precision$E}",
        width = width,
        precision = precision
    )
}

/// Shortest round-trip rendering in the style UCODE tables have always
/// carried: fixed notation for decimal exponents in `-4..16`, otherwise
/// `1e-07` / `1e+38` with a signed two-digit exponent.
pub fn format_table_value(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if (-4..16).contains(&exponent) {
        let fixed = format!("{value}");
        if fixed.contains('.') {
            fixed
        } else {
            format!("{fixed}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, normalize_text_artifact(content))
}

/// Writes a text artifact, creating its parent directory, and reports
/// failures against the offending path.
pub fn write_task_artifact(
    path: &Path,
    content: &str,
    placeholder: &'static str,
) -> UcodeResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| {
            UcodeError::io_system(
                placeholder,
                format!(
                    "failed to create output directory '{}': {}",
                    parent.display(),
                    source
                ),
            )
        })?;
    }

    write_text_artifact(path, content).map_err(|source| {
        UcodeError::io_system(
            placeholder,
            format!("failed to write '{}': {}", path.display(), source),
        )
    })?;
    tracing::info!(path = %path.display(), "wrote artifact");
    Ok(())
}

pub fn read_task_input(path: &Path, placeholder: &'static str) -> UcodeResult<String> {
    fs::read_to_string(path).map_err(|source| {
        UcodeError::io_system(
            placeholder,
            format!("failed to read '{}': {}", path.display(), source),
        )
    })
}
