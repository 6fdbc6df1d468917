use crate::utils::error::{EtlError, Result};
use regex::Regex;
use std::fmt::Display;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Display, reason: impl Into<String>) -> EtlError {
    EtlError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 端點模板必須包含 `{code}`，代入代碼後須為 http(s) URL
pub fn validate_endpoint_template(field: &str, template: &str) -> Result<()> {
    if !template.contains("{code}") {
        return Err(invalid(
            field,
            template,
            "Template must contain the {code} placeholder",
        ));
    }

    let sample = template.replace("{code}", "DEU");
    let url = Url::parse(&sample).map_err(|e| invalid(field, template, format!("Invalid URL: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            template,
            format!("Only http and https are supported, got {}", url.scheme()),
        ));
    }
    Ok(())
}

/// 檔名或目錄: 不可為空白，也不可含 NUL
pub fn validate_path(field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field, path.escape_default(), "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be empty"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + Display + Copy>(field: &str, value: T, min: T, max: T) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

fn country_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z]{2,3}$").expect("valid country code regex"))
}

/// ISO 3166-1 alpha-2 或 alpha-3 代碼
pub fn validate_country_codes(field: &str, codes: &[String]) -> Result<()> {
    if codes.is_empty() {
        return Err(invalid(field, "", "At least one country code is required"));
    }

    match codes.iter().find(|code| !country_code_pattern().is_match(code)) {
        Some(code) => Err(invalid(field, code, "Country codes must be 2 or 3 ASCII letters")),
        None => Ok(()),
    }
}
