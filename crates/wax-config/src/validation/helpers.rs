//! Shared helpers used by the section validators.

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error unless `value` is an absolute http(s) or custom-scheme URL.
pub(crate) fn validate_url(errors: &mut Vec<String>, name: &str, value: &str) {
    let Some((scheme, rest)) = value.split_once("://") else {
        errors.push(format!("{name} = {value:?} is not an absolute URL"));
        return;
    };
    let scheme_ok = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok || rest.is_empty() {
        errors.push(format!("{name} = {value:?} is not an absolute URL"));
    }
}
