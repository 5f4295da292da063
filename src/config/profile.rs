use crate::error::{AppError, AppResult};

const DEFAULT_PROFILE: &str = "default";

/// Profile names become file names, so only plain names are accepted.
pub fn resolve_profile(requested: &str) -> AppResult<String> {
    let trimmed = requested.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_PROFILE.to_string());
    }

    let valid = trimmed
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if !valid {
        return Err(AppError::InvalidInput(format!(
            "profile `{trimmed}` may only contain letters, digits, `-` and `_`"
        )));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_profile_falls_back_to_default() {
        assert_eq!(resolve_profile("  ").expect("profile"), "default");
    }

    #[test]
    fn rejects_path_like_profiles() {
        assert!(resolve_profile("../work").is_err());
        assert_eq!(resolve_profile("work_2").expect("profile"), "work_2");
    }
}
