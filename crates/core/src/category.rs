//! Category name rules.

use crate::error::CoreError;

/// Maximum length of a category name, in characters.
pub const MAX_CATEGORY_NAME_LEN: usize = 50;

/// Trim and title-case a user-supplied category name.
///
/// Every alphabetic run starts upper-case and continues lower-case, so
/// `"  deep WORK "` and `"Deep work"` both become `"Deep Work"`.
pub fn normalize_category_name(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Category name is required".to_string()));
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut prev_alpha = false;
    for ch in trimmed.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }

    if out.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Category name must be at most {MAX_CATEGORY_NAME_LEN} characters"
        )));
    }
    Ok(out)
}
