//! Contact normalization and masking.
//!
//! Phone numbers are normalized to E.164-shaped strings before hashing;
//! emails are lower-cased and used as the account key. Masked forms are the
//! only contact representations that appear in views and logs.

/// Normalizes a raw phone number.
///
/// Separators are stripped, a leading `00` becomes `+`, and numbers without
/// a `+` prefix get the configured default country code prepended. The
/// result must be `+` followed by 10–15 digits; anything else yields
/// `None` and the caller must treat the input as invalid.
#[must_use]
pub fn normalize_phone(raw: &str, default_country_code: &str) -> Option<String> {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect();

    let candidate = if let Some(rest) = stripped.strip_prefix("00") {
        format!("+{rest}")
    } else if stripped.starts_with('+') {
        stripped
    } else if stripped.is_empty() {
        return None;
    } else {
        format!("{default_country_code}{stripped}")
    };

    let digits = candidate.strip_prefix('+')?;
    if digits.len() < 10 || digits.len() > 15 {
        return None;
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    Some(candidate)
}

/// Returns the last four digits of a normalized phone number.
#[must_use]
pub fn phone_last4(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(char::is_ascii_digit).collect();
    digits.iter().rev().take(4).rev().collect()
}

/// Masks a phone number, keeping only the last four digits.
#[must_use]
pub fn mask_phone(phone: &str) -> String {
    let last4 = phone_last4(phone);
    format!("********{last4}")
}

/// Masks an email address.
///
/// Keeps the first two characters of the local part (fully masked when the
/// local part is two characters or shorter) and the full domain.
#[must_use]
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.chars().count() > 2 => {
            let prefix: String = local.chars().take(2).collect();
            format!("{prefix}***@{domain}")
        }
        Some((_, domain)) => format!("***@{domain}"),
        None => "***".to_string(),
    }
}

/// Normalizes an email address to its canonical account-key form.
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.len() < 3 {
        return false;
    }
    if email.contains(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}
