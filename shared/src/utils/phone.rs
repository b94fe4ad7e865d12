//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

// Mainland China mobile number without country code
static CHINA_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^1[3-9]\d{9}$").expect("valid mobile regex")
});

// International phone number (E.164 format)
static E164_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{6,14}$").expect("valid E.164 regex")
});

/// Strip formatting characters, keeping digits and a leading '+'
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Exact match for an 11-digit mainland China mobile number
pub fn is_chinese_mobile(value: &str) -> bool {
    CHINA_MOBILE_REGEX.is_match(value)
}

/// Exact match for an E.164 number such as `+8613800138000`
pub fn is_e164(value: &str) -> bool {
    E164_REGEX.is_match(value)
}

/// Whether `value` looks like a phone number this gateway could be sending to
pub fn looks_like_phone_number(value: &str) -> bool {
    is_chinese_mobile(value) || is_e164(value)
}

/// Mask a phone number for logs, keeping the first 3 and last 4 characters
/// (e.g. `138****8000`). Anything shorter than 7 characters is fully masked.
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}

/// Mask `value` only when it looks like a phone number
pub fn mask_if_phone(value: &str) -> Cow<'_, str> {
    if looks_like_phone_number(value) {
        Cow::Owned(mask_phone_number(value))
    } else {
        Cow::Borrowed(value)
    }
}
