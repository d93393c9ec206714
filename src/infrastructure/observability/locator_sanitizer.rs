const MAX_VISIBLE_LENGTH: usize = 200;

const SENSITIVE_PARAMS: [&str; 5] = [
    "token",
    "access_token",
    "signature",
    "x-goog-signature",
    "x-goog-credential",
];

/// Makes a remote locator safe to log: credential-bearing query values are
/// replaced and overly long input is truncated.
pub fn sanitize_locator(locator: &str) -> String {
    let trimmed = locator.trim();
    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let redacted = redact_query(trimmed);

    if redacted.chars().count() > MAX_VISIBLE_LENGTH {
        let visible: String = redacted.chars().take(MAX_VISIBLE_LENGTH).collect();
        format!("{}... ({} chars total)", visible, redacted.chars().count())
    } else {
        redacted
    }
}

fn redact_query(locator: &str) -> String {
    let Some((base, rest)) = locator.split_once('?') else {
        return locator.to_string();
    };
    let (query, fragment) = match rest.split_once('#') {
        Some((q, f)) => (q, Some(f)),
        None => (rest, None),
    };

    let query = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_sensitive(key) => format!("{}=[REDACTED]", key),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    match fragment {
        Some(fragment) => format!("{}?{}#{}", base, query, fragment),
        None => format!("{}?{}", base, query),
    }
}

fn is_sensitive(key: &str) -> bool {
    SENSITIVE_PARAMS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(key))
}
