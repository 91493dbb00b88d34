use lazy_regex::regex;

pub fn extract_email(bio: &str) -> Option<String> {
    regex!(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}\b")
        .find(bio)
        .map(|m| m.as_str().to_lowercase())
}

pub fn extract_phone(bio: &str) -> Option<String> {
    let patterns = [
        regex!(r"\+1[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b"),
        regex!(r"\(\d{3}\)\s*\d{3}[-.\s]?\d{4}\b"),
        regex!(r"\b\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b"),
    ];
    patterns
        .iter()
        .filter_map(|re| re.find(bio))
        .min_by_key(|m| (m.start(), std::cmp::Reverse(m.end())))
        .map(|m| m.as_str().to_string())
}

/// First email address and US phone number found in the bio.
pub fn extract_contact(bio: &str) -> (Option<String>, Option<String>) {
    (extract_email(bio), extract_phone(bio))
}
