use bizcard_types::models::{Profile, SocialLink};

/// Render a vCard 3.0 with CRLF line endings.
pub fn render(profile: &Profile, links: &[SocialLink]) -> String {
    let mut lines: Vec<String> = vec!["BEGIN:VCARD".into(), "VERSION:3.0".into()];

    let display_name = profile
        .full_name
        .as_deref()
        .or(profile.username.as_deref())
        .unwrap_or_default();
    lines.push(format!("FN:{}", escape_text(display_name)));

    let (given, family) = split_name(profile.full_name.as_deref().unwrap_or_default());
    lines.push(format!("N:{};{};;;", escape_text(family), escape_text(given)));

    if let Some(company) = &profile.company {
        lines.push(format!("ORG:{}", escape_text(company)));
    }
    if let Some(about) = &profile.about {
        lines.push(format!("NOTE:{}", escape_text(about)));
    }
    if let Some(phone) = &profile.phone {
        lines.push(format!("TEL;TYPE=CELL:{}", strip_breaks(phone)));
    }
    if let Some(email) = &profile.email {
        lines.push(format!("EMAIL;TYPE=INTERNET:{}", strip_breaks(email)));
    }
    if let Some(website) = &profile.website {
        lines.push(format!("URL:{}", strip_breaks(website)));
    }
    for link in links {
        lines.push(format!(
            "URL;TYPE={}:{}",
            param_value(&link.platform),
            strip_breaks(&link.target_url)
        ));
    }

    lines.push("END:VCARD".into());

    let mut out = String::new();
    for line in &lines {
        fold_line(line, &mut out);
    }
    out
}

const MAX_LINE_OCTETS: usize = 75;

/// Append `line` with CRLF, folded so no physical line exceeds 75 octets.
/// Continuation lines start with a single space. Never splits a UTF-8 char.
fn fold_line(line: &str, out: &mut String) {
    let mut budget = MAX_LINE_OCTETS;
    let mut used = 0;
    for c in line.chars() {
        if used + c.len_utf8() > budget {
            out.push_str("\r\n ");
            budget = MAX_LINE_OCTETS - 1;
            used = 0;
        }
        out.push(c);
        used += c.len_utf8();
    }
    out.push_str("\r\n");
}

/// TEXT value escaping (RFC 6350 section 3.4).
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

fn strip_breaks(value: &str) -> String {
    value.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

fn param_value(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if cleaned.is_empty() {
        "other".into()
    } else {
        cleaned.to_ascii_lowercase()
    }
}

/// Last whitespace-separated word is the family name.
fn split_name(full_name: &str) -> (&str, &str) {
    let full_name = full_name.trim();
    match full_name.rsplit_once(char::is_whitespace) {
        Some((given, family)) => (given.trim_end(), family),
        None => (full_name, ""),
    }
}
