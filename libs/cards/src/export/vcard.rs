//! vCard 3.0 export

use crate::model::{Card, Profile};
use crate::slug::slugify;

const MAX_LINE_OCTETS: usize = 75;

/// Serialize a card as a vCard 3.0 document with CRLF line endings
pub fn to_vcard(card: &Card) -> String {
    let mut lines = vec!["BEGIN:VCARD".to_string(), "VERSION:3.0".to_string()];

    let address_type = match &card.profile {
        Profile::Personal(person) => {
            let (given, family) = split_name(&person.full_name);
            lines.push(format!("FN:{}", escape_text(&person.full_name)));
            lines.push(format!("N:{};{};;;", escape_text(family), escape_text(given)));
            if let Some(company) = &person.company {
                lines.push(format!("ORG:{}", escape_text(company)));
            }
            if let Some(role) = &person.role {
                lines.push(format!("TITLE:{}", escape_text(role)));
            }
            "HOME"
        }
        Profile::Business(business) => {
            let name = escape_text(&business.business_name);
            lines.push(format!("FN:{name}"));
            lines.push(format!("N:{name};;;;"));
            lines.push(format!("ORG:{name}"));
            "WORK"
        }
    };

    let contact = &card.contact;
    if let Some(phone) = &contact.phone {
        lines.push(format!("TEL;TYPE=CELL:{}", escape_text(phone)));
    }
    if !contact.email.is_empty() {
        lines.push(format!("EMAIL;TYPE=INTERNET:{}", escape_text(&contact.email)));
    }
    if let Some(website) = &contact.website {
        let website: String = website.chars().filter(|c| !c.is_control()).collect();
        lines.push(format!("URL:{website}"));
    }
    if let Some(address) = &contact.address {
        lines.push(format!("ADR;TYPE={address_type}:;;{};;;;", escape_text(address)));
    }
    if let Some(bio) = &card.bio {
        lines.push(format!("NOTE:{}", escape_text(bio)));
    }
    lines.push("END:VCARD".to_string());

    let mut out = String::new();
    for line in lines {
        out.push_str(&fold_line(&line));
        out.push_str("\r\n");
    }
    out
}

/// `<slugified display name>.vcf`
pub fn vcard_filename(card: &Card) -> String {
    let base = slugify(card.display_name());
    if base.is_empty() {
        "contact.vcf".to_string()
    } else {
        format!("{base}.vcf")
    }
}

/// Escape backslash, newline, comma and semicolon; CR is dropped
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Split into (given, family) at the last space
fn split_name(full_name: &str) -> (&str, &str) {
    match full_name.trim().rsplit_once(char::is_whitespace) {
        Some((given, family)) => (given.trim_end(), family),
        None => (full_name.trim(), ""),
    }
}

/// Fold at 75 octets on character boundaries; continuations start with a space
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut current = 0;
    for c in line.chars() {
        if current + c.len_utf8() > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            current = 1;
        }
        out.push(c);
        current += c.len_utf8();
    }
    out
}
