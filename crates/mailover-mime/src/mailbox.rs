//! Mailbox (display name + address) header formatting.

use crate::encoding::encoded_word;

/// Formats one `(name, address)` pair for an address header.
///
/// An empty name renders as `<addr>`. Names made of atom-safe characters
/// and spaces render bare (`Name <addr>`), names with other printable
/// ASCII render as a quoted string, and names with non-ASCII content
/// become an RFC 2047 encoded-word.
#[must_use]
pub fn format_mailbox(name: &str, address: &str) -> String {
    if name.is_empty() {
        return format!("<{address}>");
    }

    if name.chars().all(is_atom_or_space) {
        return format!("{name} <{address}>");
    }

    if name.is_ascii() {
        let escaped: String = name
            .chars()
            .flat_map(|c| {
                if c == '"' || c == '\\' {
                    vec!['\\', c]
                } else {
                    vec![c]
                }
            })
            .collect();
        return format!("\"{escaped}\" <{address}>");
    }

    format!("{} <{address}>", encoded_word(name))
}

/// Formats an address sequence with its parallel name sequence.
///
/// `names[i]` names `addresses[i]`; when the name sequence is shorter,
/// addresses past its end get no display name.
#[must_use]
pub fn format_address_list(addresses: &[String], names: &[String]) -> Vec<String> {
    addresses
        .iter()
        .enumerate()
        .map(|(i, address)| {
            let name = names.get(i).map_or("", String::as_str);
            format_mailbox(name, address)
        })
        .collect()
}

/// True for characters allowed in an unquoted display-name atom, plus space.
fn is_atom_or_space(c: char) -> bool {
    c == ' '
        || c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '/' | '=' | '?' | '^' | '_'
                | '`' | '{' | '|' | '}' | '~'
        )
}
