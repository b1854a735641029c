use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    V4,
    V6,
}

impl AddressKind {
    pub fn label(self) -> &'static str {
        match self {
            AddressKind::V4 => "IPv4",
            AddressKind::V6 => "IPv6",
        }
    }
}

/// An address found in a line of text, kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressToken<'a> {
    pub kind: AddressKind,
    pub text: &'a str,
    pub start: usize,
}

fn ipv4_candidates() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{1,3}(?:\.\d{1,3}){3}").expect("valid IPv4 pattern"))
}

fn ipv6_candidates() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9A-Fa-f:]*:[0-9A-Fa-f:]*").expect("valid IPv6 pattern"))
}

/// The match must not be glued to surrounding word characters, and a
/// dotted quad must not be part of a longer dotted run.
fn is_isolated(line: &str, start: usize, end: usize) -> bool {
    let before = line[..start].chars().next_back();
    let mut after = line[end..].chars();
    let next = after.next();

    if before.is_some_and(|c| c.is_alphanumeric() || c == '.' || c == '_') {
        return false;
    }

    match next {
        Some('.') => !after.next().is_some_and(|c| c.is_ascii_digit()),
        Some(c) => !(c.is_alphanumeric() || c == '_'),
        None => true,
    }
}

/// All valid IPv4 and IPv6 addresses in `line`, in the order they appear.
pub fn find_addresses(line: &str) -> Vec<AddressToken<'_>> {
    let mut tokens: Vec<AddressToken<'_>> = ipv4_candidates()
        .find_iter(line)
        .filter(|m| is_isolated(line, m.start(), m.end()))
        .filter(|m| m.as_str().parse::<Ipv4Addr>().is_ok())
        .map(|m| AddressToken {
            kind: AddressKind::V4,
            text: m.as_str(),
            start: m.start(),
        })
        .collect();

    tokens.extend(
        ipv6_candidates()
            .find_iter(line)
            .filter(|m| m.as_str().matches(':').count() >= 2)
            .filter(|m| m.as_str().chars().any(|c| c.is_ascii_hexdigit()))
            .filter(|m| is_isolated(line, m.start(), m.end()))
            .filter(|m| m.as_str().parse::<Ipv6Addr>().is_ok())
            .map(|m| AddressToken {
                kind: AddressKind::V6,
                text: m.as_str(),
                start: m.start(),
            }),
    );

    tokens.sort_by_key(|t| t.start);
    tokens
}

pub fn contains_address(text: &str) -> bool {
    text.lines().any(|line| !find_addresses(line).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &str) -> Vec<(AddressKind, &str)> {
        find_addresses(line).into_iter().map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn finds_both_families_in_order() {
        assert_eq!(
            texts("156.154.35.153 2610:a1:3008:128::153 156.154.35.154"),
            vec![
                (AddressKind::V4, "156.154.35.153"),
                (AddressKind::V6, "2610:a1:3008:128::153"),
                (AddressKind::V4, "156.154.35.154"),
            ]
        );
    }

    #[test]
    fn rejects_out_of_range_octets() {
        assert!(texts("999.1.1.1").is_empty());
        assert!(texts("1.2.3.4.5").is_empty());
    }

    #[test]
    fn ignores_times_and_labels() {
        assert!(texts("Updated 10:30 by ops").is_empty());
        assert!(texts("Note: see below").is_empty());
        assert!(texts("version 2.1.0").is_empty());
    }

    #[test]
    fn bare_double_colon_is_not_an_address() {
        assert!(texts("Foo :: Bar").is_empty());
        assert!(texts("a ::: b").is_empty());
        assert_eq!(texts("loopback ::1"), vec![(AddressKind::V6, "::1")]);
    }

    #[test]
    fn allows_sentence_punctuation() {
        assert_eq!(texts("use 10.0.0.1."), vec![(AddressKind::V4, "10.0.0.1")]);
        assert_eq!(texts("(2001:db8::1)"), vec![(AddressKind::V6, "2001:db8::1")]);
    }

    #[test]
    fn detects_addresses_across_lines() {
        assert!(contains_address("Region\nEurope\n2001:db8::2\n"));
        assert!(!contains_address("Chapter 12\nAppendix"));
    }
}
