// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query-string parsing for request URIs.
//!
//! Only the flat `key=value` suffix is handled here; pattern matching and
//! path extraction belong to the [`RouteTable`](crate::route::RouteTable).
//!
//! - The query runs from the first `?` up to an optional `#fragment`.
//! - Pairs are separated by `&`; empty pairs are skipped.
//! - A pair without `=` yields an empty value.
//! - Names and values are percent-decoded and `+` decodes to a space.
//!   Malformed escapes are kept literally.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

/// The raw query of `uri`, without the leading `?` and any fragment.
///
/// ```
/// use understory_deeplink::query::raw;
///
/// assert_eq!(raw("app://a/b?x=1&y=2#top"), Some("x=1&y=2"));
/// assert_eq!(raw("app://a/b"), None);
/// ```
pub fn raw(uri: &str) -> Option<&str> {
    let without_fragment = uri.split_once('#').map_or(uri, |(head, _)| head);
    without_fragment.split_once('?').map(|(_, q)| q)
}

/// `uri` with its query and fragment removed.
pub fn strip(uri: &str) -> &str {
    let end = uri.find(['?', '#']).unwrap_or(uri.len());
    &uri[..end]
}

/// Decoded query parameters of `uri`, in order of appearance.
///
/// Repeated names appear once per occurrence.
pub fn parameters(uri: &str) -> impl Iterator<Item = (String, String)> + '_ {
    raw(uri)
        .into_iter()
        .flat_map(|q| q.split('&'))
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(name).into_owned(), decode(value).into_owned())
        })
}

/// Percent-decode a query component, treating `+` as a space.
pub fn decode(input: &str) -> Cow<'_, str> {
    if !input.bytes().any(|b| b == b'%' || b == b'+') {
        return Cow::Borrowed(input);
    }
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0_usize;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => match (hex(bytes.get(i + 1)), hex(bytes.get(i + 2))) {
                (Some(hi), Some(lo)) => {
                    out.push((hi << 4) | lo);
                    i += 3;
                }
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    match String::from_utf8(out) {
        Ok(s) => Cow::Owned(s),
        Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}

fn hex(b: Option<&u8>) -> Option<u8> {
    let digit = char::from(*b?).to_digit(16)?;
    u8::try_from(digit).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn params(uri: &str) -> Vec<(String, String)> {
        parameters(uri).collect()
    }

    #[test]
    fn parses_pairs_in_order() {
        assert_eq!(
            params("app://p/42?tab=posts&sort=new"),
            vec![
                ("tab".into(), "posts".into()),
                ("sort".into(), "new".into())
            ]
        );
    }

    #[test]
    fn repeated_names_are_kept() {
        assert_eq!(
            params("app://s?q=a&q=b"),
            vec![("q".into(), "a".into()), ("q".into(), "b".into())]
        );
    }

    #[test]
    fn fragment_and_empty_pairs_are_ignored() {
        assert_eq!(
            params("app://s?&a=1&&b#c=3"),
            vec![("a".into(), "1".into()), ("b".into(), String::new())]
        );
        assert!(params("app://s#a=1").is_empty());
        assert!(params("app://s").is_empty());
    }

    #[test]
    fn decodes_percent_and_plus() {
        assert_eq!(decode("hello%20world"), "hello world");
        assert_eq!(decode("a+b"), "a b");
        assert_eq!(decode("caf%C3%A9"), "café");
        assert!(matches!(decode("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn malformed_escapes_stay_literal() {
        assert_eq!(decode("100%"), "100%");
        assert_eq!(decode("%zz"), "%zz");
        assert_eq!(decode("%4"), "%4");
    }

    #[test]
    fn value_may_contain_equals() {
        assert_eq!(
            params("app://s?expr=a=b"),
            vec![("expr".into(), "a=b".into())]
        );
    }

    #[test]
    fn strip_removes_query_and_fragment() {
        assert_eq!(strip("app://p/42?tab=posts"), "app://p/42");
        assert_eq!(strip("app://p/42#x"), "app://p/42");
        assert_eq!(strip("app://p/42"), "app://p/42");
    }
}
