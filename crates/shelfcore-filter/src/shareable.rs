use std::collections::BTreeSet;

use crate::FilterState;

// Shareable form of the filter dimensions, minus the tab (the tab has its
// own sticky store). Example: `keywords=invoice%20bot&created_by_me=true&tags=ops;billing`

pub fn encode_shareable(filter: &FilterState) -> String {
    let mut out = String::new();
    out.push_str("keywords=");
    out.push_str(&escape_component(&filter.keywords));
    out.push_str("&created_by_me=");
    out.push_str(if filter.created_by_me { "true" } else { "false" });

    if !filter.tag_ids.is_empty() {
        out.push_str("&tags=");
        let mut first = true;
        for id in &filter.tag_ids {
            if !first {
                out.push(';');
            }
            first = false;
            out.push_str(&escape_component(id));
        }
    }

    out
}

/// Unknown keys are skipped, malformed pairs fall back to the default
/// dimension; a shared link should never fail to open.
pub fn decode_shareable(encoded: &str) -> FilterState {
    let mut filter = FilterState::default();

    for pair in encoded.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };

        match key {
            "keywords" => filter.keywords = unescape_component(value),
            "created_by_me" => filter.created_by_me = value == "true",
            "tags" => {
                filter.tag_ids = value
                    .split(';')
                    .filter(|part| !part.is_empty())
                    .map(unescape_component)
                    .collect::<BTreeSet<_>>();
            }
            _ => {}
        }
    }

    filter
}

// The escaped form is pure ASCII: the separators, whitespace, control bytes
// and every UTF-8 byte >= 0x80 go through the percent form so the original
// byte stream survives the trip.
fn escape_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        let literal = byte.is_ascii_graphic() && !matches!(byte, b'%' | b'&' | b'=' | b';');
        if literal {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(hex_digit(byte >> 4));
            out.push(hex_digit(byte & 0x0f));
        }
    }
    out
}

fn unescape_component(escaped: &str) -> String {
    let bytes = escaped.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(high), Some(low)) = (
                bytes.get(i + 1).copied().and_then(hex_value),
                bytes.get(i + 2).copied().and_then(hex_value),
            ) {
                out.push((high << 4) | low);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(value: u8) -> char {
    char::from_digit(u32::from(value), 16).unwrap_or('0')
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|v| v as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShelfTab;

    #[test]
    fn encoded_filters_reopen_identically() {
        let mut filter = FilterState::default();
        filter.keywords = "invoice bot".to_string();
        filter.created_by_me = true;
        filter.toggle_tag("ops");
        filter.toggle_tag("billing;legacy");

        let decoded = decode_shareable(&encode_shareable(&filter));
        assert_eq!(decoded, filter);
    }

    #[test]
    fn non_ascii_dimensions_survive_the_trip() {
        let mut filter = FilterState::default();
        filter.keywords = "café Straße".to_string();
        filter.toggle_tag("日本語");

        let encoded = encode_shareable(&filter);
        assert!(encoded.is_ascii());
        assert_eq!(decode_shareable(&encoded), filter);
    }

    #[test]
    fn tab_stays_out_of_the_shareable_form() {
        let filter = FilterState::default().with_tab(ShelfTab::AgentChat);
        let decoded = decode_shareable(&encode_shareable(&filter));
        assert_eq!(decoded.tab, ShelfTab::All);
    }

    #[test]
    fn garbage_input_falls_back_to_defaults() {
        let decoded = decode_shareable("not a link&&tags");
        assert_eq!(decoded, FilterState::default());
    }

    #[test]
    fn empty_tag_list_is_omitted() {
        let encoded = encode_shareable(&FilterState::default());
        assert_eq!(encoded, "keywords=&created_by_me=false");
    }
}
