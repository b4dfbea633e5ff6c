// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

//! Content-line unfolding and splitting (RFC 6350 §3.2-3.3).

/// One unfolded vCard content line.
///
/// A content line has the shape `[group.]NAME[;param=value]*:value`. The
/// property name is stored uppercased and with any group prefix stripped;
/// parameters keep their raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property name, uppercased, group prefix removed.
    pub name: String,
    /// Raw parameter segments between name and value.
    pub params: Vec<String>,
    /// Property value with text escapes resolved.
    pub value: String,
}

impl ContentLine {
    /// Splits one unfolded line into name, parameters and value.
    ///
    /// Returns `None` for lines without a `:` delimiter outside quotes.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut in_quotes = false;
        let mut colon = None;
        for (i, c) in raw.char_indices() {
            match c {
                '"' => in_quotes = !in_quotes,
                ':' if !in_quotes => {
                    colon = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let colon = colon?;

        let (head, value) = raw.split_at(colon);
        let value = value.get(1..).unwrap_or_default();

        let mut segments = split_unquoted(head, ';');
        let name_part = segments.next()?;

        // Strip grouping prefix, e.g. "item1.EMAIL" -> "EMAIL"
        let name = match name_part.rsplit_once('.') {
            Some((_, n)) => n,
            None => name_part,
        };
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_ascii_uppercase(),
            params: segments.map(str::to_string).collect(),
            value: unescape(value),
        })
    }

}

/// Unfolds vCard line continuations and yields parsed content lines.
///
/// Folded lines continue with a single space or tab; both CRLF and bare LF
/// separators are accepted.
pub fn content_lines(text: &str) -> Vec<ContentLine> {
    let mut unfolded: Vec<String> = Vec::new();

    for raw in text.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        if raw.is_empty() {
            continue;
        }
        if let Some(cont) = raw.strip_prefix(' ').or_else(|| raw.strip_prefix('\t')) {
            if let Some(last) = unfolded.last_mut() {
                last.push_str(cont);
                continue;
            }
        }
        unfolded.push(raw.to_string());
    }

    unfolded
        .iter()
        .filter_map(|l| ContentLine::parse(l))
        .collect()
}

fn split_unquoted(s: &str, sep: char) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c == sep && !in_quotes => {
                parts.push(s.get(start..i).unwrap_or_default());
                start = i + sep.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(s.get(start..).unwrap_or_default());
    parts.into_iter()
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_parse_simple_property() {
        let line = ContentLine::parse("FN:Ada Lovelace").unwrap();
        assert_eq!(line.name, "FN");
        assert!(line.params.is_empty());
        assert_eq!(line.value, "Ada Lovelace");
    }

    #[test]
    fn line_parse_with_params() {
        let line = ContentLine::parse("EMAIL;TYPE=work;PREF=1:ada@example.com").unwrap();
        assert_eq!(line.name, "EMAIL");
        assert_eq!(line.params, vec!["TYPE=work".to_string(), "PREF=1".to_string()]);
        assert_eq!(line.value, "ada@example.com");
    }

    #[test]
    fn line_parse_strips_group_prefix() {
        let line = ContentLine::parse("item1.EMAIL:ada@example.com").unwrap();
        assert_eq!(line.name, "EMAIL");
    }

    #[test]
    fn line_parse_quoted_param_with_colon() {
        let line = ContentLine::parse("X-URL;LABEL=\"see: here\":value").unwrap();
        assert_eq!(line.name, "X-URL");
        assert_eq!(line.params, vec!["LABEL=\"see: here\"".to_string()]);
        assert_eq!(line.value, "value");
    }

    #[test]
    fn line_parse_without_colon_is_none() {
        assert!(ContentLine::parse("not a content line").is_none());
    }

    #[test]
    fn line_unescapes_value() {
        let line = ContentLine::parse(r"NOTE:line1\nline2\, with comma").unwrap();
        assert_eq!(line.value, "line1\nline2, with comma");
    }

    #[test]
    fn content_lines_unfolds_continuations() {
        let text = "BEGIN:VCARD\r\nFN:Ada\r\n  Lovelace\r\nEND:VCARD\r\n";
        let lines = content_lines(text);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].value, "Ada Lovelace");
    }

    #[test]
    fn content_lines_accepts_bare_lf() {
        let lines = content_lines("BEGIN:VCARD\nFN:Ada\nEND:VCARD");
        assert_eq!(lines.len(), 3);
    }
}
