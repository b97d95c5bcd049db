//! KIF text published inside an HTML page.
//!
//! Markup is stripped, line-breaking tags become newlines and character
//! references are decoded; the remaining text is read as KIF.

use game_core::GameLog;

use super::{ParseError, kif};

const LINE_BREAK_TAGS: &[&str] = &["br", "p", "div", "tr", "li", "pre"];

pub fn parse(html: &str) -> Result<GameLog, ParseError> {
    kif::parse(&to_text(html))
}

/// Visible text of `html`.
pub fn to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        text.push_str(&decode_entities(&rest[..open]));
        let Some(close) = rest[open..].find('>') else {
            rest = "";
            break;
        };
        let tag = &rest[open + 1..open + close];
        if LINE_BREAK_TAGS.contains(&tag_name(tag).as_str()) {
            text.push('\n');
        }
        rest = &rest[open + close + 1..];
    }
    text.push_str(&decode_entities(rest));
    text
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&rest[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::LineEnding;

    #[test]
    fn strips_markup_and_decodes_entities() {
        let text = to_text("<p>a&amp;b<br/>c&#x41;&#66;<span class=\"x\">d</span>&unknown;</p>");
        assert_eq!(text, "\na&b\ncABd&unknown;\n");
    }

    #[test]
    fn html_wrapped_kif_matches_plain_kif() {
        let kif_text = "先手：Alice\n後手：Bob\n   1 ７六歩(77)\n   2 ３四歩(33)\n   3 投了\n";
        let html = format!(
            "<html><body><pre>{}</pre></body></html>",
            kif_text.replace('\n', "<br>")
        );

        let plain = kif::parse(kif_text).unwrap();
        let wrapped = parse(&html).unwrap();
        assert_eq!(wrapped.plies(), plain.plies());
        assert_eq!(wrapped.digest(), plain.digest());
    }

    #[test]
    fn exported_kif_survives_html_wrapping() {
        let log = kif::parse("先手：A\n後手：B\n   1 ５八玉(59)\n").unwrap();
        let html = kif::write(&log, LineEnding::Unix).replace('\n', "<BR>\n");
        assert_eq!(parse(&html).unwrap().digest(), log.digest());
    }
}
