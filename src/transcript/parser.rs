//! Caption track XML parsing.
//!
//! YouTube serves caption tracks in two shapes:
//! `<transcript><text start="1.2" dur="3.4">..</text></transcript>` (seconds), and
//! `<timedtext><body><p t="1200" d="3400">..</p></body></timedtext>` (milliseconds).
//! Both become a flat list of [`Segment`]s.

use once_cell::sync::Lazy;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::{Captures, Regex};

use super::{Segment, ServiceError, ServiceResult};

/// Timing units of the element currently being read
#[derive(Clone, Copy)]
enum Units {
    Seconds,
    Milliseconds,
}

/// A single character or numeric reference, e.g. `&amp;`, `&#39;` or `&#x2014;`
static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);").expect("valid entity pattern")
});

struct Open {
    start: f64,
    duration: f64,
    text: String,
}

/// Parse caption track XML into segments, dropping segments with no text
pub fn parse_transcript_xml(xml: &str) -> ServiceResult<Vec<Segment>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut segments = Vec::new();
    let mut open: Option<Open> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                // <s> runs inside srv3 cues just keep accumulating text
                if let Some(units) = cue_units(&e) {
                    open = Some(read_timing(&e, units));
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(cue) = open.as_mut() {
                    if e.name().as_ref() == b"br" {
                        cue.text.push('\n');
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(cue) = open.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| ServiceError::Unparsable(format!("caption text: {}", e)))?;
                    cue.text.push_str(&text);
                }
            }
            Ok(Event::CData(t)) => {
                if let Some(cue) = open.as_mut() {
                    cue.text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if name.as_ref() == b"text" || name.as_ref() == b"p" {
                    if let Some(cue) = open.take() {
                        let text = decode_entities(&cue.text);
                        if !text.trim().is_empty() {
                            segments.push(Segment {
                                text,
                                start: cue.start,
                                duration: cue.duration,
                            });
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                return Err(ServiceError::Unparsable(format!(
                    "caption XML at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
        buf.clear();
    }

    Ok(segments)
}

fn cue_units(e: &BytesStart<'_>) -> Option<Units> {
    match e.name().as_ref() {
        b"text" => Some(Units::Seconds),
        b"p" => Some(Units::Milliseconds),
        _ => None,
    }
}

fn read_timing(e: &BytesStart<'_>, units: Units) -> Open {
    let (start_key, dur_key): (&[u8], &[u8]) = match units {
        Units::Seconds => (b"start", b"dur"),
        Units::Milliseconds => (b"t", b"d"),
    };

    let mut start = 0.0;
    let mut duration = 0.0;
    for attr in e.attributes().flatten() {
        let value = attr
            .unescape_value()
            .ok()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(0.0);
        if attr.key.as_ref() == start_key {
            start = value;
        } else if attr.key.as_ref() == dur_key {
            duration = value;
        }
    }

    if let Units::Milliseconds = units {
        start /= 1000.0;
        duration /= 1000.0;
    }

    Open {
        start,
        duration,
        text: String::new(),
    }
}

/// Caption text arrives HTML-escaped inside XML, so `&amp;#39;` survives the
/// XML pass as `&#39;`. Decode each reference on its own; unknown ones stay as
/// written.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY
        .replace_all(text, |caps: &Captures<'_>| {
            let entity = &caps[0];
            unescape_with(entity, resolve_html5_entity)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| entity.to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_format() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="2.25">Hello there</text><text start="2.75" dur="1">General Kenobi</text></transcript>"#;

        let segments = parse_transcript_xml(xml).unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Hello there");
        assert_eq!(segments[0].start, 0.5);
        assert_eq!(segments[0].duration, 2.25);
        assert_eq!(segments[1].text, "General Kenobi");
    }

    #[test]
    fn test_double_escaped_entities() {
        let xml = r#"<transcript><text start="0" dur="1">it&amp;#39;s &amp;quot;fine&amp;quot; &amp;amp; good</text></transcript>"#;

        let segments = parse_transcript_xml(xml).unwrap();

        assert_eq!(segments[0].text, "it's \"fine\" & good");
    }

    #[test]
    fn test_literal_ampersand_kept() {
        let xml = r#"<transcript><text start="0" dur="1">rock &amp; roll</text></transcript>"#;

        let segments = parse_transcript_xml(xml).unwrap();

        assert_eq!(segments[0].text, "rock & roll");
    }

    #[test]
    fn test_unknown_entity_does_not_block_others() {
        let xml = r#"<transcript><text start="0" dur="1">Q&amp;A it&amp;#39;s &amp;bogus; ok</text></transcript>"#;

        let segments = parse_transcript_xml(xml).unwrap();

        assert_eq!(segments[0].text, "Q&A it's &bogus; ok");
    }

    #[test]
    fn test_html_named_entities() {
        let xml = r#"<transcript><text start="0" dur="1">caf&amp;eacute; &amp;mdash; na&amp;#xEF;ve</text></transcript>"#;

        let segments = parse_transcript_xml(xml).unwrap();

        assert_eq!(segments[0].text, "café \u{2014} naïve");
    }

    #[test]
    fn test_parse_srv3_format() {
        let xml = r#"<timedtext format="3"><body><p t="1200" d="3400">first<br/>line</p><p t="5000" d="1000"></p><p t="6000" d="500">last</p></body></timedtext>"#;

        let segments = parse_transcript_xml(xml).unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "first\nline");
        assert_eq!(segments[0].start, 1.2);
        assert_eq!(segments[0].duration, 3.4);
        assert_eq!(segments[1].text, "last");
    }

    #[test]
    fn test_empty_segments_dropped() {
        let xml = r#"<transcript><text start="0" dur="1"> </text><text start="1" dur="1">words</text></transcript>"#;

        let segments = parse_transcript_xml(xml).unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "words");
    }

    #[test]
    fn test_malformed_xml_is_unparsable() {
        let err = parse_transcript_xml("<transcript><text start=\"0\">oops</transcript>").unwrap_err();
        assert!(matches!(err, ServiceError::Unparsable(_)));
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_transcript_xml("").unwrap().is_empty());
    }
}
