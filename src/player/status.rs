//! VLC status document (status.xml) parser

use super::model::{PlayerState, PlayerStatus};
use crate::error::PollError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse a status document
///
/// Only two parts of the document matter: the `<state>` child of the document
/// element and the `<info name="...">` entries under
/// `<information><category name="meta">`. Everything else is skipped, but the
/// whole document must still be well-formed.
pub fn parse_status(xml: &str) -> Result<PlayerStatus, PollError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut state: Option<String> = None;
    let mut status = PlayerStatus::new(PlayerState::Other(String::new()));

    // Element names from the document element down to the current element
    let mut stack: Vec<Vec<u8>> = Vec::new();
    // Depth at which the meta category was opened
    let mut meta_depth: Option<usize> = None;
    // Text collected for the element being read
    let mut capture: Option<Capture> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            PollError::Parse(format!(
                "XML error at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => {
                let depth = stack.len();
                match e.name().as_ref() {
                    b"state" if depth == 1 => {
                        capture = Some(Capture::State(String::new()));
                    }
                    b"category"
                        if depth == 2
                            && stack[1] == b"information"
                            && name_attribute(&e)?.as_deref() == Some("meta") =>
                    {
                        meta_depth = Some(depth);
                    }
                    b"info" if is_meta_child(meta_depth, depth) => {
                        if let Some(name) = name_attribute(&e)? {
                            capture = Some(Capture::Info(name, String::new()));
                        }
                    }
                    _ => {}
                }
                stack.push(e.name().as_ref().to_vec());
            }

            Event::Empty(e) => {
                // <info name="x"/> still counts as a present, empty entry
                if e.name().as_ref() == b"info" && is_meta_child(meta_depth, stack.len()) {
                    if let Some(name) = name_attribute(&e)? {
                        status.metadata.insert(name, String::new());
                    }
                } else if e.name().as_ref() == b"state" && stack.len() == 1 {
                    state = Some(String::new());
                }
            }

            Event::Text(e) => {
                if let Some(ref mut capture) = capture {
                    let text = e
                        .unescape()
                        .map_err(|e| PollError::Parse(format!("bad text content: {}", e)))?;
                    capture.push(&text);
                }
            }

            Event::CData(e) => {
                if let Some(ref mut capture) = capture {
                    capture.push(&String::from_utf8_lossy(&e));
                }
            }

            Event::End(_) => {
                stack.pop();
                if meta_depth == Some(stack.len()) {
                    meta_depth = None;
                }
                match capture.take() {
                    Some(Capture::State(text)) => state = Some(text),
                    Some(Capture::Info(name, text)) => {
                        status.metadata.insert(name, text);
                    }
                    None => {}
                }
            }

            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(PollError::Parse(format!(
            "document ended inside <{}>",
            String::from_utf8_lossy(stack.last().map(Vec::as_slice).unwrap_or_default())
        )));
    }

    let state = state.ok_or_else(|| PollError::Parse("missing <state> element".to_string()))?;
    status.state = PlayerState::from_text(&state);

    log::debug!(
        "Parsed status: state={:?}, {} meta entries",
        status.state,
        status.metadata.len()
    );
    Ok(status)
}

/// Whether an element opened at `depth` sits directly in the meta category
fn is_meta_child(meta_depth: Option<usize>, depth: usize) -> bool {
    meta_depth.is_some_and(|meta| meta + 1 == depth)
}

/// Text being collected for an element of interest
enum Capture {
    State(String),
    Info(String, String),
}

impl Capture {
    fn push(&mut self, text: &str) {
        match self {
            Capture::State(buf) | Capture::Info(_, buf) => buf.push_str(text),
        }
    }
}

fn name_attribute(e: &BytesStart<'_>) -> Result<Option<String>, PollError> {
    let attr = e
        .try_get_attribute("name")
        .map_err(|e| PollError::Parse(format!("bad attribute: {}", e)))?;

    match attr {
        Some(attr) => {
            let value = attr
                .unescape_value()
                .map_err(|e| PollError::Parse(format!("bad attribute value: {}", e)))?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="yes" ?>
<root>
<fullscreen>false</fullscreen>
<volume>256</volume>
<state>playing</state>
<information>
  <category name="meta">
    <info name='title'>Song A</info>
    <info name='artist'>Band B</info>
    <info name='filename'>song_a.mp3</info>
    <info name='artwork_url'>file:///home/user/.cache/vlc/art/cover.jpg</info>
  </category>
  <category name="Stream 0">
    <info name='Codec'>MPEG Audio layer 1/2 (mpga)</info>
    <info name='title'>not metadata</info>
  </category>
</information>
</root>"#;

    #[test]
    fn test_parse_sample() {
        let status = parse_status(SAMPLE).unwrap();

        assert_eq!(status.state, PlayerState::Playing);
        assert_eq!(status.meta("title"), Some("Song A"));
        assert_eq!(status.meta("artist"), Some("Band B"));
        assert_eq!(status.meta("filename"), Some("song_a.mp3"));
        assert_eq!(
            status.meta("artwork_url"),
            Some("file:///home/user/.cache/vlc/art/cover.jpg")
        );
        assert_eq!(status.meta("Codec"), None);
        assert_eq!(status.metadata.len(), 4);
    }

    #[test]
    fn test_parse_states() {
        for (text, expected) in [
            ("paused", PlayerState::Paused),
            ("stopped", PlayerState::Stopped),
            ("buffering", PlayerState::Other("buffering".to_string())),
        ] {
            let xml = format!("<root><state>{}</state></root>", text);
            assert_eq!(parse_status(&xml).unwrap().state, expected);
        }
    }

    #[test]
    fn test_entities_and_cdata() {
        let xml = r#"<root><state>playing</state><information><category name="meta">
            <info name="title">Rock &amp;amp; Roll &amp;#39;n&amp;#39;</info>
            <info name="artist"><![CDATA[AC/DC]]></info>
            <info name="now_playing"/>
        </category></information></root>"#;
        let status = parse_status(xml).unwrap();

        // XML entities decoded once; the HTML layer is left for the extractor
        assert_eq!(status.meta("title"), Some("Rock &amp; Roll &#39;n&#39;"));
        assert_eq!(status.meta("artist"), Some("AC/DC"));
        assert_eq!(status.meta("now_playing"), Some(""));
    }

    #[test]
    fn test_nested_state_is_not_top_level() {
        let xml = "<root><information><state>playing</state></information></root>";
        assert!(matches!(parse_status(xml), Err(PollError::Parse(_))));
    }

    #[test]
    fn test_missing_state() {
        assert!(matches!(
            parse_status("<root><volume>1</volume></root>"),
            Err(PollError::Parse(_))
        ));
        assert!(matches!(parse_status(""), Err(PollError::Parse(_))));
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            parse_status("<root><state>playing</status></root>"),
            Err(PollError::Parse(_))
        ));
        assert!(matches!(
            parse_status("<root><state>playing</state>"),
            Err(PollError::Parse(_))
        ));
    }
}
