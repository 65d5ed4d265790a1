//! Now-playing extraction
//!
//! Turns the `meta` entries of a status document into the display string
//! written to the outputs, plus the artwork reference.

use crate::player::PlayerStatus;
use quick_xml::escape::resolve_html5_entity;
use std::borrow::Cow;

/// Placeholder used for both halves of the fallback display string
pub const UNKNOWN: &str = "UNKNOWN";

/// Longest HTML5 entity name is 31 characters
const MAX_ENTITY_LEN: usize = 32;

/// Entities HTML still recognizes without the trailing `;`: the Latin-1 set
/// plus the uppercase spellings of the markup characters
const LEGACY_ENTITIES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren",
    "deg", "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34",
    "gt", "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Longest name in [`LEGACY_ENTITIES`]
const MAX_LEGACY_LEN: usize = 6;

/// Metadata fields that drive the display string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    /// Stream-provided "now playing" text (radio streams)
    pub now_playing: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    /// File name with its extension stripped
    pub filename: Option<String>,
    /// Artwork reference, empty when the track has none
    pub artwork_url: String,
}

impl TrackMetadata {
    /// Pick the relevant fields out of a status; empty values count as absent
    pub fn from_status(status: &PlayerStatus) -> Self {
        let field = |name: &str| -> Option<String> {
            status
                .meta(name)
                .map(strip_bom)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        Self {
            now_playing: field("now_playing"),
            title: field("title"),
            artist: field("artist"),
            filename: field("filename").map(|name| strip_extension(&name).to_string()),
            artwork_url: status
                .meta("artwork_url")
                .map(strip_bom)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Build the display string, first match wins:
    /// now_playing, "title - artist", title, filename, "UNKNOWN - UNKNOWN".
    ///
    /// HTML entities are decoded in the result.
    pub fn display_string(&self) -> String {
        let raw = match (&self.now_playing, &self.title, &self.artist, &self.filename) {
            (Some(now_playing), _, _, _) => now_playing.clone(),
            (None, Some(title), Some(artist), _) => format!("{} - {}", title, artist),
            (None, Some(title), None, _) => title.clone(),
            (None, None, _, Some(filename)) => filename.clone(),
            (None, None, _, None) => format!("{} - {}", UNKNOWN, UNKNOWN),
        };

        decode_html_entities(&raw).into_owned()
    }
}

/// Remove a leading UTF-8 byte-order mark
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Strip the last extension of the file name part of `name`
///
/// Leading dots of the base name never start an extension, so `.hidden`
/// is returned unchanged.
pub fn strip_extension(name: &str) -> &str {
    let base_start = name.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let base = &name[base_start..];

    match base.rfind('.') {
        Some(dot) if base[..dot].chars().any(|c| c != '.') => &name[..base_start + dot],
        _ => name,
    }
}

/// Decode HTML character references (`&amp;`, `&eacute;`, `&#39;`, `&#x27;`)
///
/// Legacy references without the `;` (`&amp`, `&eacute`) are decoded too,
/// longest match first. Anything that does not form a known reference, such
/// as a bare `&`, is kept as-is.
pub fn decode_html_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];

        let decoded = tail
            .find(';')
            .filter(|&end| end > 0 && end <= MAX_ENTITY_LEN)
            .and_then(|end| resolve_entity(&tail[..end]).map(|value| (value, end + 1)))
            .or_else(|| resolve_legacy_entity(tail).map(|(value, len)| (Cow::Borrowed(value), len)));

        match decoded {
            Some((value, consumed)) => {
                out.push_str(&value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

fn resolve_entity(name: &str) -> Option<Cow<'static, str>> {
    match name.strip_prefix('#') {
        Some(number) => {
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code).map(|c| Cow::Owned(c.to_string()))
        }
        None => resolve_html5_entity(name).map(Cow::Borrowed),
    }
}

/// Match a semicolon-less legacy entity at the start of `tail`
fn resolve_legacy_entity(tail: &str) -> Option<(&'static str, usize)> {
    let run = tail
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count()
        .min(MAX_LEGACY_LEN);

    (2..=run).rev().find_map(|len| {
        let name = &tail[..len];
        if LEGACY_ENTITIES.contains(&name) {
            resolve_html5_entity(name).map(|value| (value, len))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerState;

    fn status(entries: &[(&str, &str)]) -> PlayerStatus {
        let mut status = PlayerStatus::new(PlayerState::Playing);
        for (name, value) in entries {
            status.metadata.insert(name.to_string(), value.to_string());
        }
        status
    }

    fn display(entries: &[(&str, &str)]) -> String {
        TrackMetadata::from_status(&status(entries)).display_string()
    }

    #[test]
    fn test_title_and_artist() {
        assert_eq!(
            display(&[("title", "Song A"), ("artist", "Band B")]),
            "Song A - Band B"
        );
    }

    #[test]
    fn test_now_playing_wins() {
        assert_eq!(
            display(&[
                ("now_playing", "Live Radio Show"),
                ("title", "Song A"),
                ("artist", "Band B"),
                ("filename", "stream.m3u"),
            ]),
            "Live Radio Show"
        );
    }

    #[test]
    fn test_title_only() {
        assert_eq!(display(&[("title", "Song A"), ("filename", "x.mp3")]), "Song A");
    }

    #[test]
    fn test_artist_without_title_falls_through() {
        assert_eq!(
            display(&[("artist", "Band B"), ("filename", "01 - Intro.flac")]),
            "01 - Intro"
        );
        assert_eq!(display(&[("artist", "Band B")]), "UNKNOWN - UNKNOWN");
    }

    #[test]
    fn test_nothing_present() {
        assert_eq!(display(&[]), "UNKNOWN - UNKNOWN");
        assert_eq!(
            display(&[("now_playing", ""), ("title", ""), ("filename", "")]),
            "UNKNOWN - UNKNOWN"
        );
    }

    #[test]
    fn test_bom_stripped() {
        let meta = TrackMetadata::from_status(&status(&[
            ("title", "\u{feff}Song A"),
            ("artist", "\u{feff}Band B"),
            ("artwork_url", "\u{feff}file:///tmp/a.jpg"),
        ]));

        assert_eq!(meta.title.as_deref(), Some("Song A"));
        assert_eq!(meta.artwork_url, "file:///tmp/a.jpg");
        assert_eq!(meta.display_string(), "Song A - Band B");

        // A value that is only a BOM is empty
        assert_eq!(display(&[("now_playing", "\u{feff}"), ("title", "T")]), "T");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(
            display(&[("title", "Rock &amp; Roll"), ("artist", "Beyonc&eacute;")]),
            "Rock & Roll - Beyoncé"
        );
        assert_eq!(display(&[("now_playing", "Don&#39;t Stop &#x2764;")]), "Don't Stop ❤");
    }

    #[test]
    fn test_decode_leaves_unknown_references() {
        assert_eq!(decode_html_entities("Tom & Jerry"), "Tom & Jerry");
        assert_eq!(decode_html_entities("a &bogus; b &amp; c"), "a &bogus; b & c");
        assert_eq!(decode_html_entities("trailing &"), "trailing &");
        assert!(matches!(decode_html_entities("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_decode_legacy_references_without_semicolon() {
        assert_eq!(decode_html_entities("Rock &amp Roll"), "Rock & Roll");
        assert_eq!(decode_html_entities("Beyonc&eacute"), "Beyoncé");
        assert_eq!(decode_html_entities("&copy2024 &lt3"), "©2024 <3");
        assert_eq!(decode_html_entities("&notit"), "¬it");
        // Only the legacy names work without `;`
        assert_eq!(decode_html_entities("AT&T and &hellip"), "AT&T and &hellip");
        assert_eq!(decode_html_entities("&hellip;"), "…");
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("song.mp3"), "song");
        assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
        assert_eq!(strip_extension("no_extension"), "no_extension");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("..hidden.ogg"), "..hidden");
        assert_eq!(strip_extension("dir.v2/track"), "dir.v2/track");
        assert_eq!(strip_extension("C:\\dir.v2\\track.wav"), "C:\\dir.v2\\track");
    }

    #[test]
    fn test_artwork_url_defaults_to_empty() {
        let meta = TrackMetadata::from_status(&status(&[("title", "x")]));
        assert_eq!(meta.artwork_url, "");
    }
}
