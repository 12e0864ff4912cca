//! Extraction of the latest firmware version from the published
//! release feed.
//!
//! The feed is a GitHub Atom document; all the client needs from it is
//! the first entry's title, which carries the release tag.

use crate::core::domain::error::{BmcError, BmcResult};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Where the firmware project publishes its releases.
pub(crate) const RELEASE_FEED_URL: &str =
    "https://github.com/turing-machines/BMC-Firmware/releases.atom";

/// Returns the first `<entry><title>` text of an Atom feed.
pub(crate) fn first_entry_title(xml: &str) -> BmcResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut in_entry = false;
    let mut in_title = false;

    loop {
        match reader.read_event() {
            Err(e) => {
                return Err(BmcError::Protocol(format!("invalid release feed XML: {}", e)));
            }
            Ok(Event::Eof) => {
                return Err(BmcError::Protocol(
                    "release feed contains no entries".to_string(),
                ));
            }
            Ok(Event::Start(element)) => match element.local_name().as_ref() {
                b"entry" => in_entry = true,
                b"title" if in_entry => in_title = true,
                _ => {}
            },
            Ok(Event::Text(text)) if in_title => {
                let title = text
                    .unescape()
                    .map_err(|e| BmcError::Protocol(format!("invalid release feed XML: {}", e)))?;
                let title = title.trim();
                if title.is_empty() {
                    return Err(BmcError::Protocol(
                        "release feed entry has an empty title".to_string(),
                    ));
                }
                return Ok(title.to_string());
            }
            Ok(Event::End(element)) if element.local_name().as_ref() == b"title" => {
                in_title = false;
            }
            Ok(_) => {}
        }
    }
}

/// Strips the release tag's `v` prefix, if present.
pub(crate) fn strip_tag_prefix(title: &str) -> &str {
    title
        .strip_prefix('v')
        .or_else(|| title.strip_prefix('V'))
        .unwrap_or(title)
}
