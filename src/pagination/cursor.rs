//! Cursor parsing
//!
//! The APIs only expose pagination through link URLs, so everything that
//! reads page/size out of a URL lives here.

use super::types::{Cursor, PageLink};
use crate::error::{Error, Result};
use url::Url;

/// Parse the page number and size out of a `next` link.
///
/// Relative links are accepted. A missing or non-numeric `page` is an error;
/// `size` is optional.
pub fn parse_cursor(href: &str) -> Result<Cursor> {
    let href = href.trim();
    if href.is_empty() {
        return Err(Error::cursor(href, "empty link"));
    }

    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("http://localhost/")
            .and_then(|base| base.join(href))
            .map_err(|e| Error::cursor(href, e.to_string()))?,
        Err(e) => return Err(Error::cursor(href, e.to_string())),
    };

    let mut page = None;
    let mut size = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "page" => page = Some(parse_number(href, "page", &value)?),
            "size" => size = Some(parse_number(href, "size", &value)?),
            _ => {}
        }
    }

    let page = page.ok_or_else(|| Error::cursor(href, "missing page parameter"))?;
    Ok(Cursor { page, size })
}

fn parse_number(href: &str, name: &str, value: &str) -> Result<u32> {
    value
        .parse::<u32>()
        .map_err(|_| Error::cursor(href, format!("invalid {name} '{value}'")))
}

/// Parse an RFC 5988 `Link` header into links
///
/// Format: `<url>; rel="next", <url>; rel="prev"`
pub fn parse_link_header(header: &str) -> Vec<PageLink> {
    let mut links = Vec::new();

    for part in header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(stripped) = segment.strip_prefix("rel=") {
                rel = Some(stripped.trim_matches('"').trim_matches('\''));
            }
        }

        if let (Some(u), Some(r)) = (url, rel) {
            links.push(PageLink::new(r, u));
        }
    }

    links
}
