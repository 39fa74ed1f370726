//! Key codec
//!
//! Turns the ordered set of identifying fields of a resource (`id`, `name`,
//! `host_name` + `nad_ip`, ...) into the single opaque string the caller
//! persists, and back.
//!
//! # Format
//!
//! Entries are written in order as `application/x-www-form-urlencoded`
//! pairs, e.g. `id=abc&name=Guest1`. Separators and escapes inside keys and
//! values are percent-encoded, so distinct field sets never share an
//! encoding. Nothing outside this module should look inside the string.

mod types;

pub use types::KeyFields;

use url::form_urlencoded;

/// Encode key fields into an opaque identifier
pub fn encode(fields: &KeyFields) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields.iter() {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Decode an opaque identifier back into key fields.
///
/// Never fails: garbage input yields whatever pairs could be read (possibly
/// none), and the lookup that follows decides what that means.
pub fn decode(identifier: &str) -> KeyFields {
    form_urlencoded::parse(identifier.trim().as_bytes())
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}
