//! Displayable representations of encoded images.
//!
//! A `data:` URL embeds the bytes directly, so it can be used as an
//! `<img src>` and passed around as a plain string without any object
//! URL lifetime to manage.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Build a base64 `data:` URL for `bytes` labelled with `mime_type`.
#[must_use]
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    format!("data:{mime_type};base64,{encoded}")
}

/// Extract the payload of a base64 `data:` URL.
///
/// Returns `None` if `url` is not a base64 `data:` URL or the payload
/// is not valid base64.
#[must_use]
pub fn decode_data_url(url: &str) -> Option<Vec<u8>> {
    let rest = url.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    if !meta.ends_with(";base64") {
        return None;
    }
    STANDARD.decode(payload).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn data_url_has_mime_prefix() {
        let url = data_url("image/png", &[1, 2, 3]);
        assert_eq!(url, "data:image/png;base64,AQID");
    }

    #[test]
    fn data_url_payload_recovers_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        let url = data_url("image/webp", &bytes);
        assert_eq!(decode_data_url(&url).unwrap(), bytes);
    }

    #[test]
    fn non_base64_urls_are_rejected() {
        assert!(decode_data_url("data:text/plain,hello").is_none());
        assert!(decode_data_url("https://example.com/a.png").is_none());
    }
}
