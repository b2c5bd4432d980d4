//! Query term encoding and request URL construction

use crate::config::SearchConfig;
use crate::error::{SearchError, SearchResult};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::borrow::Cow;
use url::Url;

/// Everything except the RFC 3986 unreserved characters gets escaped.
const QUERY_TERM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a query term for embedding in a URL.
pub fn encode_term(query: &str) -> String {
    utf8_percent_encode(query, QUERY_TERM).to_string()
}

/// Turn raw input bytes into query text.
///
/// Input that is not valid UTF-8 is replaced by `fallback` when one is given,
/// otherwise it is rejected with [`SearchError::Encoding`].
pub fn decode_input<'a>(raw: &'a [u8], fallback: Option<&'a str>) -> SearchResult<Cow<'a, str>> {
    match std::str::from_utf8(raw) {
        Ok(text) => Ok(Cow::Borrowed(text)),
        Err(e) => match fallback {
            Some(term) => {
                log::warn!("Input is not valid text ({}), searching for '{}' instead", e, term);
                Ok(Cow::Borrowed(term))
            }
            None => Err(SearchError::Encoding(e.to_string())),
        },
    }
}

/// Build the full search URL for `query` on top of a validated endpoint.
///
/// The query string is assembled from [`encode_term`] values rather than
/// form-encoded pairs, which would turn spaces into `+`.
pub fn build_search_url(endpoint: &Url, config: &SearchConfig, query: &str) -> Url {
    let mut url = endpoint.clone();
    url.set_query(Some(&format!(
        "key={}&q={}&per_page={}&safesearch={}",
        encode_term(&config.api_key),
        encode_term(query),
        config.per_page,
        config.safe_search,
    )));
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreserved_passes_through() {
        let term = "AZaz09-._~";
        assert_eq!(encode_term(term), term);
        assert_eq!(encode_term("yellow_flowers"), "yellow_flowers");
    }

    #[test]
    fn test_reserved_and_non_ascii_are_escaped() {
        assert_eq!(encode_term("red car"), "red%20car");
        assert_eq!(encode_term("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_term("100%"), "100%25");
        assert_eq!(encode_term("café"), "caf%C3%A9");
        assert_eq!(encode_term(""), "");
    }

    #[test]
    fn test_build_search_url() {
        let config = SearchConfig::new("k3y");
        let endpoint = config.validate().unwrap();
        assert_eq!(
            build_search_url(&endpoint, &config, "sea turtle").as_str(),
            "https://pixabay.com/api/?key=k3y&q=sea%20turtle&per_page=200&safesearch=true"
        );
    }

    #[test]
    fn test_build_search_url_keeps_endpoint_path_and_port() {
        let config = SearchConfig::new("k").with_endpoint("http://localhost:9000/v2/photos");
        let endpoint = config.validate().unwrap();
        let url = build_search_url(&endpoint, &config, "a&b c~d");
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/v2/photos?key=k&q=a%26b%20c~d&per_page=200&safesearch=true"
        );
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_decode_input_valid_text() {
        let text = decode_input("dog".as_bytes(), None).unwrap();
        assert_eq!(text, "dog");
    }

    #[test]
    fn test_decode_input_invalid_without_fallback() {
        let result = decode_input(&[0x66, 0xff, 0x6f], None);
        assert!(matches!(result, Err(SearchError::Encoding(_))));
    }

    #[test]
    fn test_decode_input_invalid_with_fallback() {
        let text = decode_input(&[0xc3, 0x28], Some("opal")).unwrap();
        assert_eq!(text, "opal");
    }
}
