//! Next-page discovery for paginated list endpoints.
//!
//! A [`Pager`] inspects one response and reports where the next page lives.
//! [`HttpClient::list_all`](crate::clients::HttpClient::list_all) follows
//! those pointers until a response reports no next page.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use newrelic_client::clients::{HttpResponse, LinkHeaderPager, Pager};
//!
//! let mut headers = HashMap::new();
//! headers.insert(
//!     "link".to_string(),
//!     vec![r#"<https://x/y?page=2>; rel="next""#.to_string()],
//! );
//! let response = HttpResponse::new(200, headers, Vec::new());
//!
//! let paging = LinkHeaderPager.parse(&response);
//! assert_eq!(paging.next.as_deref(), Some("https://x/y?page=2"));
//! ```

use std::fmt::Debug;

use crate::clients::http_response::HttpResponse;

/// The next-page pointer extracted from one response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Paging {
    /// Absolute or relative URL of the next page; `None` on the last page.
    pub next: Option<String>,
}

/// Extracts the next-page pointer from a response.
pub trait Pager: Send + Sync + Debug {
    /// Parses `response` into a [`Paging`].
    fn parse(&self, response: &HttpResponse) -> Paging;
}

/// Reads the RFC 5988 `Link` header, following the `rel="next"` relation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkHeaderPager;

impl LinkHeaderPager {
    /// Returns the URL of the `rel="next"` relation in a `Link` header value.
    #[must_use]
    pub fn next_link(header_value: &str) -> Option<String> {
        header_value.split(',').find_map(|link| {
            let mut parts = link.trim().split(';');

            let url = parts
                .next()
                .map(|s| s.trim().trim_start_matches('<').trim_end_matches('>'))?;

            let is_next = parts.any(|param| {
                let param = param.trim();
                param.strip_prefix("rel=").is_some_and(|rel| {
                    rel.trim_matches('"')
                        .split_whitespace()
                        .any(|relation| relation.eq_ignore_ascii_case("next"))
                })
            });

            (is_next && !url.is_empty()).then(|| url.to_string())
        })
    }
}

impl Pager for LinkHeaderPager {
    fn parse(&self, response: &HttpResponse) -> Paging {
        let next = response
            .headers
            .get("link")
            .into_iter()
            .flatten()
            .find_map(|value| Self::next_link(value));
        Paging { next }
    }
}

/// Reads the `links.next` field of the JSON body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonBodyPager;

impl Pager for JsonBodyPager {
    fn parse(&self, response: &HttpResponse) -> Paging {
        let next = serde_json::from_slice::<serde_json::Value>(&response.body)
            .ok()
            .and_then(|body| {
                body.pointer("/links/next")
                    .and_then(serde_json::Value::as_str)
                    .filter(|next| !next.is_empty())
                    .map(str::to_string)
            });
        Paging { next }
    }
}
