// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Safe attributes for outbound links and CSP nonces.

use rand::RngCore;
use serde::Serialize;
use url::Url;

const EXTERNAL_REL: &str = "noopener noreferrer nofollow";

/// Anchor attributes for a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkAttrs {
    pub href: String,
    pub target: &'static str,
    pub rel: &'static str,
}

/// Decide how a link should open.
///
/// Relative paths, fragments and URLs on `site_host` stay in the current
/// tab. Anything else opens in a new tab without an opener or referrer.
pub fn secure_link(href: &str, site_host: &str) -> LinkAttrs {
    let external = if href.starts_with('/') || href.starts_with('#') {
        // Protocol-relative `//host/...` still leaves the site.
        href.starts_with("//")
            && Url::parse(&format!("https:{href}"))
                .ok()
                .and_then(|url| url.host_str().map(|h| !h.eq_ignore_ascii_case(site_host)))
                .unwrap_or(true)
    } else {
        match Url::parse(href) {
            Ok(url) => url
                .host_str()
                .map_or(true, |host| !host.eq_ignore_ascii_case(site_host)),
            // Bare hosts such as `github.com/someone` have no scheme.
            Err(_) => true,
        }
    };

    LinkAttrs {
        href: href.to_string(),
        target: if external { "_blank" } else { "_self" },
        rel: if external { EXTERNAL_REL } else { "" },
    }
}

/// 128-bit random nonce, hex encoded, for `script-src 'nonce-…'`.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
