//! Page-token codec.
//!
//! Cloudflare paginates with a 1-based page number; the governance side
//! passes an opaque string. The empty string is the first page on input and
//! the end of the enumeration on output.

use crate::error::{CloudflareError, CloudflareResult};

/// Decode a page token into a page number.
pub fn parse_page_token(token: &str) -> CloudflareResult<u32> {
    if token.is_empty() {
        return Ok(1);
    }

    match token.parse::<u32>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(CloudflareError::InvalidPageToken(token.to_string())),
    }
}

/// Token following `page` when it returned `item_count` items.
///
/// An empty page ends the enumeration; otherwise the next page is requested.
#[must_use]
pub fn next_page_token(page: u32, item_count: usize) -> String {
    if item_count == 0 {
        return String::new();
    }
    (u64::from(page) + 1).to_string()
}

/// Like [`next_page_token`], but also ends the enumeration once the pages
/// seen so far cover the reported total, avoiding a trailing empty fetch.
///
/// `per_page == 0` means the page size is unknown and only the empty-page
/// rule applies.
#[must_use]
pub fn next_page_token_bounded(
    page: u32,
    per_page: u32,
    item_count: usize,
    total_count: u32,
) -> String {
    if per_page > 0 {
        let seen = u64::from(page.saturating_sub(1)) * u64::from(per_page) + item_count as u64;
        if seen >= u64::from(total_count) {
            return String::new();
        }
    }
    next_page_token(page, item_count)
}
