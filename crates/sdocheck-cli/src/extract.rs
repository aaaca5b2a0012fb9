//! JSON-LD blocks embedded in HTML pages

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref JSON_LD_SCRIPT: Regex =
        Regex::new(r#"(?is)<script\b[^>]*\btype\s*=\s*["']?application/ld\+json["']?[^>]*>(.*?)</script\s*>"#).unwrap();
}

/// Raw text of every `<script type="application/ld+json">` block, in page order
pub fn json_ld_blocks(html: &str) -> Vec<String> {
    JSON_LD_SCRIPT
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|block| block.as_str().trim().to_string())
        .collect()
}
