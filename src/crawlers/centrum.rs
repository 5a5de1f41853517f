use encoding_rs::UTF_8;

use crate::crawlers::{SiteConfig, without_whitespace};

/// Name day calendar on `svatky.centrum.cz`; double names are skipped.
pub fn site() -> SiteConfig {
    SiteConfig {
        id: "centrum",
        url: "http://svatky.centrum.cz/jmenny-seznam/?gender=1",
        encoding: UTF_8,
        item_selector: "#list-names .name",
        text_selector: Some("a"),
        filter: Some(without_whitespace),
    }
}
