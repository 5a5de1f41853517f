use encoding_rs::WINDOWS_1250;

use crate::crawlers::SiteConfig;

/// Female name list on `rodina.cz`, served in windows-1250.
pub fn site() -> SiteConfig {
    SiteConfig {
        id: "rodina",
        url: "https://www.rodina.cz/scripts/jmena/default.asp?muz=0",
        encoding: WINDOWS_1250,
        item_selector: ".jmena_vse h2",
        text_selector: Some("a"),
        filter: None,
    }
}
