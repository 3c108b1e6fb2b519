//! HTML pages for the root of a site and for names without a link.

/// Per-site text for the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteProfile {
    pub site: &'static str,
    /// Registration app.
    pub app_url: &'static str,
    /// Example of a name whose fields are rendered by the service.
    pub description_url: &'static str,
    /// Brand shown in the page header.
    pub header: &'static str,
    /// TLD of the names served, with a leading dot.
    pub tld: &'static str,
}

pub const SITES: &[SiteProfile] = &[
    SiteProfile {
        site: "bch.is",
        app_url: "https://app.bch.domains",
        description_url: "https://lns.bch.is/description",
        header: "bch.domains",
        tld: ".bch",
    },
    SiteProfile {
        site: "doge.wf",
        app_url: "https://app.dogedomains.wf",
        description_url: "https://dns.doge.wf/description",
        header: "dogedomains.wf",
        tld: ".doge",
    },
    SiteProfile {
        site: "dcdomain.wf",
        app_url: "https://app.dogedomains.wf",
        description_url: "https://dns.doge.wf/description",
        header: "dogedomains.wf",
        tld: ".dc",
    },
];

pub fn profile(site: &str) -> Option<&'static SiteProfile> {
    SITES.iter().find(|p| p.site == site)
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn link(url: &str) -> String {
    let url = escape_html(url);
    format!(r#"<a href="{url}">{url}</a>"#)
}

/// Landing page of a site.
pub fn root_page(site: &str) -> String {
    let body = match profile(site) {
        Some(p) => format!(
            "    <h2>{header} resolution service</h2>\n    <div>\n      \
             <p>If you are owner of a {tld} domain, you can set 'ContentHash' or 'URL' in the app {app}</p>\n      \
             <p>This service redirects to a resolved external link first using 'ContentHash'</p>\n      \
             <p>It will fall back to a link set in 'URL' field</p>\n      \
             <p>You can set content to any other field and it will be rendered in this service. E.g. {description}</p>\n    \
             </div>",
            header = escape_html(p.header),
            tld = escape_html(p.tld),
            app = link(p.app_url),
            description = link(p.description_url),
        ),
        None => format!(
            "    <h2>{} resolution service</h2>\n    <div>\n      \
             <p>This service redirects to a resolved external link first using 'ContentHash'</p>\n      \
             <p>It will fall back to a link set in 'URL' field</p>\n    </div>",
            escape_html(site)
        ),
    };
    document(&body)
}

/// Page for a name with nothing to redirect to.
pub fn not_found_page(domain: &str, site: &str) -> String {
    let owner = match profile(site) {
        Some(p) => format!(
            "If you are owner of this name, set 'ContentHash' or 'URL' at {}",
            link(&format!("{}/name/{}", p.app_url, domain))
        ),
        None => "If you are owner of this name, set its 'ContentHash' or 'URL' record".to_string(),
    };
    let body = format!(
        "    <h2>Redirect link not found for {domain}</h2>\n    <div>\n      \
         <p>{owner}</p>\n      \
         <p>This page will be used to redirect to a resolved external link first using 'ContentHash'</p>\n      \
         <p>It will fall back to a link set in 'URL' field</p>\n    </div>",
        domain = escape_html(domain),
    );
    document(&body)
}

fn document(body: &str) -> String {
    format!("<!doctype html>\n<html lang=\"en\">\n  <body>\n{body}\n  </body>\n</html>\n")
}
