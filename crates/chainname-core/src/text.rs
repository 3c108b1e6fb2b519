//! Text-record aliases and profile links.

/// Alias → canonical text-record key.
const TEXT_KEYS: &[(&str, &str)] = &[
    ("twitter", "com.twitter"),
    ("github", "com.github"),
    ("gitlab", "com.gitlab"),
    ("reddit", "com.reddit"),
    ("telegram", "org.telegram"),
    ("email", "email"),
    ("url", "url"),
    ("avatar", "avatar"),
];

/// Map a short alias to its canonical key.
///
/// Unknown aliases pass through unchanged with `false`.
pub fn alias_to_key(alias: &str) -> (&str, bool) {
    TEXT_KEYS
        .iter()
        .find(|(a, _)| *a == alias)
        .map_or((alias, false), |(_, key)| (*key, true))
}

/// Build a navigable link from a canonical key and its record value.
pub fn build_link(key: &str, value: &str) -> String {
    if key == "email" {
        return format!("mailto:{value}");
    }

    let formatted = match key {
        "com.twitter" => format!("twitter.com/{value}"),
        "com.github" => format!("github.com/{value}"),
        "com.gitlab" => format!("gitlab.com/{value}"),
        "com.reddit" => format!("reddit.com/u/{value}"),
        "org.telegram" => format!("t.me/{value}"),
        _ => value.to_string(),
    };
    prepend_scheme(formatted)
}

fn prepend_scheme(url: String) -> String {
    if url.is_empty() || has_http_scheme(&url) {
        url
    } else {
        format!("https://{url}")
    }
}

fn has_http_scheme(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_aliases() {
        assert_eq!(alias_to_key("twitter"), ("com.twitter", true));
        assert_eq!(alias_to_key("telegram"), ("org.telegram", true));
        assert_eq!(alias_to_key("email"), ("email", true));
        assert_eq!(alias_to_key("avatar"), ("avatar", true));
    }

    #[test]
    fn unknown_alias_passes_through() {
        assert_eq!(alias_to_key("unknownfield"), ("unknownfield", false));
        assert_eq!(alias_to_key("com.twitter"), ("com.twitter", false));
        assert_eq!(alias_to_key("Twitter"), ("Twitter", false));
    }

    #[test]
    fn profile_links() {
        assert_eq!(build_link("com.twitter", "alice"), "https://twitter.com/alice");
        assert_eq!(build_link("com.github", "alice"), "https://github.com/alice");
        assert_eq!(build_link("com.gitlab", "alice"), "https://gitlab.com/alice");
        assert_eq!(build_link("com.reddit", "alice"), "https://reddit.com/u/alice");
        assert_eq!(build_link("org.telegram", "alice"), "https://t.me/alice");
    }

    #[test]
    fn email_is_mailto() {
        assert_eq!(build_link("email", "a@b.com"), "mailto:a@b.com");
        assert_eq!(build_link("email", "https://a@b.com"), "mailto:https://a@b.com");
    }

    #[test]
    fn url_scheme_handling() {
        assert_eq!(build_link("url", "example.com"), "https://example.com");
        assert_eq!(build_link("url", "http://example.com"), "http://example.com");
        assert_eq!(build_link("url", "HTTPS://example.com"), "HTTPS://example.com");
        assert_eq!(build_link("url", ""), "");
        assert_eq!(build_link("avatar", "ipfs.io/x.png"), "https://ipfs.io/x.png");
    }
}
