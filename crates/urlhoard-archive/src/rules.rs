//! Site-specific shortcode cleaning.
//!
//! The walker hands records over untouched; handlers that collect
//! shortcodes from free text use these rules to normalize them.

/// Narrow interface to a shortener's shortcode conventions.
pub trait ShortcodeRules {
    /// Extract the shortcode from the path of a short URL.
    /// Returns an empty string when the path holds no shortcode.
    fn clean(&self, path: &str) -> String;

    /// Whether a shortcode was chosen by a user rather than generated.
    fn is_vanity(&self, shortcode: &str) -> bool;

    /// Shorter codes first, generated codes before vanity codes.
    fn sort(&self, shortcodes: &mut [String]) {
        shortcodes.sort_by(|a, b| {
            self.is_vanity(a)
                .cmp(&self.is_vanity(b))
                .then(a.len().cmp(&b.len()))
                .then_with(|| a.cmp(b))
        });
    }
}

/// Rules derived from a project's shortcode alphabet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlphabetRules {
    alphabet: String,
}

impl AlphabetRules {
    pub fn new(alphabet: &str) -> Self {
        Self {
            alphabet: alphabet.to_string(),
        }
    }

    pub fn alphabet(&self) -> &str {
        &self.alphabet
    }
}

impl ShortcodeRules for AlphabetRules {
    fn clean(&self, path: &str) -> String {
        clean_path(path).to_string()
    }

    /// An empty alphabet knows no generated codes, so nothing is vanity.
    fn is_vanity(&self, shortcode: &str) -> bool {
        !self.alphabet.is_empty() && shortcode.chars().any(|c| !self.alphabet.contains(c))
    }
}

/// Trailing text that cannot belong to a shortcode: quotes, brackets, `&`,
/// whitespace, NBSP and ZWSP.
const TRAILING_JUNK: &[char] = &['"', ']', ')', '>', '&', '’', '”', ' ', '\u{a0}', '\u{200b}'];

/// Strip the usual debris from a short URL path.
pub fn clean_path(path: &str) -> &str {
    let mut code = path.trim_start_matches('/');
    if is_placeholder(code) {
        return "";
    }
    if let Some(i) = code.find(TRAILING_JUNK) {
        code = &code[..i];
    }
    code = code.trim_end_matches(['.', ';']).trim_end_matches('/');
    for scheme in ["http:/", "https:/"] {
        if let Some(i) = code.find(scheme) {
            code = &code[..i];
        }
    }
    if is_common_file(code) {
        return "";
    }
    code
}

/// `<key>` and `[key]` stand-ins from documentation.
fn is_placeholder(code: &str) -> bool {
    let bytes = code.as_bytes();
    matches!(
        (bytes.first(), bytes.last()),
        (Some(b'<'), Some(b'>')) | (Some(b'['), Some(b']'))
    ) && bytes.len() >= 2
}

fn is_common_file(code: &str) -> bool {
    matches!(code, "" | "favicon.ico" | "robots.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_path_table() {
        let cases = [
            ("/abc123", "abc123"),
            ("abc123", "abc123"),
            ("/<key>", ""),
            ("/[code]", ""),
            ("/<", "<"),
            ("/abc\"", "abc"),
            ("/abc)", "abc"),
            ("/abc&utm_source=x", "abc"),
            ("/abc\u{a0}more", "abc"),
            ("/abc\u{200b}", "abc"),
            ("/abc.", "abc"),
            ("/abc;", "abc"),
            ("/abc/", "abc"),
            ("/abchttp://example.com/", "abc"),
            ("/abchttps://example.com/", "abc"),
            ("/favicon.ico", ""),
            ("/robots.txt", ""),
            ("/", ""),
        ];
        for (path, expected) in cases {
            assert_eq!(clean_path(path), expected, "{path:?}");
        }
    }

    #[test]
    fn vanity_codes_leave_the_alphabet() {
        let rules = AlphabetRules::new("abcdefghijklmnopqrstuvwxyz0123456789");
        assert!(!rules.is_vanity("abc123"));
        assert!(rules.is_vanity("My-Link"));
        assert!(!AlphabetRules::default().is_vanity("My-Link"));
    }

    #[test]
    fn sort_generated_before_vanity() {
        let rules = AlphabetRules::new("abc");
        let mut codes: Vec<String> = ["cab", "Zz", "ab", "b", "aa"]
            .into_iter()
            .map(String::from)
            .collect();
        rules.sort(&mut codes);
        assert_eq!(codes, ["b", "aa", "ab", "cab", "Zz"]);
    }

    #[test]
    fn clean_through_trait() {
        let rules = AlphabetRules::new("abc");
        assert_eq!(rules.clean("//abc/"), "abc");
    }
}
