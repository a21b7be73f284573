use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Path and query run until the first whitespace character.
regex!(LINK_REGEX, r"https?://(?:on\.soundcloud\.com|soundcloud\.com)/\S+");
regex!(SHORT_LINK_REGEX, r"^https?://on\.soundcloud\.com/");
