//! Page directory names.
//!
//! A page directory may carry a numeric sort prefix: `1-blog`, `20-about`.
//! The prefix orders siblings; the rest is the page's uid.

use std::sync::LazyLock;

use regex::Regex;

static SORT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(.+)$").expect("Invalid sort prefix regex"));

/// A parsed page directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dirname<'a> {
    /// Sort number, if the name had one.
    pub num: Option<u32>,
    /// The name without its sort prefix.
    pub uid: &'a str,
}

/// Split a directory name into its sort number and uid.
///
/// # Examples
///
/// ```
/// use warden_content::dirname::parse_dirname;
///
/// let d = parse_dirname("1-blog");
/// assert_eq!(d.num, Some(1));
/// assert_eq!(d.uid, "blog");
///
/// let d = parse_dirname("error");
/// assert_eq!(d.num, None);
/// assert_eq!(d.uid, "error");
/// ```
pub fn parse_dirname(name: &str) -> Dirname<'_> {
    if let Some(caps) = SORT_PREFIX.captures(name) {
        if let (Some(num), Some(uid)) = (caps.get(1), caps.get(2)) {
            if let Ok(num) = num.as_str().parse::<u32>() {
                return Dirname {
                    num: Some(num),
                    uid: uid.as_str(),
                };
            }
        }
    }
    Dirname {
        num: None,
        uid: name,
    }
}
