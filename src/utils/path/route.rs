//! URL path utilities.
//!
//! Request paths are cleaned before routing: percent-decoded, query string
//! dropped, empty and `.` segments removed, `..` resolved (never above the
//! root), and a trailing slash appended. Paths below an `assets` directory
//! keep their exact form so file names are not rewritten.

use percent_encoding::percent_decode_str;

/// Decode a raw request URL into a path without the query string.
pub fn decode_url(url: &str) -> String {
    let path = url.split(&['?', '#'][..]).next().unwrap_or(url);
    percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_else(|_| path.to_string())
}

/// Split a decoded path into clean segments.
///
/// # Examples
/// ```ignore
/// assert_eq!(segments("/a//b/./c/"), vec!["a", "b", "c"]);
/// assert_eq!(segments("/a/../b"), vec!["b"]);
/// ```
pub fn segments(path: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Join segments into an absolute directory URL (`/a/b/`).
pub fn to_dir_url<S: AsRef<str>>(segments: &[S]) -> String {
    let mut url = String::from("/");
    for segment in segments {
        url.push_str(segment.as_ref());
        url.push('/');
    }
    url
}

/// Clean a decoded request path the way the router expects it.
///
/// Returns the cleaned path; asset paths are left untouched.
pub fn clean_path(path: &str) -> String {
    if path.contains("/assets/") {
        return path.to_string();
    }
    to_dir_url(&segments(path))
}
