//! `Accept-Language` negotiation.

use super::LanguageTag;

/// One language range from an `Accept-Language` header.
#[derive(Debug, Clone, PartialEq)]
pub enum LanguageRange {
    Any,
    Tag(LanguageTag),
}

/// Parse an `Accept-Language` value into ranges, best first.
///
/// Malformed entries and `q=0` are dropped; equal weights keep header order.
pub fn parse_accept_language(header: &str) -> Vec<LanguageRange> {
    let mut weighted: Vec<(LanguageRange, f32)> = header
        .split(',')
        .filter_map(|item| {
            let mut parts = item.split(';');
            let range = parts.next()?.trim();
            let mut q = 1.0;
            for param in parts {
                let (key, value) = param.split_once('=')?;
                if key.trim().eq_ignore_ascii_case("q") {
                    q = value.trim().parse::<f32>().ok()?;
                }
            }
            if !(q > 0.0 && q <= 1.0) {
                return None;
            }

            let range = match range {
                "*" => LanguageRange::Any,
                tag => LanguageRange::Tag(LanguageTag::parse(tag).ok()?),
            };
            Some((range, q))
        })
        .collect();

    weighted.sort_by(|a, b| b.1.total_cmp(&a.1));
    weighted.into_iter().map(|(range, _)| range).collect()
}

/// Pick the option that best serves `accept`.
///
/// The fallback, when available, is moved to the front of the options so it
/// wins whenever the header does not decide. Each requested range, best
/// first, matches `*` to the first option, otherwise the range is truncated
/// one subtag at a time (`zh-Hant-HK`, `zh-Hant`, `zh`) and the first option
/// equal to or extending a prefix wins. With no match the first option is
/// returned; with no options there is no result.
pub fn negotiate(
    options: &[LanguageTag],
    fallback: &LanguageTag,
    accept: &str,
) -> Option<LanguageTag> {
    let mut ordered: Vec<&LanguageTag> = Vec::with_capacity(options.len());
    ordered.extend(options.iter().filter(|tag| *tag == fallback));
    ordered.extend(options.iter().filter(|tag| *tag != fallback));
    let first = *ordered.first()?;

    for range in parse_accept_language(accept) {
        let found = match &range {
            LanguageRange::Any => Some(first),
            LanguageRange::Tag(wanted) => truncations(wanted.as_str()).find_map(|prefix| {
                ordered
                    .iter()
                    .copied()
                    .find(|tag| extends(tag.as_str(), prefix))
            }),
        };
        if let Some(tag) = found {
            return Some(tag.clone());
        }
    }
    Some(first.clone())
}

/// `tag` itself, then each shorter prefix down to the primary language.
/// A singleton left at the end of a prefix is dropped with it.
fn truncations(tag: &str) -> impl Iterator<Item = &str> {
    let mut next = Some(tag);
    std::iter::from_fn(move || {
        let current = next?;
        next = current.rfind('-').map(|cut| {
            let shorter = &current[..cut];
            match shorter.rfind('-') {
                Some(at) if shorter.len() - at == 2 => &shorter[..at],
                _ => shorter,
            }
        });
        Some(current)
    })
}

/// Whether `tag` is `prefix` or starts with `prefix-`.
fn extends(tag: &str, prefix: &str) -> bool {
    tag.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<LanguageTag> {
        names.iter().map(|n| LanguageTag::parse(n).unwrap()).collect()
    }

    fn tag(name: &str) -> LanguageTag {
        LanguageTag::parse(name).unwrap()
    }

    #[test]
    fn test_fallback_wins_unmatched_header() {
        let options = tags(&["en-US", "nl-NL"]);
        let fallback = tag("nl-NL");
        assert_eq!(negotiate(&options, &fallback, "fr").unwrap(), tag("nl-NL"));
        assert_eq!(negotiate(&options, &fallback, "").unwrap(), tag("nl-NL"));
        assert_eq!(negotiate(&options, &fallback, ";;,garbage_").unwrap(), tag("nl-NL"));
    }

    #[test]
    fn test_exact_match_beats_fallback() {
        let options = tags(&["en-US", "nl-NL"]);
        let fallback = tag("nl-NL");
        assert_eq!(negotiate(&options, &fallback, "en-US").unwrap(), tag("en-US"));
        assert_eq!(negotiate(&options, &fallback, "en-us").unwrap(), tag("en-US"));
    }

    #[test]
    fn test_primary_language_match() {
        let options = tags(&["en-US", "nl-NL"]);
        let fallback = tag("en-US");
        assert_eq!(negotiate(&options, &fallback, "nl").unwrap(), tag("nl-NL"));
        assert_eq!(negotiate(&options, &fallback, "nl-BE").unwrap(), tag("nl-NL"));
    }

    #[test]
    fn test_closest_prefix_match() {
        let options = tags(&["zh-Hans-CN", "zh-Hant-TW"]);
        let fallback = tag("zh-Hans-CN");
        assert_eq!(
            negotiate(&options, &fallback, "zh-Hant-HK").unwrap(),
            tag("zh-Hant-TW")
        );
        assert_eq!(negotiate(&options, &fallback, "zh").unwrap(), tag("zh-Hans-CN"));
    }

    #[test]
    fn test_truncations() {
        assert_eq!(
            truncations("zh-Hant-HK").collect::<Vec<_>>(),
            vec!["zh-Hant-HK", "zh-Hant", "zh"]
        );
        assert_eq!(
            truncations("en-US-x-twain").collect::<Vec<_>>(),
            vec!["en-US-x-twain", "en-US", "en"]
        );
        assert_eq!(truncations("nl").collect::<Vec<_>>(), vec!["nl"]);
        assert!(extends("nl-NL", "nl"));
        assert!(!extends("nld", "nl"));
    }

    #[test]
    fn test_quality_order() {
        let options = tags(&["de", "en-US", "nl-NL"]);
        let fallback = tag("de");
        assert_eq!(
            negotiate(&options, &fallback, "fr;q=0.9, nl-NL;q=0.5, en;q=0.8").unwrap(),
            tag("en-US")
        );
        assert_eq!(
            negotiate(&options, &fallback, "en;q=0, nl").unwrap(),
            tag("nl-NL")
        );
        assert_eq!(negotiate(&options, &fallback, "*").unwrap(), tag("de"));
    }

    #[test]
    fn test_fallback_not_available() {
        let options = tags(&["en-US", "nl-NL"]);
        assert_eq!(negotiate(&options, &tag("de"), "fr").unwrap(), tag("en-US"));
    }

    #[test]
    fn test_no_options() {
        assert!(negotiate(&[], &tag("nl-NL"), "nl-NL").is_none());
    }

    #[test]
    fn test_parse_accept_language() {
        assert_eq!(
            parse_accept_language("nl-NL,nl;q=0.9,en-US;q=0.8,*;q=0.1"),
            vec![
                LanguageRange::Tag(tag("nl-NL")),
                LanguageRange::Tag(tag("nl")),
                LanguageRange::Tag(tag("en-US")),
                LanguageRange::Any,
            ]
        );
        assert_eq!(
            parse_accept_language("en;q=abc, de;q=2, fr"),
            vec![LanguageRange::Tag(tag("fr"))]
        );
    }
}
