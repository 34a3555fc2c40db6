//! Asset name normalization and slug derivation

use super::extract::MissReason;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Export-tool index prefixes such as `imgi_004_`, `004_`, `12-` or `7. `.
static INDEX_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:img[a-z]*[_-])?\d+[_\-.\s]+").expect("valid regex")
});

/// Deterministic slug: accents folded, lowercase, every run of
/// non-alphanumeric characters collapsed into one hyphen, hyphens trimmed.
pub fn slugify(input: &str) -> String {
    let folded: String = input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_hyphen = false;
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Normalize an asset filename into a lookup key.
///
/// Fails with [`MissReason::UnsupportedExtension`] when the extension is
/// missing or not in `extensions` (compared case-insensitively), and with
/// [`MissReason::UnknownSubject`] when nothing sluggable is left once the
/// extension and any index prefix are stripped.
pub fn normalize_asset_name(file_name: &str, extensions: &[String]) -> Result<String, MissReason> {
    let lowered = file_name.trim().to_lowercase();
    let (stem, ext) = lowered
        .rsplit_once('.')
        .ok_or(MissReason::UnsupportedExtension)?;
    if !extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)) {
        return Err(MissReason::UnsupportedExtension);
    }

    let without_prefix = INDEX_PREFIX_RE.replace(stem, "");
    let slug = slugify(&without_prefix);
    if slug.is_empty() {
        Err(MissReason::UnknownSubject)
    } else {
        Ok(slug)
    }
}
