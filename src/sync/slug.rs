// src/sync/slug.rs

//! Slug derivation for unit names.
//!
//! Slugs feed both the node path and the search index, so they must stay
//! ASCII and URL-safe. Derivation runs only while the user has not touched
//! the slug field by hand.

const MAX_SLUG_LEN: usize = 48;

/// Derive a URL-safe slug from a display name: fold common diacritics to
/// ASCII, lowercase, collapse every run of other characters into a single
/// hyphen, and cap the length. An empty result falls back to `"unit"`.
pub fn derive_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars() {
        let ch = fold_diacritic(ch);
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    if slug.is_empty() {
        "unit".to_string()
    } else {
        slug
    }
}

// Covers the Latin-1 range seen in unit names; anything else non-ASCII
// becomes a separator.
fn fold_diacritic(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'a',
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        'ñ' | 'Ñ' => 'n',
        'ý' | 'ÿ' | 'Ý' => 'y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(derive_slug("Biro Umum"), "biro-umum");
        assert_eq!(derive_slug("Bagian Ke#uangan & Aset"), "bagian-ke-uangan-aset");
    }

    #[test]
    fn folds_diacritics() {
        assert_eq!(derive_slug("Séksi Évaluasi"), "seksi-evaluasi");
    }

    #[test]
    fn collapses_runs_and_trims_edges() {
        assert_eq!(derive_slug("  --Sub / Bagian--  "), "sub-bagian");
    }

    #[test]
    fn caps_length_without_trailing_hyphen() {
        let long = "a ".repeat(60);
        let slug = derive_slug(&long);
        assert!(slug.len() <= 48);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn falls_back_for_empty_input() {
        assert_eq!(derive_slug(""), "unit");
        assert_eq!(derive_slug("###"), "unit");
    }
}
