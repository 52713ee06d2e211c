//! Text folding shared by header mapping and question matching.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase the text and strip diacritics.
///
/// Input is decomposed first, so precomposed (`"í"`) and combining
/// (`"i\u{301}"`) accents fold the same way: `"¿Cuántas CESANTÍAS?"` becomes
/// `"¿cuantas cesantias?"`.
pub fn fold_text(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Fold the text and collapse every run of non-alphanumeric characters into `_`.
///
/// Used for column headers: `" Valor Cesantías ($)"` becomes `"valor_cesantias"`.
pub fn snake_key(text: &str) -> String {
    let folded = fold_text(text.trim());
    let mut key = String::with_capacity(folded.len());
    let mut pending_sep = false;

    for ch in folded.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !key.is_empty() {
                key.push('_');
            }
            pending_sep = false;
            key.push(ch);
        } else {
            pending_sep = true;
        }
    }

    key
}
