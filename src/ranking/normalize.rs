//! Ingredient name canonicalization.

/// Normalize an ingredient name into a matchable token.
///
/// Lowercases, trims, then deletes every `"es"` and then every `"s"`
/// anywhere in the string. This is substring deletion, not suffix
/// stripping, so names with an inner "s" are mangled
/// (`"sausage"` becomes `"auage"`). Trimming happens before deletion,
/// so `"s a"` comes out as `" a"`.
///
/// TODO: switch to suffix-only plural stripping (`-es`, `-s`) and update
/// the expected outputs in the tests below.
pub fn normalize_ingredient(name: &str) -> String {
    name.to_lowercase().trim().replace("es", "").replace('s', "")
}

/// Split a comma-separated ingredient query and normalize each token.
///
/// Empty tokens are kept so the result lines up with the raw input.
pub fn tokenize_ingredients(user_ingredients: &str) -> Vec<String> {
    user_ingredients.split(',').map(normalize_ingredient).collect()
}
