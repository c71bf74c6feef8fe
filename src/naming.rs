//! Naming conventions shared by the resource loader and the assembler.

/// Naive English pluralization by ordered suffix rules.
///
/// Irregular nouns are not handled: `quiz` becomes `quizes`.
pub fn pluralize(word: &str) -> String {
    let mut chars = word.chars().rev();
    let last = chars.next();
    let before_last = chars.next();

    if last == Some('y') {
        if let Some(prev) = before_last {
            if !is_vowel(prev) {
                return format!("{}ies", &word[..word.len() - 1]);
            }
        }
    }
    if let Some(stem) = word.strip_suffix("fe") {
        return format!("{stem}ves");
    }
    if let Some(stem) = word.strip_suffix('f') {
        return format!("{stem}ves");
    }
    if let Some(stem) = word.strip_suffix('z') {
        return format!("{stem}zes");
    }
    if word.ends_with('s') || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh") {
        return format!("{word}es");
    }
    format!("{word}s")
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Uppercases the first character.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts a snake_case resource name into the PascalCase schema name.
pub fn schema_name(resource: &str) -> String {
    resource
        .split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect()
}
