//! Naming helpers shared by the generator strategies.
//!
//! Entity names arrive in whatever casing the declarative source used
//! (`BlogPost`, `blog_post`, `blog-post`). Every generated path and class
//! name is derived from them through these functions so that two spellings
//! of the same entity always produce the same manifest.

/// Convert a string to snake_case.
///
/// | Input | Output |
/// |-------|--------|
/// | "BlogPost" | "blog_post" |
/// | "blog-post" | "blog_post" |
/// | "HTTPRequest" | "http_request" |
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Convert a string to PascalCase.
///
/// | Input | Output |
/// |-------|--------|
/// | "blog_post" | "BlogPost" |
/// | "HTTPRequest" | "HttpRequest" |
pub fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::new();
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                    out
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Pluralize a snake_case word using the small set of English rules the
/// generated frameworks agree on.
///
/// Only the last segment of a compound word is pluralized
/// (`blog_post` → `blog_posts`).
pub fn pluralize(word: &str) -> String {
    let (head, last) = match word.rfind('_') {
        Some(idx) => (&word[..=idx], &word[idx + 1..]),
        None => ("", word),
    };

    let plural = match last {
        "" => String::new(),
        "person" => "people".to_string(),
        "child" => "children".to_string(),
        "man" => "men".to_string(),
        "woman" => "women".to_string(),
        w if w.ends_with("ss")
            || w.ends_with('x')
            || w.ends_with("ch")
            || w.ends_with("sh")
            || w.ends_with('z') =>
        {
            format!("{w}es")
        }
        w if w.ends_with("us") => format!("{w}es"),
        w if w.ends_with('s') => w.to_string(),
        w if w.ends_with('y') && !ends_with_vowel_y(w) => {
            format!("{}ies", &w[..w.len() - 1])
        }
        w => format!("{w}s"),
    };

    format!("{head}{plural}")
}

/// Table (or collection) name for an entity: snake_case, pluralized.
pub fn table_name(entity: &str) -> String {
    pluralize(&to_snake_case(entity))
}

fn ends_with_vowel_y(word: &str) -> bool {
    let mut rev = word.chars().rev();
    rev.next();
    matches!(rev.next(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}

/// Split a string into lowercase words based on casing and separators.
///
/// 1. `_`, `-`, `.` and whitespace always split
/// 2. camelCase transition (`aB`) splits between `a` and `B`
/// 3. Acronym boundary (`HTTPRequest`) splits between `P` and `R`
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(next) = chars.peek() {
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
