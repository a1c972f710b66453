/// Generational suffixes removed by [`strip_suffixes`]. Dotted forms go first
/// so "jr." does not leave a stray period behind.
const NAME_SUFFIXES: [&str; 6] = [" jr.", " sr.", " jr", " sr", " iii", " ii"];

/// Join key shared by the local corpus and the external rosters.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Removes every suffix occurrence from an already-normalized key.
pub fn strip_suffixes(key: &str) -> String {
    let mut stripped = key.to_string();
    for suffix in NAME_SUFFIXES {
        stripped = stripped.replace(suffix, "");
    }
    stripped.trim().to_string()
}

pub fn join_name(first: &str, last: &str) -> String {
    format!("{} {}", first.trim(), last.trim()).trim().to_string()
}
