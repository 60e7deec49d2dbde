//! Path and dotted-name utilities for import rewriting.
//!
//! Namespaced type references are rewritten by finding the longest dotted
//! prefix that names a known module, substituting the module's local symbol,
//! and computing a module specifier (a relative path for ECMAScript modules).

/// Strip the extension from the final segment of `path`, if any.
pub fn strip_extension(path: &str) -> &str {
    let basename_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[basename_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..basename_start + dot],
        _ => path,
    }
}

/// The final path segment of `path`.
pub fn basename(path: &str) -> &str {
    path.rfind('/').map_or(path, |i| &path[i + 1..])
}

/// The final path segment of `path` without its extension.
pub fn basename_without_extension(path: &str) -> &str {
    strip_extension(basename(path))
}

/// Compute the module specifier for importing `to` from `from`.
///
/// Both arguments are slash-separated file paths. The result is a relative
/// path from the directory of `from` to `to`, extension stripped, always
/// beginning with `./` or `../`.
pub fn relative_import(from: &str, to: &str) -> String {
    let from_dir: Vec<&str> = match from.rfind('/') {
        Some(i) => from[..i].split('/').collect(),
        None => Vec::new(),
    };
    let to = strip_extension(to);
    let to_parts: Vec<&str> = to.split('/').collect();
    let (to_dir, to_name) = to_parts.split_at(to_parts.len() - 1);

    let common = from_dir
        .iter()
        .zip(to_dir.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut spec = String::new();
    for _ in common..from_dir.len() {
        spec.push_str("../");
    }
    if spec.is_empty() {
        spec.push_str("./");
    }
    for part in &to_dir[common..] {
        spec.push_str(part);
        spec.push('/');
    }
    spec.push_str(to_name[0]);
    spec
}

/// Whether `prefix` is a whole-component dotted prefix of `name`.
///
/// `ns.T` is a prefix of `ns.T` and of `ns.T.Inner`, but not of `ns.Type`.
pub fn is_dotted_prefix(prefix: &str, name: &str) -> bool {
    name == prefix
        || (name.starts_with(prefix) && name.as_bytes().get(prefix.len()) == Some(&b'.'))
}

/// Find the longest candidate that is a dotted prefix of `name`.
pub fn longest_dotted_prefix<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    let mut best: Option<&'a str> = None;
    for candidate in candidates {
        if is_dotted_prefix(candidate, name) && best.is_none_or(|b| candidate.len() > b.len()) {
            best = Some(candidate);
        }
    }
    best
}

/// Substitute `replacement` for the leading `prefix` in a dotted `name`.
pub fn replace_prefix(name: &str, prefix: &str, replacement: &str) -> String {
    if name == prefix {
        replacement.to_string()
    } else {
        format!("{}{}", replacement, &name[prefix.len()..])
    }
}
