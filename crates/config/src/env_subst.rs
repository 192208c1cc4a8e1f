/// Expand `${ENV_VAR}` placeholders in raw config text.
///
/// Placeholders naming unset variables are kept verbatim so the parse error
/// (or the missing-value check) points at the right field.
pub fn substitute_env(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

/// Placeholder expansion with an injectable lookup, for tests.
fn expand_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    },
                }
                rest = &after[end + 1..];
            },
            _ => {
                // Unterminated or empty: copy the marker and keep scanning.
                out.push_str("${");
                rest = after;
            },
        }
    }

    out.push_str(rest);
    out
}
