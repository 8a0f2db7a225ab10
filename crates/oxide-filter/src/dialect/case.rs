//! Identifier casing.

/// Converts a column name to `snake_case`.
///
/// An underscore goes between a lower-case letter or digit and a following
/// capital, and before the last capital of an acronym that runs into a
/// lower-case word (`HTTPServer` becomes `http_server`). Runs of other
/// characters collapse into one underscore and are trimmed at both ends.
/// Tokens without lower-case letters (`ID`, `ABCD`) are only lower-cased.
/// Dot-qualified names are converted segment by segment.
#[must_use]
pub fn to_snake_case(ident: &str) -> String {
    ident
        .split('.')
        .map(segment_to_snake_case)
        .collect::<Vec<_>>()
        .join(".")
}

fn segment_to_snake_case(segment: &str) -> String {
    let chars: Vec<char> = segment.chars().collect();
    let mixed_case = chars.iter().any(|c| c.is_lowercase());
    let mut out = String::with_capacity(segment.len() + 4);
    let mut separate = false;

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            separate = true;
            continue;
        }
        if mixed_case && c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                separate = true;
            }
        }
        if separate && !out.is_empty() {
            out.push('_');
        }
        separate = false;
        out.extend(c.to_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_and_pascal_case() {
        assert_eq!(to_snake_case("UserName"), "user_name");
        assert_eq!(to_snake_case("UserId"), "user_id");
        assert_eq!(to_snake_case("firstName"), "first_name");
        assert_eq!(to_snake_case("MyID"), "my_id");
    }

    #[test]
    fn test_all_upper_is_lowercased() {
        assert_eq!(to_snake_case("ID"), "id");
        assert_eq!(to_snake_case("ABCD"), "abcd");
        assert_eq!(to_snake_case("USER_ID"), "user_id");
    }

    #[test]
    fn test_acronym_boundary() {
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("parseXMLFile"), "parse_xml_file");
    }

    #[test]
    fn test_digits() {
        assert_eq!(to_snake_case("address2Line"), "address2_line");
        assert_eq!(to_snake_case("user2fa"), "user2fa");
    }

    #[test]
    fn test_separators_collapse_and_trim() {
        assert_eq!(to_snake_case("first_name"), "first_name");
        assert_eq!(to_snake_case("__a__b__"), "a_b");
        assert_eq!(to_snake_case("_Private"), "private");
    }

    #[test]
    fn test_qualified_names() {
        assert_eq!(to_snake_case("Users.FirstName"), "users.first_name");
    }

    #[test]
    fn test_idempotent() {
        for name in ["UserName", "HTTPServer", "a_b", "ID", "users.birthDay"] {
            let once = to_snake_case(name);
            assert_eq!(to_snake_case(&once), once);
        }
    }
}
