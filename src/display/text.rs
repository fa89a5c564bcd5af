/// Removes every `<...>` tag. An unterminated `<` swallows the rest of the
/// input, matching how browsers drop a dangling tag.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '<' {
            out.push(ch);
            continue;
        }
        for c in chars.by_ref() {
            if c == '>' {
                break;
            }
        }
    }
    out
}

/// Tag-free description, or `None` when nothing readable is left.
pub fn sanitize_description(raw: Option<&str>) -> Option<String> {
    let stripped = strip_tags(raw?);
    if stripped.trim().is_empty() {
        None
    } else {
        Some(stripped)
    }
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_inline_markup() {
        assert_eq!(
            strip_tags("<i>A story</i> about <b>titans</b>."),
            "A story about titans."
        );
        assert_eq!(strip_tags("line<br>\nnext"), "line\nnext");
        assert_eq!(strip_tags("no tags"), "no tags");
        assert_eq!(strip_tags("cut <i unterminated"), "cut ");
    }

    #[test]
    fn empty_descriptions_fall_through() {
        assert_eq!(sanitize_description(None), None);
        assert_eq!(sanitize_description(Some("<br><br>")), None);
        assert_eq!(
            sanitize_description(Some("<p>Plot</p>")).as_deref(),
            Some("Plot")
        );
    }

    #[test]
    fn groups_digits() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-45000), "-45,000");
    }
}
