/// Turns comma separated note fragments into sentences.
///
/// Each fragment is trimmed, capitalized and ends with a period; fragments
/// are joined with a single space.
pub fn format_notes(notes: &str) -> String {
    notes
        .split(',')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| {
            let mut chars = fragment.chars();
            let mut sentence: String = match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            };

            if !sentence.ends_with('.') {
                sentence.push('.');
            }

            sentence
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_notes() {
        assert_eq!(
            format_notes("adds nutty flavor, shake well before use."),
            "Adds nutty flavor. Shake well before use."
        );
        assert_eq!(format_notes(" ,  "), "");
        assert_eq!(format_notes("Already done."), "Already done.");
    }
}
