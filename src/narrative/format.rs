/// Format a share in `[0, 1]` as a percentage with one decimal; a trailing `.0` is dropped.
///
/// `0.6` gives `"60"`, `0.12345` gives `"12.3"`.
pub fn format_percent(share: f64) -> String {
    let percent = (share * 1000.0).round() / 10.0;
    let text = format!("{percent:.1}");
    match text.strip_suffix(".0") {
        Some(whole) if whole == "-0" => "0".to_owned(),
        Some(whole) => whole.to_owned(),
        None => text,
    }
}

/// Join items as English prose: `A`, `A and B`, `A, B, and C`.
pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_owned(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let head = init.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ");
            format!("{head}, and {}", last.as_ref())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages() {
        assert_eq!(format_percent(0.6), "60");
        assert_eq!(format_percent(0.4), "40");
        assert_eq!(format_percent(0.12345), "12.3");
        assert_eq!(format_percent(0.99999), "100");
        assert_eq!(format_percent(0.0), "0");
        assert_eq!(format_percent(1.0 / 3.0), "33.3");
    }

    #[test]
    fn lists() {
        assert_eq!(join_list::<&str>(&[]), "");
        assert_eq!(join_list(&["A"]), "A");
        assert_eq!(join_list(&["A", "B"]), "A and B");
        assert_eq!(join_list(&["A", "B", "C"]), "A, B, and C");
        assert_eq!(join_list(&["A", "B", "C", "D"]), "A, B, C, and D");
    }
}
