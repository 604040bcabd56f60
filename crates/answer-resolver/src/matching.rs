//! Pure value-application helpers shared by the engine.

/// Index of the first option that contains the resolved value or is contained
/// by it, case-insensitively.
pub fn pick_option(options: &[String], value: &str) -> Option<usize> {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return None;
    }
    options.iter().position(|option| {
        let option = option.trim().to_lowercase();
        !option.is_empty() && (option.contains(&value) || value.contains(&option))
    })
}

/// Index of the first option with non-empty visible text, skipping the
/// placeholder an unanswered select usually sits on.
pub fn first_non_empty(options: &[String]) -> Option<usize> {
    options
        .iter()
        .position(|option| !option.trim().is_empty())
        // A leading placeholder with real text ("Select an option") still
        // needs to be skipped when a later option exists.
        .map(|index| {
            if index == 0 && options.len() > 1 {
                1
            } else {
                index
            }
        })
}

/// Whether a resolved value means "check the box".
pub fn truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "yes" | "true" | "1")
}

/// Index of the radio whose own label text overlaps the resolved value in
/// either direction.
pub fn pick_radio(labels: &[String], value: &str) -> Option<usize> {
    pick_option(labels, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn pick_option_matches_containment_both_ways() {
        let opts = options(&["Select an option", "Yes, I require sponsorship", "No"]);
        assert_eq!(pick_option(&opts, "Yes"), Some(1));
        assert_eq!(pick_option(&opts, "No"), Some(2));
        assert_eq!(pick_option(&opts, "maybe"), None);
    }

    #[test]
    fn first_non_empty_skips_leading_placeholder() {
        assert_eq!(first_non_empty(&options(&["", "0-1 years", "2+ years"])), Some(1));
        assert_eq!(
            first_non_empty(&options(&["Select an option", "Immediate"])),
            Some(1)
        );
        assert_eq!(first_non_empty(&options(&["only"])), Some(0));
        assert_eq!(first_non_empty(&options(&["", "  "])), None);
    }

    #[test]
    fn truthy_accepts_yes_true_one() {
        assert!(truthy("Yes"));
        assert!(truthy(" TRUE "));
        assert!(truthy("1"));
        assert!(!truthy("No"));
        assert!(!truthy("30 days"));
    }
}
