//! Property-based tests for the capability text form.
//!
//! These tests use proptest to generate random inputs and verify that
//! parse/display round-trips and the equality rules hold for all inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::capability::{CapabilityList, CapabilitySpec};
    use proptest::prelude::*;

    /// Capability-name shape: no `:`/`|`/whitespace, like `build.java-jar`
    /// or `myx/ae3.base`.
    const NAME: &str = "[a-z][a-z0-9./_-]{0,14}";
    /// Tag shape, like `jars/util.jar` or `recommended`.
    const TAG: &str = "[a-z0-9][a-z0-9./_-]{0,9}";

    fn spec_text(name: &str, tags: &[String]) -> String {
        if tags.is_empty() {
            name.to_string()
        } else {
            format!("{}:{}", name, tags.join("|"))
        }
    }

    // ============================================================================
    // CapabilitySpec property tests
    // ============================================================================

    proptest! {
        /// Property: display of a parsed spec parses back to an equal spec
        #[test]
        fn parse_display_round_trips(
            name in NAME,
            tags in proptest::collection::vec(TAG, 0..4),
        ) {
            let first = CapabilitySpec::parse(&spec_text(&name, &tags));
            let second = CapabilitySpec::parse(&first.to_string());
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.to_string(), second.to_string());
        }

        /// Property: parsing is deterministic
        #[test]
        fn parse_is_deterministic(input in "[ -~]{0,40}") {
            let first = CapabilitySpec::parse(&input);
            let second = CapabilitySpec::parse(&input);
            prop_assert_eq!(first, second);
        }

        /// Property: input without a colon always yields a tagless spec
        #[test]
        fn name_only_input_has_no_tags(name in NAME) {
            let spec = CapabilitySpec::parse(&name);
            prop_assert!(spec.tags().is_empty());
            prop_assert_eq!(spec.name(), name.as_str());
        }

        /// Property: parsed tags never contain duplicates, however noisy the
        /// input tag segment is
        #[test]
        fn parsed_tags_are_unique(
            name in NAME,
            tags in proptest::collection::vec(TAG, 0..6),
        ) {
            // duplicate every tag to force the de-dup path
            let mut doubled = tags.clone();
            doubled.extend(tags.iter().cloned());
            let spec = CapabilitySpec::parse(&spec_text(&name, &doubled));
            for (i, tag) in spec.tags().iter().enumerate() {
                for other in &spec.tags()[i + 1..] {
                    prop_assert_ne!(tag, other, "duplicate tag '{}' survived", tag);
                }
            }
        }

        /// Property: equality ignores tag order
        #[test]
        fn equality_ignores_tag_order(
            name in NAME,
            tags in proptest::collection::vec(TAG, 1..5),
        ) {
            let mut unique: Vec<String> = Vec::new();
            for tag in tags {
                if !unique.contains(&tag) {
                    unique.push(tag);
                }
            }
            let forward = CapabilitySpec::parse(&spec_text(&name, &unique));
            unique.reverse();
            let backward = CapabilitySpec::parse(&spec_text(&name, &unique));
            prop_assert_eq!(forward, backward);
        }
    }

    // ============================================================================
    // CapabilityList property tests
    // ============================================================================

    proptest! {
        /// Property: the display form of a list reparses to an equivalent
        /// list (same length, every spec contained)
        #[test]
        fn list_display_reparses_to_equivalent_list(
            names in proptest::collection::vec(NAME, 0..6),
            tags in proptest::collection::vec(TAG, 0..6),
        ) {
            let mut list = CapabilityList::new();
            for (i, name) in names.iter().enumerate() {
                let spec_tags: Vec<String> = tags.iter().skip(i % 2).cloned().collect();
                list.add(CapabilitySpec::parse(&spec_text(name, &spec_tags)));
            }

            let mut reparsed = CapabilityList::new();
            reparsed.extend_parsed(&list.to_string());

            prop_assert_eq!(reparsed.len(), list.len());
            for spec in &list {
                prop_assert!(reparsed.contains(spec), "lost spec '{}'", spec);
            }
        }

        /// Property: names stay unique however often they are re-added
        #[test]
        fn list_names_stay_unique(
            names in proptest::collection::vec(NAME, 0..8),
        ) {
            let mut list = CapabilityList::new();
            for name in &names {
                list.add(CapabilitySpec::parse(name));
                list.add(CapabilitySpec::parse(&format!("{}:extra", name)));
            }
            let mut seen: Vec<&str> = Vec::new();
            for spec in &list {
                prop_assert!(!seen.contains(&spec.name()), "duplicate name '{}'", spec.name());
                seen.push(spec.name());
            }
        }
    }
}
