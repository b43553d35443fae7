//! # Error Suggestions
//!
//! Helper functions for CLI-facing error messages with hints. Errors should
//! tell users what went wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Unknown project: {}", name);
//!
//! // Use:
//! return Err(suggestions::unknown_project(name, &known_names));
//! ```

/// Generate an error for when no catalog loading mode was requested.
///
/// Includes hints about the two loading flags.
pub fn no_catalog() -> anyhow::Error {
    anyhow::anyhow!(
        "No project catalog to load\n\n\
         hint: Use --source-root <DIR> to scan a local source tree\n\
         hint: Use --index-root <DIR> to import a prebuilt index\n\
         hint: Set DISTRO_BUILD_SOURCE or DISTRO_BUILD_INDEX environment variables"
    )
}

/// Generate an error for when both loading modes were requested at once.
pub fn both_catalog_roots() -> anyhow::Error {
    anyhow::anyhow!(
        "--source-root and --index-root are mutually exclusive\n\n\
         hint: Pick exactly one loading mode per invocation"
    )
}

/// Generate an error for an unknown project name.
///
/// Includes a "did you mean" suggestion when a close match exists.
pub fn unknown_project(name: &str, known: &[String]) -> anyhow::Error {
    let did_you_mean = find_similar(name, known)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Unknown project: {name}{did_you_mean}\n\n\
         hint: Run 'distro-build projects' to list the catalog\n\
         hint: Full names are spelled <repository>/<project>"
    )
}

/// Generate an error for an unknown repository name.
pub fn unknown_repository(name: &str, known: &[String]) -> anyhow::Error {
    let did_you_mean = find_similar(name, known)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Unknown repository: {name}{did_you_mean}\n\n\
         hint: Run 'distro-build repos' to list known repositories"
    )
}

/// Generate an error for an invalid glob pattern.
///
/// Includes hints about glob syntax.
pub fn invalid_glob(pattern: &str, error: &glob::PatternError) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid glob pattern: {pattern}\n\
         error: {error}\n\n\
         hint: Use * for a single path component, ** for recursive matching\n\
         hint: Use [abc] for character classes, [!abc] to negate"
    )
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &'a [String]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate.as_str(), distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein edit distance, rolling two rows.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, &from) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &to) in b.iter().enumerate() {
            let cost = usize::from(from != to);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
