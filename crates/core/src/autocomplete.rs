pub const MAX_SUGGESTIONS: usize = 10;

/// Case-insensitive substring match of `query` against `vocabulary`, skipping
/// skills in `chosen`. Keeps vocabulary order and stops at `MAX_SUGGESTIONS`.
pub fn filter_skills(query: &str, vocabulary: &[String], chosen: &[String]) -> Vec<String> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    vocabulary
        .iter()
        .filter(|skill| skill.to_lowercase().contains(&needle))
        .filter(|skill| !chosen.contains(skill))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn matches_substrings_ignoring_case() {
        let vocabulary = skills(&["Python", "Jython Scripting", "SQL", "Data Analysis"]);
        assert_eq!(
            filter_skills("YTH", &vocabulary, &[]),
            skills(&["Python", "Jython Scripting"])
        );
    }

    #[test]
    fn blank_query_yields_nothing() {
        let vocabulary = skills(&["Python", "SQL"]);
        assert!(filter_skills("", &vocabulary, &[]).is_empty());
        assert!(filter_skills("   \t", &vocabulary, &[]).is_empty());
    }

    #[test]
    fn chosen_skills_are_excluded() {
        let vocabulary = skills(&["Python", "PyTorch", "SQL"]);
        let chosen = skills(&["Python"]);
        assert_eq!(filter_skills("py", &vocabulary, &chosen), skills(&["PyTorch"]));
    }

    #[test]
    fn caps_results_in_vocabulary_order() {
        let vocabulary: Vec<String> = (0..25).map(|index| format!("Skill {index:02}")).collect();
        let matches = filter_skills("skill", &vocabulary, &[]);
        assert_eq!(matches.len(), MAX_SUGGESTIONS);
        assert_eq!(matches.first().map(String::as_str), Some("Skill 00"));
        assert_eq!(matches.last().map(String::as_str), Some("Skill 09"));
    }

    #[test]
    fn exclusion_applies_before_the_cap() {
        let vocabulary: Vec<String> = (0..12).map(|index| format!("Tool {index:02}")).collect();
        let chosen = skills(&["Tool 00", "Tool 01"]);
        let matches = filter_skills("tool", &vocabulary, &chosen);
        assert_eq!(matches.len(), MAX_SUGGESTIONS);
        assert!(matches.iter().all(|skill| !chosen.contains(skill)));
        assert_eq!(matches.last().map(String::as_str), Some("Tool 11"));
    }
}
