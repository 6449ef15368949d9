//! Flatten a provider result into a single reply string.

use crate::gateway::types::{GenerateResult, Part};

/// Reply used when the provider returned neither parts nor candidates.
pub const NO_RESPONSE_REPLY: &str = "No response from Artlink Bot.";

/// Reply used when the provider text is empty or whitespace-only.
pub const GENERATION_FAILED_REPLY: &str = "Artlink Bot could not generate a response.";

/// Normalize a provider result into the text sent back to the user.
///
/// Parts are concatenated with no separator. Candidates are each concatenated
/// the same way and then joined with a single space.
#[must_use]
pub fn normalize_reply(result: &GenerateResult) -> String {
    let reply = match result {
        GenerateResult::Parts(parts) => concat_parts(parts),
        GenerateResult::Candidates(candidates) => candidates
            .iter()
            .map(|c| concat_parts(c.parts()))
            .collect::<Vec<_>>()
            .join(" "),
        GenerateResult::Empty => NO_RESPONSE_REPLY.to_string(),
    };

    if reply.trim().is_empty() {
        GENERATION_FAILED_REPLY.to_string()
    } else {
        reply
    }
}

fn concat_parts(parts: &[Part]) -> String {
    parts.iter().map(Part::as_text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::types::Candidate;

    #[test]
    fn test_parts_concatenate_without_separator() {
        let result = GenerateResult::Parts(vec![Part::text("Hel"), Part::text("lo")]);
        assert_eq!(normalize_reply(&result), "Hello");
    }

    #[test]
    fn test_candidates_join_with_single_space() {
        let result = GenerateResult::Candidates(vec![
            Candidate::from_texts(["Hello"]),
            Candidate::from_texts([" there"]),
        ]);
        assert_eq!(normalize_reply(&result), "Hello  there");
    }

    #[test]
    fn test_candidate_parts_concatenate() {
        let result = GenerateResult::Candidates(vec![Candidate::from_texts(["a", "b", "c"])]);
        assert_eq!(normalize_reply(&result), "abc");
    }

    #[test]
    fn test_empty_result_uses_no_response_reply() {
        assert_eq!(normalize_reply(&GenerateResult::Empty), NO_RESPONSE_REPLY);
    }

    #[test]
    fn test_whitespace_text_uses_failure_reply() {
        let blank = GenerateResult::Parts(vec![Part::text("  \n\t")]);
        assert_eq!(normalize_reply(&blank), GENERATION_FAILED_REPLY);

        let empty = GenerateResult::Parts(Vec::new());
        assert_eq!(normalize_reply(&empty), GENERATION_FAILED_REPLY);
    }

    #[test]
    fn test_textless_parts_are_skipped() {
        let result = GenerateResult::Parts(vec![Part { text: None }, Part::text("ok")]);
        assert_eq!(normalize_reply(&result), "ok");
    }

    #[test]
    fn test_blocked_candidate_counts_as_empty() {
        let result = GenerateResult::Candidates(vec![Candidate::default()]);
        assert_eq!(normalize_reply(&result), GENERATION_FAILED_REPLY);
    }
}
