//! Outbound prompt assembly.

use crate::gateway::Content;
use crate::session::{Speaker, Turn};

/// Persona and behaviour instructions sent ahead of every conversation.
pub const ARTLINK_PREAMBLE: &str = "You are ARTLINK, an AI chatbot. Your job is to assist users by \
answering their questions, providing information, and engaging in helpful conversation. Respond \
in a friendly, clear, and informative manner, using natural language. Understand the user's \
message and intent. Generate relevant and accurate responses. Maintain a conversational and \
polite tone. Help users with their queries, whether they are about art, general knowledge, or \
other topics.";

/// Build the provider conversation: the preamble as a leading user entry,
/// then every turn in order.
#[must_use]
pub fn build_contents(preamble: &str, history: &[Turn]) -> Vec<Content> {
    let mut contents = Vec::with_capacity(history.len() + 1);
    contents.push(Content::new(Speaker::User, preamble));
    contents.extend(history.iter().map(Content::from));
    contents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_leads_and_roles_map() {
        let history = vec![Turn::user("hi"), Turn::model("hello"), Turn::user("again")];
        let contents = build_contents("be nice", &history);

        assert_eq!(contents.len(), 4);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[0].parts[0].as_text(), "be nice");

        let roles: Vec<&str> = contents[1..].iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(contents[3].parts[0].as_text(), "again");
    }

    #[test]
    fn test_empty_history_sends_only_preamble() {
        let contents = build_contents(ARTLINK_PREAMBLE, &[]);
        assert_eq!(contents.len(), 1);
        assert!(contents[0].parts[0].as_text().starts_with("You are ARTLINK"));
    }
}
