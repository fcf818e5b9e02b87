//! Prompt construction.

/// Built-in instruction template. The biography follows it directly.
pub const DEFAULT_INSTRUCTIONS: &str = "You are Casper, an AI assistant answering questions on your owner's behalf. \
Random users will ask you questions.
If the user asks about your owner, tell them mainly about their professional details.
Please only answer questions related to your owner and Data Science.
When providing any links, format them as clickable buttons.

Details about your owner:
";

/// `instructions + biography + "\nUser: " + message`.
///
/// Only the latest user message is included; earlier turns are not sent.
pub fn build_prompt(instructions: &str, biography: &str, message: &str) -> String {
    let mut prompt =
        String::with_capacity(instructions.len() + biography.len() + message.len() + 7);
    prompt.push_str(instructions);
    prompt.push_str(biography);
    prompt.push_str("\nUser: ");
    prompt.push_str(message);
    prompt
}
