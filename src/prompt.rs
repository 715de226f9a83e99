// src/prompt.rs
// Builds the chat messages for a single rating query.

use serde::Serialize;

use crate::survey::Persona;

/// The statement is wrapped in this sequence so the model can tell survey
/// content apart from instructions, whatever the statement text contains.
pub const STATEMENT_DELIMITER: &str = "####";

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: String) -> Self {
        Self { role: "system".to_string(), content }
    }

    pub fn user(content: String) -> Self {
        Self { role: "user".to_string(), content }
    }
}

/// Constructs the system + user message pair asking one persona to rate one
/// statement. Pure; the caller decides temperature and transport.
pub fn build_rating_messages(statement: &str, persona: &Persona) -> Vec<ChatMessage> {
    let system = format!(
        "Here is the definition of a {name}: {description}\n\
         \n\
         You will be provided with a statement.\n\
         The statement will be delimited with {delim} characters.\n\
         \n\
         On a scale of -100 to +100 how would such a {name} rate this statement?\n\
         Where -100 indicates the least amount of agreement and +100 indicates the most amount of agreement.\n\
         \n\
         I need you to provide two pieces of output:\n\
         1. The rating (a numerical score between -100 and +100 inclusive).\n\
         2. An explanation of why you gave that score in 40 words or less.\n\
         \n\
         Please provide the two outputs in the form of a valid JSON object\n\
         {{\n\
             \"rating\": <numerical_score>,\n\
             \"explanation\": <reason_for_score>\n\
         }}\n\
         \n\
         - The \"rating\" must be a number between -100 and +100 inclusive.\n\
         - The \"explanation\" should be a concise justification for the given rating in 40 words or less.\n\
         Make sure the output is a properly formatted JSON object.",
        name = persona.name,
        description = persona.description,
        delim = STATEMENT_DELIMITER,
    );

    vec![
        ChatMessage::system(system),
        ChatMessage::user(format!(
            "{STATEMENT_DELIMITER}{statement}{STATEMENT_DELIMITER}"
        )),
    ]
}
