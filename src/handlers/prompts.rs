use serde_json::{json, Value};

use crate::protocol::{PromptMessage, PromptResult, TextContent};

pub const DOCKER_HELP: &str = "docker_help";

const DESCRIPTION: &str = "Overview of what this server can do with Docker";

const HELP_TEXT: &str = "\
I can help you manage Docker containers and images. Here are some things you can ask me to do:

- List running containers
- Show all Docker images
- Run a new container
- Stop or remove containers
- View container logs
- Pull Docker images

What would you like to do with Docker today?";

pub fn list() -> Value {
    json!({
        "prompts": [
            {
                "name": DOCKER_HELP,
                "description": DESCRIPTION,
                "arguments": []
            }
        ]
    })
}

/// The prompt body, or `None` for an unknown prompt name.
pub fn get(name: &str) -> Option<PromptResult> {
    (name == DOCKER_HELP).then(|| PromptResult {
        description: DESCRIPTION.to_string(),
        messages: vec![PromptMessage {
            role: "user".to_string(),
            content: TextContent::new(HELP_TEXT),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_prompt_is_static() {
        let prompt = get(DOCKER_HELP).unwrap();
        assert_eq!(prompt.messages.len(), 1);
        assert!(prompt.messages[0].content.text.starts_with("I can help you manage Docker"));
        assert!(get("unknown").is_none());
    }
}
