use crate::{
    llm::ChatMessage,
    prompt::builder::{build_planner_prompt, build_task_prompt},
    tools::ToolInfo,
};

pub fn generate_planner_message(task: &str, tools: &[ToolInfo]) -> Vec<ChatMessage> {
    vec![generate_system_message(tools), generate_user_message(task)]
}

fn generate_system_message(tools: &[ToolInfo]) -> ChatMessage {
    ChatMessage::system(build_planner_prompt(tools))
}

fn generate_user_message(task: &str) -> ChatMessage {
    ChatMessage::user(build_task_prompt(task))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{llm::Role, tools::TOOL_CATALOG};

    #[test]
    fn test_generate_planner_message() {
        let messages = generate_planner_message("Find rust repos", &TOOL_CATALOG);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.contains("Find rust repos"));
    }
}
