use crate::tools::ToolInfo;

const PLAN_SCHEMA: &str = r#"{
  "task_understanding": "Brief summary of user intent",
  "required_tools": ["list", "of", "tool", "names"],
  "steps": [
    {
      "step_number": 1,
      "action": "Description of what to do",
      "tool": "tool_name",
      "function": "function_name",
      "parameters": {
        "param": "value"
      },
      "reasoning": "Why this step is required"
    }
  ],
  "expected_output": "Description of the final output"
}"#;

const PLAN_RULES: &str = r#"- You MUST use EXACT parameter names as defined above
- For weather.get_current_weather, you MUST use "city" (NOT location)
- Do NOT invent new parameter names
- Do NOT include parameters not listed in the schema
- Return ONLY valid JSON (no markdown, no explanation)
- If the user provides a city name, always prefer weather.get_current_weather
- Use metric units unless the user explicitly asks otherwise
- EVERY step MUST use a valid tool (never use "none")
- Do NOT add steps for manual processing or sorting
- If sorting or filtering is required, it MUST be handled inside a tool call"#;

const PLAN_EXAMPLE: &str = r#"User Task: "What is the weather in Paris?"

Correct JSON Output:
{
  "task_understanding": "Get current weather for Paris",
  "required_tools": ["weather"],
  "steps": [
    {
      "step_number": 1,
      "action": "Retrieve current weather for Paris",
      "tool": "weather",
      "function": "get_current_weather",
      "parameters": {
        "city": "Paris",
        "units": "metric"
      },
      "reasoning": "The user wants the current weather in Paris"
    }
  ],
  "expected_output": "Current weather details for Paris"
}"#;

fn section(title: &str) -> String {
    format!("====================\n{title}\n====================")
}

pub fn build_tools_prompt(tools: &[ToolInfo]) -> String {
    tools
        .iter()
        .map(|tool| {
            let functions = tool
                .functions
                .iter()
                .map(|function| {
                    let params = function
                        .params_schema
                        .as_object()
                        .map(|schema| {
                            schema
                                .iter()
                                .map(|(name, desc)| {
                                    format!("    - {} ({})", name, desc.as_str().unwrap_or(""))
                                })
                                .collect::<Vec<_>>()
                                .join("\n")
                        })
                        .unwrap_or_default();
                    format!(
                        "- function: {}\n  summary: {}\n  parameters:\n{}",
                        function.name, function.summary, params
                    )
                })
                .collect::<Vec<_>>()
                .join("\n\n");
            format!(
                "{} TOOL\n- tool name: {}\n- description: {}\n{}",
                tool.name.to_uppercase(),
                tool.name,
                tool.description,
                functions
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_planner_prompt(tools: &[ToolInfo]) -> String {
    format!(
        "You are a task planning agent. Your job is to analyze user requests and create a precise execution plan.\n\n{}\n\n{}\n\nIMPORTANT: These are the ONLY tools available. Do not use or reference any other tools.\n\n{}\n{}\n\n{}\n{}\n\n{}\n{}\n",
        section("AVAILABLE TOOLS"),
        build_tools_prompt(tools),
        section("JSON SCHEMA"),
        PLAN_SCHEMA,
        section("CRITICAL RULES"),
        PLAN_RULES,
        section("EXAMPLE"),
        PLAN_EXAMPLE,
    )
}

pub fn build_task_prompt(task: &str) -> String {
    format!("\nUser Task: {task}\n\nCreate the execution plan now.\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::TOOL_CATALOG;

    #[test]
    fn test_planner_prompt_lists_every_function() {
        let prompt = build_planner_prompt(&TOOL_CATALOG);
        for tool in TOOL_CATALOG.iter() {
            assert!(prompt.contains(&format!("- tool name: {}", tool.name)));
            for function in &tool.functions {
                assert!(prompt.contains(&format!("- function: {}", function.name)));
            }
        }
        assert!(prompt.contains("\"step_number\": 1"));
        assert!(prompt.contains("city (string, required"));
    }

    #[test]
    fn test_task_prompt() {
        assert!(build_task_prompt("weather in Oslo").contains("User Task: weather in Oslo"));
    }
}
