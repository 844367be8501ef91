use promptstudio_models::Tool;
use serde_json::json;

/// Display metadata attached to tool lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolMeta {
    pub category: &'static str,
    pub visibility: &'static str,
}

/// Category and visibility for a tool name.
///
/// Search tools are surfaced prominently in the studio UI; utility tools stay
/// hidden; everything else is secondary.
pub fn tool_metadata(name: &str) -> ToolMeta {
    match name.to_lowercase().as_str() {
        "search_web" | "read_url" => ToolMeta {
            category: "search",
            visibility: "primary",
        },
        "get_current_time" | "calculate" => ToolMeta {
            category: "utility",
            visibility: "hidden",
        },
        _ => ToolMeta {
            category: "other",
            visibility: "secondary",
        },
    }
}

/// OpenAI-compatible schemas for the built-in tools, registered at startup
/// and forwarded to the upstream unchanged.
pub fn builtin_tool_schemas() -> Vec<Tool> {
    vec![
        Tool::function(
            "search_web",
            "Search the web for current information. Returns search results with titles, \
             descriptions, and URLs. Also returns rich structured data when available \
             (weather forecasts, stock quotes, sports scores, calculations, currency \
             conversion, etc.).",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query to look up"
                    },
                    "num_results": {
                        "type": "integer",
                        "description": "Number of results to return (1-10)",
                        "default": 10
                    }
                },
                "required": ["query"]
            }),
        ),
        Tool::function(
            "read_url",
            "Fetch one or more web pages and return their content as Markdown. \
             Use after search_web to read promising results in full.",
            json!({
                "type": "object",
                "properties": {
                    "urls": {
                        "description": "URL or list of URLs to fetch (max 8)",
                        "anyOf": [
                            {"type": "string"},
                            {"type": "array", "items": {"type": "string"}}
                        ]
                    },
                    "max_chars": {
                        "type": "integer",
                        "description": "Maximum characters of content per page (500-50000)",
                        "default": 12000
                    }
                },
                "required": ["urls"]
            }),
        ),
        Tool::function(
            "get_current_time",
            "Get the current date and time in ISO 8601 format.",
            json!({
                "type": "object",
                "properties": {
                    "timezone": {
                        "type": "string",
                        "description": "Timezone name (e.g., 'UTC'). Defaults to UTC.",
                        "default": "UTC"
                    }
                },
                "required": []
            }),
        ),
        Tool::function(
            "calculate",
            "Safely evaluate a mathematical expression. Supports basic arithmetic: \
             +, -, *, /, ** (power). No variables or functions allowed.",
            json!({
                "type": "object",
                "properties": {
                    "expression": {
                        "type": "string",
                        "description": "Mathematical expression to evaluate (e.g., '25 * 17 + 89')"
                    }
                },
                "required": ["expression"]
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_tools_are_primary() {
        assert_eq!(tool_metadata("search_web").category, "search");
        assert_eq!(tool_metadata("search_web").visibility, "primary");
        assert_eq!(tool_metadata("read_url").visibility, "primary");
    }

    #[test]
    fn utility_tools_are_hidden() {
        assert_eq!(tool_metadata("calculate").category, "utility");
        assert_eq!(tool_metadata("get_current_time").visibility, "hidden");
    }

    #[test]
    fn unknown_tools_default_to_secondary() {
        let meta = tool_metadata("mystery");
        assert_eq!(meta.category, "other");
        assert_eq!(meta.visibility, "secondary");
    }

    #[test]
    fn schemas_cover_the_registry() {
        let schemas = builtin_tool_schemas();
        let names: Vec<&str> = schemas.iter().map(|t| t.function.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["search_web", "read_url", "get_current_time", "calculate"]
        );
        for schema in &schemas {
            assert_eq!(schema.tool_type, "function");
            assert!(schema.function.parameters.get("type").is_some());
        }
    }
}
