use promptstudio_models::{ChatRequest, ToolChoice};

/// Extract the provider ID from a model ID.
///
/// "x-ai/grok-4:free" -> "xai", "openai/gpt-4o" -> "openai".
pub fn provider_id(model_id: &str) -> String {
    model_id
        .split('/')
        .next()
        .unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("")
        .replace('-', "")
}

/// Per-provider request constraints, keyed off the model ID prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderPolicy {
    pub disable_parallel_tool_calls: bool,
    pub strip_response_format: bool,
    pub skip_forced_tool_choice: bool,
}

impl ProviderPolicy {
    /// Look up the policy row for a provider. New providers are a data change.
    pub fn for_provider(provider: &str) -> Self {
        match provider {
            "anthropic" => Self {
                disable_parallel_tool_calls: true,
                strip_response_format: false,
                skip_forced_tool_choice: false,
            },
            "xai" => Self {
                disable_parallel_tool_calls: true,
                strip_response_format: true,
                skip_forced_tool_choice: true,
            },
            _ => Self {
                disable_parallel_tool_calls: false,
                strip_response_format: false,
                skip_forced_tool_choice: false,
            },
        }
    }

    pub fn for_model(model_id: &str) -> Self {
        Self::for_provider(&provider_id(model_id))
    }

    /// Apply the constraints to an outgoing request
    pub fn apply(&self, request: &mut ChatRequest) {
        if self.disable_parallel_tool_calls && request.tools.is_some() {
            request.parallel_tool_calls = Some(false);
        }
        if self.strip_response_format {
            request.response_format = None;
        }
    }
}

/// Normalize the requested tool choice for a provider.
///
/// Accepted inputs are `auto`, `none`, `required`, or a tool name. Known tool
/// names become a forced function selector; unknown names fall back to
/// `auto`. Providers that reject forced choices degrade everything but
/// `auto`/`none` to `auto`.
pub fn normalize_tool_choice(
    requested: Option<&str>,
    policy: &ProviderPolicy,
    tool_names: &[&str],
) -> ToolChoice {
    let requested = requested.unwrap_or("auto");

    if policy.skip_forced_tool_choice && !matches!(requested, "auto" | "none") {
        return ToolChoice::Auto;
    }

    match requested {
        "none" => ToolChoice::None,
        "required" => ToolChoice::Required,
        "auto" => ToolChoice::Auto,
        name if tool_names.contains(&name) => ToolChoice::Function(name.to_string()),
        _ => ToolChoice::Auto,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_id_splits_and_strips() {
        assert_eq!(provider_id("openai/gpt-4o-mini"), "openai");
        assert_eq!(provider_id("x-ai/grok-4"), "xai");
        assert_eq!(provider_id("meta-llama/llama-3.1-70b:free"), "metallama");
        assert_eq!(provider_id(""), "");
        assert_eq!(provider_id("gpt-4"), "gpt4");
    }

    #[test]
    fn policy_table_rows() {
        let anthropic = ProviderPolicy::for_provider("anthropic");
        assert!(anthropic.disable_parallel_tool_calls);
        assert!(!anthropic.strip_response_format);
        assert!(!anthropic.skip_forced_tool_choice);

        let xai = ProviderPolicy::for_provider("xai");
        assert!(xai.disable_parallel_tool_calls);
        assert!(xai.strip_response_format);
        assert!(xai.skip_forced_tool_choice);

        let openai = ProviderPolicy::for_provider("openai");
        assert!(!openai.disable_parallel_tool_calls);
        assert!(!openai.strip_response_format);
        assert!(!openai.skip_forced_tool_choice);
    }

    #[test]
    fn apply_disables_parallel_calls_only_with_tools() {
        let policy = ProviderPolicy::for_provider("anthropic");
        let mut request = ChatRequest::default();
        policy.apply(&mut request);
        assert_eq!(request.parallel_tool_calls, None);

        request.tools = Some(vec![]);
        policy.apply(&mut request);
        assert_eq!(request.parallel_tool_calls, Some(false));
    }

    #[test]
    fn apply_strips_response_format_for_xai() {
        let policy = ProviderPolicy::for_model("xai/grok-4");
        let mut request = ChatRequest {
            response_format: Some(serde_json::json!({"type": "json_object"})),
            ..Default::default()
        };
        policy.apply(&mut request);
        assert!(request.response_format.is_none());
    }

    #[test]
    fn tool_choice_known_name_becomes_function() {
        let policy = ProviderPolicy::for_provider("openai");
        let choice = normalize_tool_choice(Some("search_web"), &policy, &["search_web"]);
        assert_eq!(choice, ToolChoice::Function("search_web".to_string()));
    }

    #[test]
    fn tool_choice_unknown_name_falls_back_to_auto() {
        let policy = ProviderPolicy::for_provider("openai");
        let choice = normalize_tool_choice(Some("telepathy"), &policy, &["search_web"]);
        assert_eq!(choice, ToolChoice::Auto);
    }

    #[test]
    fn xai_degrades_forced_choices_to_auto() {
        let policy = ProviderPolicy::for_provider("xai");
        assert_eq!(
            normalize_tool_choice(Some("search_web"), &policy, &["search_web"]),
            ToolChoice::Auto
        );
        assert_eq!(
            normalize_tool_choice(Some("required"), &policy, &["search_web"]),
            ToolChoice::Auto
        );
        assert_eq!(
            normalize_tool_choice(Some("none"), &policy, &["search_web"]),
            ToolChoice::None
        );
    }
}
