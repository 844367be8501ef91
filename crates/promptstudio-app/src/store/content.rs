use serde_json::{json, Value};

/// One piece of provider content: an optimization guide or a prompting guide
#[derive(Debug, Clone)]
pub struct ContentEntry {
    pub provider_id: &'static str,
    pub content_type: &'static str,
    pub model_id: Option<&'static str>,
    pub title: &'static str,
    pub content: Value,
    pub doc_url: Option<&'static str>,
}

/// Read-only store of curated provider guidance, seeded at startup
pub struct ProviderContentStore {
    entries: Vec<ContentEntry>,
}

impl ProviderContentStore {
    pub fn seeded() -> Self {
        Self {
            entries: seed_entries(),
        }
    }

    /// Distinct provider ids with any content, sorted
    pub fn provider_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.entries.iter().map(|e| e.provider_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn optimization_guide(&self, provider_id: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|e| e.provider_id == provider_id && e.content_type == "optimization_guide")
            .map(|e| &e.content)
    }

    /// Guide text fed into the optimize meta-prompt
    pub fn guide_text(&self, provider_id: &str) -> Option<String> {
        self.optimization_guide(provider_id)
            .and_then(|c| c.get("guide"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// General prompting guide for a provider, with a model-specific section
    /// appended when one exists for `model_id`.
    pub fn prompting_guides(&self, provider_id: &str, model_id: Option<&str>) -> Option<Value> {
        let general = self.entries.iter().find(|e| {
            e.provider_id == provider_id
                && e.content_type == "prompting_guide"
                && e.model_id.is_none()
        })?;

        let mut result = json!({
            "title": general.title,
            "content": general.content,
            "doc_url": general.doc_url,
        });

        if let Some(model_id) = model_id {
            let specific = self.entries.iter().find(|e| {
                e.provider_id == provider_id
                    && e.content_type == "prompting_guide"
                    && e.model_id == Some(model_id)
            });
            if let Some(entry) = specific {
                result["model_specific"] = json!({
                    "title": entry.title,
                    "content": entry.content,
                    "doc_url": entry.doc_url,
                });
            }
        }

        Some(result)
    }
}

fn seed_entries() -> Vec<ContentEntry> {
    vec![
        ContentEntry {
            provider_id: "openai",
            content_type: "optimization_guide",
            model_id: None,
            title: "OpenAI optimization guide",
            content: json!({"guide": "Be specific about role, task, constraints, success criteria. \
                Use structure (headings, bullets, sections). Prefer explicit formats (JSON) when needed. \
                For complex tasks: plan \u{2192} answer."}),
            doc_url: None,
        },
        ContentEntry {
            provider_id: "anthropic",
            content_type: "optimization_guide",
            model_id: None,
            title: "Anthropic optimization guide",
            content: json!({"guide": "Keep durable rules in system. Use simple XML-like sections for \
                instructions/context/output. Prefer lower temperature for analysis; use examples sparingly."}),
            doc_url: None,
        },
        ContentEntry {
            provider_id: "google",
            content_type: "optimization_guide",
            model_id: None,
            title: "Google optimization guide",
            content: json!({"guide": "State role, constraints, and token budgets. Provide short grounding \
                passages. Ask for numbered bullets or JSON outputs."}),
            doc_url: None,
        },
        ContentEntry {
            provider_id: "xai",
            content_type: "optimization_guide",
            model_id: None,
            title: "xAI optimization guide",
            content: json!({"guide": "Define role and strict JSON schema when extracting. Tune one \
                stochastic parameter at a time."}),
            doc_url: None,
        },
        ContentEntry {
            provider_id: "deepseek",
            content_type: "optimization_guide",
            model_id: None,
            title: "DeepSeek optimization guide",
            content: json!({"guide": "State objective, constraints, and evaluation criteria. Keep outputs \
                atomic and structured."}),
            doc_url: None,
        },
        ContentEntry {
            provider_id: "openai",
            content_type: "prompting_guide",
            model_id: None,
            title: "OpenAI – Essentials",
            content: json!({
                "bullets": [
                    "Be specific: role, task, audience, constraints, success criteria.",
                    "Provide context and structure; ask for a format (JSON, bullets).",
                    "For complex tasks: plan \u{2192} answer; keep temperature + top_p sane.",
                ],
                "structure": [
                    "System: durable rules (tone, role, constraints).",
                    "User: task + minimal context/examples.",
                    "Output: strict format (JSON schema or bullets).",
                ],
            }),
            doc_url: Some("https://platform.openai.com/docs/guides/prompt-engineering"),
        },
        ContentEntry {
            provider_id: "anthropic",
            content_type: "prompting_guide",
            model_id: None,
            title: "Anthropic (Claude) – Essentials",
            content: json!({
                "bullets": [
                    "Keep durable rules in system; be explicit and concise.",
                    "Use simple XML tags to structure tasks and outputs.",
                    "Prefer low temperature for analytical tasks; stream when helpful.",
                ],
                "structure": [
                    "System: role and rules.",
                    "User: <instructions>, <context>, <output> sections.",
                ],
            }),
            doc_url: Some("https://docs.anthropic.com/en/docs/build-with-claude/prompt-engineering"),
        },
        ContentEntry {
            provider_id: "google",
            content_type: "prompting_guide",
            model_id: None,
            title: "Google (Gemini) – Essentials",
            content: json!({
                "bullets": [
                    "State role, constraints and token budgets up front.",
                    "Ground the model with short passages rather than long dumps.",
                    "Ask for numbered bullets or JSON outputs.",
                ],
            }),
            doc_url: Some("https://ai.google.dev/gemini-api/docs/prompting-strategies"),
        },
        ContentEntry {
            provider_id: "xai",
            content_type: "prompting_guide",
            model_id: None,
            title: "xAI (Grok) – Essentials",
            content: json!({
                "bullets": [
                    "Define the role and a strict output schema when extracting.",
                    "Tune one stochastic parameter at a time.",
                ],
            }),
            doc_url: Some("https://docs.x.ai/docs"),
        },
        ContentEntry {
            provider_id: "deepseek",
            content_type: "prompting_guide",
            model_id: None,
            title: "DeepSeek – Essentials",
            content: json!({
                "bullets": [
                    "State objective, constraints, and evaluation criteria.",
                    "Break complex queries into sequential prompts.",
                    "Keep outputs atomic and structured.",
                ],
            }),
            doc_url: Some("https://api-docs.deepseek.com"),
        },
    ]
}
