use std::collections::BTreeMap;

use promptstudio_models::ToolCallSummary;

/// Per-index accumulation of streamed tool-call fragments.
///
/// Upstream interleaves argument chunks for distinct calls; aggregating by
/// `index` keeps them from mixing. A call is complete as soon as its
/// accumulated arguments parse as JSON and a name is known - there is no
/// need to wait for the end of the stream.
#[derive(Debug, Default)]
pub struct ToolCallBuilders {
    builders: BTreeMap<u32, Builder>,
}

#[derive(Debug, Default)]
struct Builder {
    id: Option<String>,
    name: Option<String>,
    arguments: String,
}

impl ToolCallBuilders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one delta, then check the touched builder for completion.
    ///
    /// `turn` feeds the synthesized id (`call_<index>_<turn>`) when the
    /// upstream never assigned one.
    pub fn push(
        &mut self,
        index: u32,
        id: Option<String>,
        name: Option<String>,
        arguments: Option<String>,
        turn: u32,
    ) -> Option<ToolCallSummary> {
        let builder = self.builders.entry(index).or_default();
        if builder.id.is_none() {
            builder.id = id;
        }
        if let Some(name) = name {
            builder.name = Some(name);
        }
        if let Some(chunk) = arguments {
            builder.arguments.push_str(&chunk);
        }

        let name = builder.name.clone()?;
        if builder.arguments.is_empty() {
            return None;
        }
        serde_json::from_str::<serde_json::Value>(&builder.arguments).ok()?;

        Some(ToolCallSummary {
            id: builder
                .id
                .clone()
                .unwrap_or_else(|| format!("call_{index}_{turn}")),
            name,
            arguments: builder.arguments.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_once_arguments_parse() {
        let mut builders = ToolCallBuilders::new();
        assert!(builders
            .push(
                0,
                Some("c1".to_string()),
                Some("search_web".to_string()),
                Some("{\"query\":\"finance ".to_string()),
                1,
            )
            .is_none());

        let call = builders
            .push(0, None, None, Some("news\"}".to_string()), 1)
            .expect("call should complete");
        assert_eq!(call.id, "c1");
        assert_eq!(call.name, "search_web");
        assert_eq!(call.arguments, "{\"query\":\"finance news\"}");
    }

    #[test]
    fn synthesizes_id_when_absent() {
        let mut builders = ToolCallBuilders::new();
        let call = builders
            .push(2, None, Some("calculate".to_string()), Some("{}".to_string()), 3)
            .expect("call should complete");
        assert_eq!(call.id, "call_2_3");
    }

    #[test]
    fn first_id_wins() {
        let mut builders = ToolCallBuilders::new();
        builders.push(0, Some("first".to_string()), None, None, 1);
        let call = builders
            .push(
                0,
                Some("second".to_string()),
                Some("t".to_string()),
                Some("{}".to_string()),
                1,
            )
            .expect("call should complete");
        assert_eq!(call.id, "first");
    }

    #[test]
    fn distinct_indices_do_not_interleave() {
        let mut builders = ToolCallBuilders::new();
        builders.push(0, Some("a".to_string()), Some("t0".to_string()), Some("{\"x\":".to_string()), 1);
        assert!(builders
            .push(1, Some("b".to_string()), Some("t1".to_string()), Some("{\"y\":".to_string()), 1)
            .is_none());

        let call = builders
            .push(0, None, None, Some("1}".to_string()), 1)
            .expect("index 0 should complete");
        assert_eq!(call.id, "a");
        assert_eq!(call.arguments, "{\"x\":1}");
    }

    #[test]
    fn incomplete_name_blocks_completion() {
        let mut builders = ToolCallBuilders::new();
        assert!(builders
            .push(0, Some("c".to_string()), None, Some("{}".to_string()), 1)
            .is_none());
    }
}
