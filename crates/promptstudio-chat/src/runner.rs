use async_trait::async_trait;
use promptstudio_models::ToolOutcome;
use promptstudio_tools::ToolExecutor;
use serde_json::Value;

/// Seam between the orchestrator and tool execution; scripted in tests
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn execute(&self, name: &str, arguments: Value) -> ToolOutcome;
}

#[async_trait]
impl ToolRunner for ToolExecutor {
    async fn execute(&self, name: &str, arguments: Value) -> ToolOutcome {
        ToolExecutor::execute(self, name, arguments).await
    }
}
