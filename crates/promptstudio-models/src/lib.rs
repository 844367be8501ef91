// Models module - data structures shared across the gateway, tools and chat loop
pub mod events;
pub mod requests;
pub mod responses;
pub mod types;

// Re-export commonly used types
pub use events::{DownstreamEvent, ToolCallSummary, ToolOutcome, UpstreamEvent};
pub use requests::{ChatRequest, FunctionDef, Reasoning, Tool, ToolChoice};
pub use responses::{
    ChatResponse, Choice, Delta, FunctionDelta, ResponseMessage, StreamChoice, StreamChunk,
    ToolCallDelta, Usage,
};
pub use types::{content_to_text, FunctionCall, Message, ToolCall};
