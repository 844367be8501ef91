//! The streaming chat orchestration loop.
//!
//! One [`ChatOrchestrator`] instance drives one request: it interprets
//! upstream events, dispatches tool calls, appends results to the
//! conversation, requests a finalization and emits typed downstream events
//! in a guaranteed order.

pub mod builders;
pub mod orchestrator;
pub mod runner;
pub mod search_cache;
pub mod sse;
pub mod time_constraints;

pub use builders::ToolCallBuilders;
pub use orchestrator::{
    ChatOrchestrator, ChatTurn, DownstreamStream, DEFAULT_MAX_TOOL_CALLS, MAX_TOOL_CALL_CEILING,
};
pub use runner::ToolRunner;
pub use search_cache::{SearchLookup, SearchTracker, SEARCH_CLAMP_LIMIT};
pub use sse::encode_sse;
pub use time_constraints::{parse_time_constraints, TimeConstraint};
