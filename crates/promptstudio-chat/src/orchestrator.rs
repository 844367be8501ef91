use std::pin::Pin;
use std::sync::Arc;

use async_stream::stream;
use futures_util::{Stream, StreamExt};
use promptstudio_gateway::Gateway;
use promptstudio_models::{
    content_to_text, ChatRequest, DownstreamEvent, Message, Tool, ToolCall, ToolCallSummary,
    ToolChoice, UpstreamEvent,
};
use promptstudio_policy::{normalize_tool_choice, NormalizedParams, ProviderPolicy};
use promptstudio_tools::tool_metadata;
use serde_json::{Map, Value};

use crate::builders::ToolCallBuilders;
use crate::runner::ToolRunner;
use crate::search_cache::{SearchLookup, SearchTracker};
use crate::time_constraints::{enrich_search_args, parse_time_constraints};

pub const DEFAULT_MAX_TOOL_CALLS: u32 = 5;
pub const MAX_TOOL_CALL_CEILING: u32 = 20;

/// Appended after every tool result so the model answers from the results
/// instead of claiming it lacks tool access.
const FINALIZE_PROMPT: &str =
    "Please use the tool results above to answer my original question.";

/// Prompt cues that suggest the model needs live information
const NEEDS_TOOLS_CUES: [&str; 9] = [
    "news", "latest", "recent", "current", "last ", "past ", "find", "look up", "search",
];

pub type DownstreamStream = Pin<Box<dyn Stream<Item = DownstreamEvent> + Send>>;

/// Inputs for one streaming chat request
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub model: String,
    pub prompt: String,
    pub system: Option<String>,
    pub params: NormalizedParams,
    /// Requested tool choice: `auto`, `none`, `required`, or a tool name
    pub tool_choice: Option<String>,
    pub max_tool_calls: u32,
    /// Schemas forwarded to the upstream; empty disables the tool loop
    pub tools: Vec<Tool>,
}

/// Drives one streaming chat request: interprets upstream events, dispatches
/// tool calls, appends results to the conversation, requests a finalization
/// and emits downstream events in guaranteed order.
pub struct ChatOrchestrator {
    gateway: Arc<dyn Gateway>,
    runner: Arc<dyn ToolRunner>,
}

impl ChatOrchestrator {
    pub fn new(gateway: Arc<dyn Gateway>, runner: Arc<dyn ToolRunner>) -> Self {
        Self { gateway, runner }
    }

    /// Run the turn. The stream always terminates with exactly one `done`
    /// unless the client disconnects; errors never escape as panics.
    pub fn run(&self, turn: ChatTurn) -> DownstreamStream {
        let gateway = Arc::clone(&self.gateway);
        let runner = Arc::clone(&self.runner);

        Box::pin(stream! {
            let policy = ProviderPolicy::for_model(&turn.model);
            let mut messages = initial_messages(&turn);

            if turn.tools.is_empty() {
                // Plain streaming, no tool loop
                let mut request = base_request(&turn, &messages);
                policy.apply(&mut request);
                match gateway.stream_events(request).await {
                    Ok(mut events) => {
                        while let Some(item) = events.next().await {
                            match item {
                                Ok(UpstreamEvent::ContentDelta { text }) => {
                                    yield DownstreamEvent::content(text);
                                }
                                Ok(UpstreamEvent::ReasoningDelta { text }) => {
                                    yield DownstreamEvent::reasoning(text);
                                }
                                Ok(UpstreamEvent::ToolCallDelta { .. }) => {}
                                Ok(UpstreamEvent::Done) => break,
                                Err(e) => {
                                    yield DownstreamEvent::error(e.to_string());
                                    yield DownstreamEvent::done();
                                    return;
                                }
                            }
                        }
                    }
                    Err(e) => {
                        yield DownstreamEvent::error(e.to_string());
                    }
                }
                yield DownstreamEvent::done();
                return;
            }

            let tool_names: Vec<String> =
                turn.tools.iter().map(|t| t.function.name.clone()).collect();
            let mut tracker = SearchTracker::default();
            let mut sent_any_content = false;
            let mut any_tool_executed = false;
            let mut forced_tools = false;
            let mut finished = false;
            let limit = turn.max_tool_calls.clamp(1, MAX_TOOL_CALL_CEILING);
            let mut iteration: u32 = 0;

            'outer: while iteration < limit {
                iteration += 1;

                let name_refs: Vec<&str> = tool_names.iter().map(String::as_str).collect();
                let mut choice =
                    normalize_tool_choice(turn.tool_choice.as_deref(), &policy, &name_refs);
                if choice.is_forced() {
                    forced_tools = true;
                }
                if iteration == 1
                    && choice == ToolChoice::Auto
                    && !policy.skip_forced_tool_choice
                    && tool_names.iter().any(|n| n == "search_web")
                    && implies_needs_tools(&turn)
                {
                    choice = ToolChoice::Function("search_web".to_string());
                    forced_tools = true;
                }

                let mut request = base_request(&turn, &messages);
                request.tools = Some(turn.tools.clone());
                request.tool_choice = Some(choice);
                policy.apply(&mut request);

                let mut events = match gateway.stream_events(request).await {
                    Ok(events) => events,
                    Err(e) => {
                        yield DownstreamEvent::error(e.to_string());
                        yield DownstreamEvent::done();
                        return;
                    }
                };

                // Stream until the first completed tool call or the content finishes
                let mut builders = ToolCallBuilders::new();
                let mut completed: Option<ToolCallSummary> = None;
                while let Some(item) = events.next().await {
                    match item {
                        Ok(UpstreamEvent::ReasoningDelta { text }) => {
                            yield DownstreamEvent::reasoning(text);
                        }
                        Ok(UpstreamEvent::ContentDelta { text }) => {
                            sent_any_content = true;
                            yield DownstreamEvent::content(text);
                        }
                        Ok(UpstreamEvent::ToolCallDelta { index, id, name, arguments }) => {
                            if let Some(call) =
                                builders.push(index, id, name, arguments, iteration)
                            {
                                completed = Some(call);
                                break;
                            }
                        }
                        Ok(UpstreamEvent::Done) => break,
                        Err(e) => {
                            yield DownstreamEvent::error(e.to_string());
                            yield DownstreamEvent::done();
                            return;
                        }
                    }
                }
                // Remaining upstream chunks (if any) are discarded with the stream
                drop(events);

                let call = match completed {
                    Some(call) => call,
                    None => {
                        if sent_any_content {
                            finished = true;
                            break;
                        }
                        if iteration <= 2 && forced_tools && !any_tool_executed {
                            // Tools were forced but the model produced nothing;
                            // silently allow one more attempt.
                            continue;
                        }
                        yield DownstreamEvent::content("No additional content generated.");
                        sent_any_content = true;
                        finished = true;
                        break;
                    }
                };

                tracing::debug!(tool = %call.name, id = %call.id, iteration, "tool call completed mid-stream");
                yield DownstreamEvent::ToolCalls { calls: vec![call.clone()] };
                messages.push(Message::assistant_tool_calls(vec![ToolCall::function(
                    call.id.clone(),
                    call.name.clone(),
                    call.arguments.clone(),
                )]));

                let mut args: Map<String, Value> =
                    serde_json::from_str(&call.arguments).unwrap_or_default();
                if call.name == "search_web" {
                    let combined = format!(
                        "{} \n {}",
                        turn.system.as_deref().unwrap_or(""),
                        turn.prompt
                    );
                    if let Some(constraint) = parse_time_constraints(&combined) {
                        enrich_search_args(&mut args, &constraint);
                    }
                }
                let args = Value::Object(args);

                let meta = tool_metadata(&call.name);
                yield DownstreamEvent::ToolExecuting {
                    id: call.id.clone(),
                    name: call.name.clone(),
                    category: meta.category.to_string(),
                    visibility: meta.visibility.to_string(),
                };

                let outcome = if call.name == "search_web" {
                    match tracker.lookup(&args) {
                        SearchLookup::Cached(outcome) => outcome,
                        SearchLookup::Clamped { outcome, warn } => {
                            if warn {
                                yield DownstreamEvent::warning(
                                    format!("Trimmed tool calls to {}", tracker.clamp_limit()),
                                    Some("TOOL_CLAMP"),
                                );
                            }
                            outcome
                        }
                        SearchLookup::Miss(key) => {
                            let outcome = runner.execute(&call.name, args.clone()).await;
                            tracker.record(key, &outcome);
                            outcome
                        }
                    }
                } else {
                    runner.execute(&call.name, args.clone()).await
                };
                any_tool_executed = true;

                yield DownstreamEvent::ToolResult {
                    id: call.id.clone(),
                    name: call.name.clone(),
                    result: outcome.clone(),
                    category: meta.category.to_string(),
                    visibility: meta.visibility.to_string(),
                };

                messages.push(Message::tool(call.id.clone(), outcome.tool_message_content()));
                messages.push(Message::user(FINALIZE_PROMPT));

                // Finalize: non-streaming first, tools attached but forbidden
                let mut finalize = base_request(&turn, &messages);
                finalize.tools = Some(turn.tools.clone());
                finalize.tool_choice = Some(ToolChoice::None);
                policy.apply(&mut finalize);

                match gateway.completion(finalize).await {
                    Ok(response) => {
                        let content = response
                            .choices
                            .first()
                            .map(|c| content_to_text(&c.message.content))
                            .unwrap_or_default();
                        if !content.is_empty() {
                            yield DownstreamEvent::content(content);
                            sent_any_content = true;
                            finished = true;
                            break 'outer;
                        }
                    }
                    Err(e) => {
                        yield DownstreamEvent::Debug {
                            message: format!("Non-streaming finalization failed: {e}"),
                        };
                    }
                }

                // Fallback: streaming finalization with no forced tool choice
                let mut fallback_sent = false;
                let mut aborted = false;
                let mut fallback = base_request(&turn, &messages);
                policy.apply(&mut fallback);
                match gateway.stream_events(fallback).await {
                    Ok(mut events) => {
                        while let Some(item) = events.next().await {
                            match item {
                                Ok(UpstreamEvent::ContentDelta { text }) => {
                                    fallback_sent = true;
                                    sent_any_content = true;
                                    yield DownstreamEvent::content(text);
                                }
                                Ok(UpstreamEvent::ReasoningDelta { text }) => {
                                    yield DownstreamEvent::reasoning(text);
                                }
                                Ok(UpstreamEvent::ToolCallDelta { .. }) => {}
                                Ok(UpstreamEvent::Done) => break,
                                Err(e) => {
                                    yield DownstreamEvent::error(format!(
                                        "Streaming finalization failed: {e}"
                                    ));
                                    aborted = true;
                                    break;
                                }
                            }
                        }
                    }
                    Err(e) => {
                        yield DownstreamEvent::error(format!(
                            "Streaming finalization failed: {e}"
                        ));
                        aborted = true;
                    }
                }

                if aborted || fallback_sent {
                    finished = true;
                    break 'outer;
                }
                // Finalization produced nothing; give the model another
                // iteration (it may issue a further tool call).
            }

            if !finished {
                yield DownstreamEvent::warning(
                    format!("Reached maximum tool call iterations ({limit})"),
                    Some("TOOL_CLAMP"),
                );
                if !sent_any_content {
                    yield DownstreamEvent::content(
                        "Stopped after maximum tool calls. No further content generated by the model.",
                    );
                }
            }

            yield DownstreamEvent::done();
        })
    }
}

fn initial_messages(turn: &ChatTurn) -> Vec<Message> {
    let mut messages = Vec::new();
    if let Some(system) = &turn.system {
        if !system.is_empty() {
            messages.push(Message::system(system.clone()));
        }
    }
    if turn.prompt.is_empty() {
        messages.push(Message::user("Hello"));
    } else {
        messages.push(Message::user(turn.prompt.clone()));
    }
    messages
}

fn base_request(turn: &ChatTurn, messages: &[Message]) -> ChatRequest {
    let mut request = ChatRequest {
        model: turn.model.clone(),
        messages: messages.to_vec(),
        ..Default::default()
    };
    turn.params.apply_to(&mut request);
    request
}

/// Does the prompt imply a need for live information?
fn implies_needs_tools(turn: &ChatTurn) -> bool {
    let prompt = turn.prompt.to_lowercase();
    if NEEDS_TOOLS_CUES.iter().any(|cue| prompt.contains(cue)) {
        return true;
    }
    let combined = format!("{} \n {}", turn.system.as_deref().unwrap_or(""), turn.prompt);
    parse_time_constraints(&combined).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptstudio_tools::builtin_tool_schemas;

    fn turn_with_prompt(prompt: &str) -> ChatTurn {
        ChatTurn {
            model: "openai/gpt-4o-mini".to_string(),
            prompt: prompt.to_string(),
            system: None,
            params: NormalizedParams::default(),
            tool_choice: None,
            max_tool_calls: DEFAULT_MAX_TOOL_CALLS,
            tools: builtin_tool_schemas(),
        }
    }

    #[test]
    fn live_information_cues_are_detected() {
        assert!(implies_needs_tools(&turn_with_prompt("Latest finance news")));
        assert!(implies_needs_tools(&turn_with_prompt(
            "what happened in the last 3 days"
        )));
        assert!(!implies_needs_tools(&turn_with_prompt("write a haiku")));
    }

    #[test]
    fn initial_messages_default_prompt() {
        let mut turn = turn_with_prompt("");
        turn.system = Some("be brief".to_string());
        let messages = initial_messages(&turn);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].content, "Hello");
    }
}
