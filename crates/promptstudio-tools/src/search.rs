use serde::Deserialize;
use serde_json::{json, Map, Value};

pub const SEARCH_BASE_URL: &str = "https://api.search.brave.com";
const MAX_RESULTS: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct SearchArgs {
    pub query: String,
    #[serde(default = "default_num_results")]
    pub num_results: i64,
    // Freshness hints; `after`/`before` only participate in dedup keys
    #[serde(default)]
    pub time_hint: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
}

fn default_num_results() -> i64 {
    MAX_RESULTS
}

/// Brave freshness code for a coarse time hint
fn freshness_code(time_hint: &str) -> Option<&'static str> {
    match time_hint {
        "day" => Some("pd"),
        "week" => Some("pw"),
        "month" => Some("pm"),
        "year" => Some("py"),
        _ => None,
    }
}

/// Search the web via the Brave Search API.
///
/// Returns a payload with an `error` key on failure; the executor envelope
/// turns that into a failed outcome.
pub async fn search_web(client: &reqwest::Client, api_key: &str, args: &SearchArgs) -> Value {
    if args.query.trim().is_empty() {
        return json!({"error": "Query cannot be empty"});
    }
    let count = args.num_results.clamp(1, MAX_RESULTS);

    let mut params: Vec<(&str, String)> = vec![
        ("q", args.query.clone()),
        ("count", count.to_string()),
        ("enable_rich_callback", "1".to_string()),
    ];
    if let Some(code) = args.time_hint.as_deref().and_then(freshness_code) {
        params.push(("freshness", code.to_string()));
    }

    let response = client
        .get(format!("{SEARCH_BASE_URL}/res/v1/web/search"))
        .query(&params)
        .header("Accept", "application/json")
        .header("X-Subscription-Token", api_key)
        .send()
        .await;

    let data: Value = match response {
        Ok(resp) if resp.status().is_success() => match resp.json().await {
            Ok(data) => data,
            Err(e) => return json!({"error": format!("Search failed: {e}"), "query": args.query}),
        },
        Ok(resp) => {
            return json!({
                "error": format!("Search failed: status {}", resp.status()),
                "query": args.query,
            })
        }
        Err(e) => return json!({"error": format!("Search failed: {e}"), "query": args.query}),
    };

    let results: Vec<Value> = data
        .pointer("/web/results")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .take(count as usize)
                .map(map_search_result)
                .collect()
        })
        .unwrap_or_default();

    let mut payload = json!({
        "query": args.query,
        "num_results": results.len(),
        "results": results,
        "provider": "brave",
    });

    // Rich structured side data (weather, stocks, ...) arrives via a
    // secondary callback keyed by a token in the main response.
    if let Some(callback_key) = data
        .pointer("/rich/hint/callback_key")
        .and_then(Value::as_str)
    {
        match fetch_rich_data(client, api_key, callback_key).await {
            Some(rich) => {
                payload["rich"] = rich;
            }
            None => {
                tracing::debug!(callback_key, "rich callback fetch failed");
            }
        }
    }

    payload
}

async fn fetch_rich_data(client: &reqwest::Client, api_key: &str, callback_key: &str) -> Option<Value> {
    let response = client
        .get(format!("{SEARCH_BASE_URL}/res/v1/web/rich"))
        .query(&[("callback_key", callback_key)])
        .header("Accept", "application/json")
        .header("X-Subscription-Token", api_key)
        .send()
        .await
        .ok()?;
    if !response.status().is_success() {
        return None;
    }
    response.json().await.ok()
}

/// Shape one Brave result into the studio's result fields
fn map_search_result(item: &Value) -> Value {
    let url = item.get("url").and_then(Value::as_str).unwrap_or("");
    let mut result = Map::new();
    result.insert(
        "title".to_string(),
        json!(item.get("title").and_then(Value::as_str).unwrap_or(url)),
    );
    result.insert(
        "description".to_string(),
        json!(item
            .get("description")
            .or_else(|| item.get("snippet"))
            .and_then(Value::as_str)
            .unwrap_or("")),
    );
    result.insert("url".to_string(), json!(url));
    let host = reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "Brave".to_string());
    result.insert("source".to_string(), json!(host));

    if let Some(thumbnail) = item.pointer("/thumbnail/src").and_then(Value::as_str) {
        result.insert("thumbnail".to_string(), json!(thumbnail));
    }
    if let Some(location) = item.get("location").and_then(Value::as_str) {
        result.insert("location".to_string(), json!(location));
    }
    if let Some(publisher) = item.pointer("/profile/name").and_then(Value::as_str) {
        result.insert("publisher".to_string(), json!(publisher));
    }
    if let Some(language) = item.get("language").and_then(Value::as_str) {
        result.insert("language".to_string(), json!(language));
    }
    if let Some(kind) = item.get("type").and_then(Value::as_str) {
        result.insert("type".to_string(), json!(kind));
    }

    Value::Object(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_default_num_results() {
        let args: SearchArgs = serde_json::from_value(json!({"query": "rust"})).unwrap();
        assert_eq!(args.num_results, 10);
        assert!(args.time_hint.is_none());
    }

    #[test]
    fn freshness_codes() {
        assert_eq!(freshness_code("day"), Some("pd"));
        assert_eq!(freshness_code("week"), Some("pw"));
        assert_eq!(freshness_code("month"), Some("pm"));
        assert_eq!(freshness_code("year"), Some("py"));
        assert_eq!(freshness_code("decade"), None);
    }

    #[test]
    fn maps_result_fields() {
        let item = json!({
            "title": "Rust Blog",
            "description": "News about Rust",
            "url": "https://blog.rust-lang.org/2026/post",
            "thumbnail": {"src": "https://img.example/t.png"},
            "profile": {"name": "Rust Blog"},
            "language": "en",
            "type": "search_result",
        });
        let mapped = map_search_result(&item);
        assert_eq!(mapped["title"], "Rust Blog");
        assert_eq!(mapped["source"], "blog.rust-lang.org");
        assert_eq!(mapped["thumbnail"], "https://img.example/t.png");
        assert_eq!(mapped["publisher"], "Rust Blog");
        assert!(mapped.get("location").is_none());
    }

    #[test]
    fn missing_title_falls_back_to_url() {
        let item = json!({"url": "https://example.com/page"});
        let mapped = map_search_result(&item);
        assert_eq!(mapped["title"], "https://example.com/page");
        assert_eq!(mapped["description"], "");
    }
}
