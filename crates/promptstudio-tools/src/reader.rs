use serde::Deserialize;
use serde_json::{json, Value};

pub const READER_BASE_URL: &str = "https://r.jina.ai";
const MAX_URLS: usize = 8;
const MIN_CHARS: i64 = 500;
const MAX_CHARS: i64 = 50_000;
const DEFAULT_MAX_CHARS: i64 = 12_000;

#[derive(Debug, Deserialize)]
pub struct ReadUrlArgs {
    pub urls: UrlsArg,
    #[serde(default = "default_max_chars")]
    pub max_chars: i64,
}

fn default_max_chars() -> i64 {
    DEFAULT_MAX_CHARS
}

/// A single URL or a list of URLs
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UrlsArg {
    One(String),
    Many(Vec<String>),
}

impl UrlsArg {
    fn into_vec(self) -> Vec<String> {
        match self {
            UrlsArg::One(url) => vec![url],
            UrlsArg::Many(urls) => urls,
        }
    }
}

/// Fetch up to eight URLs concurrently through the reader service.
///
/// Per-URL failures become `{url, error}` entries; the call as a whole only
/// fails on an empty URL list.
pub async fn read_url(client: &reqwest::Client, api_key: Option<&str>, args: ReadUrlArgs) -> Value {
    let all_urls = args.urls.into_vec();
    if all_urls.is_empty() {
        return json!({"error": "No URLs provided"});
    }
    let max_chars = args.max_chars.clamp(MIN_CHARS, MAX_CHARS) as usize;

    let (urls, dropped) = if all_urls.len() > MAX_URLS {
        (
            all_urls[..MAX_URLS].to_vec(),
            all_urls[MAX_URLS..].to_vec(),
        )
    } else {
        (all_urls, Vec::new())
    };

    let fetches = urls
        .iter()
        .map(|url| fetch_page(client, api_key, url, max_chars));
    let results: Vec<Value> = futures::future::join_all(fetches).await;

    let mut payload = json!({"results": results});
    if !dropped.is_empty() {
        payload["truncated"] = json!({"dropped_urls": dropped});
    }
    payload
}

async fn fetch_page(
    client: &reqwest::Client,
    api_key: Option<&str>,
    url: &str,
    max_chars: usize,
) -> Value {
    let mut request = client
        .get(format!("{READER_BASE_URL}/{url}"))
        .header("Accept", "text/plain");
    if let Some(key) = api_key {
        request = request.header("Authorization", format!("Bearer {key}"));
    }

    let response = match request.send().await {
        Ok(resp) => resp,
        Err(e) => return json!({"url": url, "error": format!("Fetch failed: {e}")}),
    };
    if !response.status().is_success() {
        return json!({"url": url, "error": format!("Fetch failed: status {}", response.status())});
    }
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return json!({"url": url, "error": format!("Fetch failed: {e}")}),
    };

    let title = extract_title(&body);
    let content = truncate_content(&body, max_chars);
    json!({"url": url, "title": title, "content": content})
}

/// The reader prefixes its Markdown output with a `Title:` header line
fn extract_title(body: &str) -> String {
    body.lines()
        .take(5)
        .find_map(|line| line.strip_prefix("Title: "))
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Truncate to `max_chars`, preferring the last sentence boundary within the
/// final 20% of the allowed window.
pub fn truncate_content(content: &str, max_chars: usize) -> String {
    let chars: Vec<char> = content.chars().collect();
    if chars.len() <= max_chars {
        return content.to_string();
    }

    let window: String = chars[..max_chars].iter().collect();
    let boundary_floor = max_chars - max_chars / 5;

    let cut = window
        .char_indices()
        .filter(|(_, c)| matches!(c, '.' | '!' | '?'))
        .map(|(i, c)| i + c.len_utf8())
        .filter(|&end| {
            window[..end].chars().count() >= boundary_floor
                && window[end..].chars().next().map_or(true, char::is_whitespace)
        })
        .last();

    match cut {
        Some(end) => window[..end].to_string(),
        None => window,
    }
}
