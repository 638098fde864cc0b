//! Perplexity Search provider

use serde::Serialize;
use serde_json::Value;

/// Perplexity search endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.perplexity.ai/search";

/// Built-in environment variable holding the API key
pub const API_KEY_ENV: &str = "PERPLEXITY_API_KEY";

/// API request structure
#[derive(Serialize, Debug)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub max_results: i64,
}

const HEADER: &str = "Perplexity Search Results\n------------------------------\n";

/// Render a search response as readable text, keeping at most `limit`
/// results when `limit` is positive.
///
/// Malformed bodies produce a visible placeholder instead of an error.
pub fn format_results(body: &[u8], limit: i64) -> String {
    let root: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Search response is not JSON: {}", e);
            return "Failed to parse JSON response\n".to_string();
        }
    };
    let Some(results) = root.get("results").and_then(Value::as_array) else {
        return "No 'results' array in response\n".to_string();
    };

    let take = usize::try_from(limit).ok().filter(|n| *n > 0).unwrap_or(usize::MAX);
    let mut out = String::from(HEADER);
    let mut count = 0;
    for item in results.iter().take(take) {
        count += 1;
        out.push_str(&format!("Result {}\n", count));
        for (label, key) in [("Title", "title"), ("URL", "url"), ("Snippet", "snippet")] {
            if let Some(text) = item.get(key).and_then(Value::as_str) {
                out.push_str(&format!("  {}: {}\n", label, text));
            }
        }
        out.push('\n');
    }
    if count == 0 {
        out.push_str("No results returned\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_escapes_query() {
        let body = serde_json::to_value(SearchRequest { query: "say \"hi\"", max_results: 2 }).unwrap();
        assert_eq!(body, json!({"query": "say \"hi\"", "max_results": 2}));
    }

    #[test]
    fn test_format_results_respects_limit() {
        let body = json!({"results": [
            {"title": "One", "url": "https://one", "snippet": "first"},
            {"title": "Two", "url": "https://two"},
            {"title": "Three"}
        ]})
        .to_string();
        let text = format_results(body.as_bytes(), 2);
        assert_eq!(
            text,
            "Perplexity Search Results\n------------------------------\n\
             Result 1\n  Title: One\n  URL: https://one\n  Snippet: first\n\n\
             Result 2\n  Title: Two\n  URL: https://two\n\n"
        );
    }

    #[test]
    fn test_format_results_placeholders() {
        assert_eq!(format_results(b"<html>", 3), "Failed to parse JSON response\n");
        assert_eq!(format_results(b"{\"data\":[]}", 3), "No 'results' array in response\n");
        assert!(format_results(b"{\"results\":[]}", 3).ends_with("No results returned\n"));
    }

    #[test]
    fn test_non_positive_limit_keeps_everything() {
        let body = json!({"results": [{"title": "a"}, {"title": "b"}]}).to_string();
        assert!(format_results(body.as_bytes(), 0).contains("Result 2\n"));
    }
}
