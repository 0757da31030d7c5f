//! Plain-text rendering of tool results.

use docsearch_index::{SearchHit, WordMatch};

/// Render search hits as a numbered list with content previews.
pub fn format_search_results(query: &str, hits: &[SearchHit<'_>], preview_chars: usize) -> String {
    if hits.is_empty() {
        return format!("No results found for query: '{query}'");
    }

    let mut output = vec![format!("Found {} results for '{}':\n", hits.len(), query)];
    for (i, hit) in hits.iter().enumerate() {
        output.push(format!("{}. {}", i + 1, hit.document.filename));
        output.push(format!(
            "   {}\n",
            preview(&hit.document.content, preview_chars)
        ));
    }
    output.join("\n")
}

/// First `max_chars` characters on one line, with "..." when truncated.
pub fn preview(content: &str, max_chars: usize) -> String {
    let head: String = content.chars().take(max_chars).collect();
    let mut line = head.replace('\n', " ").trim().to_string();
    if content.chars().count() > max_chars {
        line.push_str("...");
    }
    line
}

pub fn format_word_count(word: &str, count: usize, url: &str) -> String {
    format!("The word '{word}' appears {count} times on {url}")
}

/// List every match with `radius` characters of surrounding text.
pub fn format_word_matches(text: &str, word: &str, matches: &[WordMatch], radius: usize) -> String {
    let mut output = vec![format!("Found {} occurrences of '{}':\n", matches.len(), word)];
    for (i, m) in matches.iter().enumerate() {
        output.push(format!("{}. ...{}...\n", i + 1, context(text, m, radius)));
    }
    output.join("\n")
}

/// Text around a match, whitespace collapsed to single spaces.
fn context(text: &str, m: &WordMatch, radius: usize) -> String {
    let start = match radius {
        0 => m.start,
        r => text[..m.start]
            .char_indices()
            .rev()
            .nth(r - 1)
            .map_or(0, |(i, _)| i),
    };
    let end = text[m.end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(i, _)| m.end + i);

    text[start..end].split_whitespace().collect::<Vec<_>>().join(" ")
}
