//! MCP Tool Definitions
//!
//! Schemas for the four docsearch tools. Execution lives in `server.rs`.

use super::protocol::{PropertySchema, Tool, ToolInputSchema};
use crate::config::{DEFAULT_NUM_RESULTS, MAX_NUM_RESULTS};
use std::collections::BTreeMap;

pub const ADD: &str = "add";
pub const GET_PAGE_MARKDOWN: &str = "get_page_markdown";
pub const COUNT_WORD_IN_PAGE: &str = "count_word_in_page";
pub const SEARCH_DOCUMENTATION: &str = "search_documentation";

/// Get all available tools
pub fn get_all_tools() -> Vec<Tool> {
    vec![
        add_tool(),
        get_page_markdown_tool(),
        count_word_in_page_tool(),
        search_documentation_tool(),
    ]
}

fn string_prop(description: &str) -> PropertySchema {
    PropertySchema {
        property_type: "string".to_string(),
        description: Some(description.to_string()),
        default: None,
        minimum: None,
        maximum: None,
    }
}

fn integer_prop(description: &str) -> PropertySchema {
    PropertySchema {
        property_type: "integer".to_string(),
        description: Some(description.to_string()),
        default: None,
        minimum: None,
        maximum: None,
    }
}

fn object_schema(properties: BTreeMap<String, PropertySchema>, required: &[&str]) -> ToolInputSchema {
    ToolInputSchema {
        schema_type: "object".to_string(),
        properties,
        required: required.iter().map(|r| r.to_string()).collect(),
    }
}

fn add_tool() -> Tool {
    let mut properties = BTreeMap::new();
    properties.insert("a".to_string(), integer_prop("First addend"));
    properties.insert("b".to_string(), integer_prop("Second addend"));

    Tool {
        name: ADD.to_string(),
        description: Some("Add two numbers".to_string()),
        input_schema: object_schema(properties, &["a", "b"]),
    }
}

fn get_page_markdown_tool() -> Tool {
    let mut properties = BTreeMap::new();
    properties.insert(
        "url".to_string(),
        string_prop("The URL of the webpage to fetch (e.g., https://datatalks.club)"),
    );

    Tool {
        name: GET_PAGE_MARKDOWN.to_string(),
        description: Some(
            "Get content of any webpage in markdown format using a reader proxy.".to_string(),
        ),
        input_schema: object_schema(properties, &["url"]),
    }
}

fn count_word_in_page_tool() -> Tool {
    let mut properties = BTreeMap::new();
    properties.insert(
        "url".to_string(),
        string_prop("The URL of the webpage to analyze (e.g., https://datatalks.club)"),
    );
    properties.insert(
        "word".to_string(),
        string_prop("The word to count (case-insensitive, whole words only)"),
    );

    Tool {
        name: COUNT_WORD_IN_PAGE.to_string(),
        description: Some(
            "Count how many times a specific word appears on a webpage.".to_string(),
        ),
        input_schema: object_schema(properties, &["url", "word"]),
    }
}

fn search_documentation_tool() -> Tool {
    let mut properties = BTreeMap::new();
    properties.insert(
        "query".to_string(),
        string_prop("The search query (e.g., \"how to create a tool\", \"installation\")"),
    );
    properties.insert(
        "num_results".to_string(),
        PropertySchema {
            default: Some(serde_json::json!(DEFAULT_NUM_RESULTS)),
            minimum: Some(1.0),
            maximum: Some(MAX_NUM_RESULTS as f64),
            ..integer_prop("Number of results to return")
        },
    );

    Tool {
        name: SEARCH_DOCUMENTATION.to_string(),
        description: Some(
            "Search the bundled documentation. Returns matching filenames with content previews."
                .to_string(),
        ),
        input_schema: object_schema(properties, &["query"]),
    }
}
