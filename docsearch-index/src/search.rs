//! Query engine
//!
//! Scores documents by boosted term frequency: for every text field, the
//! occurrences of each distinct query term are summed, multiplied by the
//! field's boost, and added to the document total. Only documents scoring
//! above zero are returned.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::document::{DocId, Document};
use crate::error::Result;
use crate::index::DocumentIndex;
use crate::tokenizer::tokenize;

/// Boost applied to text fields without an explicit weight.
pub const DEFAULT_BOOST: f32 = 1.0;

/// Result count used when none is requested.
pub const DEFAULT_LIMIT: usize = 5;

/// Search configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Per-field boost weights (missing fields use [`DEFAULT_BOOST`])
    pub boosts: HashMap<String, f32>,
    /// Exact-match keyword filters, all of which must hold
    pub filters: Vec<(String, String)>,
    /// Maximum results to return
    pub limit: usize,
}

impl SearchOptions {
    /// Create default search options.
    pub fn new() -> Self {
        Self {
            boosts: HashMap::new(),
            filters: Vec::new(),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Set the limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the boost for one field.
    pub fn with_boost(mut self, field: impl Into<String>, boost: f32) -> Self {
        self.boosts.insert(field.into(), boost);
        self
    }

    /// Set boosts for several fields.
    pub fn with_boosts<I, S>(mut self, boosts: I) -> Self
    where
        I: IntoIterator<Item = (S, f32)>,
        S: Into<String>,
    {
        self.boosts
            .extend(boosts.into_iter().map(|(f, b)| (f.into(), b)));
        self
    }

    /// Require a keyword field to hold exactly `value`.
    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    fn boost(&self, field: &str) -> f32 {
        self.boosts.get(field).copied().unwrap_or(DEFAULT_BOOST)
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A ranked search result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'a> {
    /// Position of the document in the index
    pub doc_id: DocId,
    /// Relevance score
    pub score: f32,
    /// The matching document
    pub document: &'a Document,
}

impl DocumentIndex {
    /// Search the index.
    ///
    /// Returns at most `options.limit` hits (a limit of zero is treated as
    /// one), sorted by descending score. Equal scores keep insertion order.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit<'_>>> {
        let allowed = self.filter_candidates(&options.filters)?;

        let terms: BTreeSet<String> = tokenize(query).into_iter().collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let scores = self.score(&terms, options);

        let mut hits: Vec<SearchHit<'_>> = scores
            .into_iter()
            .enumerate()
            .filter(|(doc_id, score)| {
                *score > 0.0 && allowed.as_ref().map_or(true, |a| a.contains(doc_id))
            })
            .map(|(doc_id, score)| SearchHit {
                doc_id,
                score,
                document: &self.documents()[doc_id],
            })
            .collect();

        // sort_by is stable, so ties stay in insertion order
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(options.limit.max(1));

        log::debug!("Query {:?} matched {} documents", query, hits.len());
        Ok(hits)
    }

    /// Total score per document, indexed by `DocId`.
    fn score(&self, terms: &BTreeSet<String>, options: &SearchOptions) -> Vec<f32> {
        let mut scores = vec![0.0f32; self.document_count()];
        let mut raw = vec![0u32; self.document_count()];

        for (field_name, field) in self.config().text_fields.iter().zip(&self.fields) {
            raw.iter_mut().for_each(|r| *r = 0);

            for term in terms {
                if let Some(postings) = field.postings.get(term) {
                    for posting in postings {
                        raw[posting.doc_id] += posting.term_frequency;
                    }
                }
            }

            let boost = options.boost(field_name);
            for (score, &count) in scores.iter_mut().zip(&raw) {
                if count > 0 {
                    *score += count as f32 * boost;
                }
            }
        }

        scores
    }

    /// Intersect the keyword filters; `None` means no filtering.
    fn filter_candidates(&self, filters: &[(String, String)]) -> Result<Option<BTreeSet<DocId>>> {
        let mut allowed: Option<BTreeSet<DocId>> = None;

        for (field, value) in filters {
            let matching: BTreeSet<DocId> =
                self.keyword_matches(field, value)?.iter().copied().collect();
            allowed = Some(match allowed {
                Some(current) => current.intersection(&matching).copied().collect(),
                None => matching,
            });
        }

        Ok(allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexConfig;
    use crate::IndexError;

    fn install_corpus() -> DocumentIndex {
        DocumentIndex::fit(
            IndexConfig::new(["content", "filename"]),
            vec![
                Document::new("a.md", "install guide"),
                Document::new("b.md", "install install tool"),
            ],
        )
        .unwrap()
    }

    fn filenames<'a>(hits: &[SearchHit<'a>]) -> Vec<&'a str> {
        hits.iter().map(|h| h.document.filename.as_str()).collect()
    }

    // ============================================
    // Ranking Tests
    // ============================================

    #[test]
    fn test_term_frequency_ranking() {
        let index = install_corpus();
        let hits = index.search("install", &SearchOptions::new()).unwrap();

        assert_eq!(filenames(&hits), vec!["b.md", "a.md"]);
        assert_eq!(hits[0].score, 2.0);
        assert_eq!(hits[1].score, 1.0);
    }

    #[test]
    fn test_search_case_insensitive() {
        let index = install_corpus();
        let hits = index.search("INSTALL", &SearchOptions::new()).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_multi_term_query_sums_terms() {
        let index = install_corpus();
        let hits = index.search("install guide", &SearchOptions::new()).unwrap();

        // a.md: install(1) + guide(1); b.md: install(2)
        assert_eq!(hits[0].score, 2.0);
        assert_eq!(hits[1].score, 2.0);
        assert_eq!(filenames(&hits), vec!["a.md", "b.md"]);
    }

    #[test]
    fn test_repeated_query_terms_count_once() {
        let index = install_corpus();
        let single = index.search("install", &SearchOptions::new()).unwrap();
        let repeated = index.search("install install", &SearchOptions::new()).unwrap();

        assert_eq!(single[0].score, repeated[0].score);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let index = DocumentIndex::fit(
            IndexConfig::new(["content"]),
            (0..6).map(|i| Document::new(format!("doc{i}.md"), "same words")),
        )
        .unwrap();

        let hits = index.search("same", &SearchOptions::new().with_limit(10)).unwrap();
        let ids: Vec<DocId> = hits.iter().map(|h| h.doc_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_filename_field_is_scored() {
        let index = DocumentIndex::fit(
            IndexConfig::new(["content", "filename"]),
            vec![
                Document::new("docs/intro.md", "welcome"),
                Document::new("docs/installation.md", "steps"),
            ],
        )
        .unwrap();

        let hits = index.search("installation", &SearchOptions::new()).unwrap();
        assert_eq!(filenames(&hits), vec!["docs/installation.md"]);
    }

    // ============================================
    // Boost Tests
    // ============================================

    #[test]
    fn test_boost_is_linear() {
        let index = DocumentIndex::fit(
            IndexConfig::new(["content", "filename"]),
            vec![Document::new("tool.md", "tool tool tool")],
        )
        .unwrap();

        let base = index.search("tool", &SearchOptions::new()).unwrap();
        let doubled = index
            .search("tool", &SearchOptions::new().with_boost("content", 2.0))
            .unwrap();

        // content contributes 3 -> 6, filename stays 1
        assert_eq!(base[0].score, 4.0);
        assert_eq!(doubled[0].score, 7.0);
    }

    #[test]
    fn test_boost_changes_ranking() {
        let index = DocumentIndex::fit(
            IndexConfig::new(["content", "filename"]),
            vec![
                Document::new("guide.md", "server server server"),
                Document::new("server.md", "overview"),
            ],
        )
        .unwrap();

        let plain = index.search("server", &SearchOptions::new()).unwrap();
        assert_eq!(filenames(&plain), vec!["guide.md", "server.md"]);

        let boosted = index
            .search("server", &SearchOptions::new().with_boost("filename", 5.0))
            .unwrap();
        assert_eq!(filenames(&boosted), vec!["server.md", "guide.md"]);
    }

    #[test]
    fn test_negative_boost_excludes_documents() {
        let index = install_corpus();
        let hits = index
            .search(
                "install",
                &SearchOptions::new().with_boosts([("content", -1.0), ("filename", 1.0)]),
            )
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_boost_for_undeclared_field_ignored() {
        let index = install_corpus();
        let hits = index
            .search("install", &SearchOptions::new().with_boost("title", 100.0))
            .unwrap();
        assert_eq!(hits[0].score, 2.0);
    }

    // ============================================
    // Limit Tests
    // ============================================

    #[test]
    fn test_limit_truncates() {
        let index = DocumentIndex::fit(
            IndexConfig::new(["content"]),
            (0..20).map(|i| Document::new(format!("{i}.md"), "test")),
        )
        .unwrap();

        let hits = index.search("test", &SearchOptions::new().with_limit(3)).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_large_limit_capped_by_matches() {
        let index = install_corpus();
        let hits = index.search("install", &SearchOptions::new().with_limit(50)).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_zero_limit_clamped_to_one() {
        let index = install_corpus();
        let hits = index.search("install", &SearchOptions::new().with_limit(0)).unwrap();
        assert_eq!(filenames(&hits), vec!["b.md"]);
    }

    // ============================================
    // Empty / No-Match Tests
    // ============================================

    #[test]
    fn test_empty_query() {
        let index = install_corpus();
        assert!(index.search("", &SearchOptions::new()).unwrap().is_empty());
        assert!(index.search(" ?! ", &SearchOptions::new()).unwrap().is_empty());
    }

    #[test]
    fn test_no_match() {
        let index = install_corpus();
        assert!(index.search("database", &SearchOptions::new()).unwrap().is_empty());
    }

    #[test]
    fn test_document_without_text_content() {
        let index = DocumentIndex::fit(
            IndexConfig::new(["content"]),
            vec![Document::new("empty.md", ""), Document::new("full.md", "data")],
        )
        .unwrap();

        let hits = index.search("data", &SearchOptions::new()).unwrap();
        assert_eq!(filenames(&hits), vec!["full.md"]);
    }

    #[test]
    fn test_reflexive_single_token() {
        let mut docs: Vec<Document> = (0..10)
            .map(|i| Document::new(format!("{i}.md"), format!("unrelated text {i}")))
            .collect();
        docs.push(Document::new("target.md", "needle"));

        let index = DocumentIndex::fit(IndexConfig::new(["content"]), docs).unwrap();
        let hits = index.search("needle", &SearchOptions::new()).unwrap();
        assert_eq!(hits[0].document.filename, "target.md");
    }

    #[test]
    fn test_idempotent_fit_and_search() {
        let docs = vec![
            Document::new("x.md", "alpha beta"),
            Document::new("y.md", "beta beta gamma"),
            Document::new("z.md", "alpha gamma gamma"),
        ];
        let first = DocumentIndex::fit(IndexConfig::new(["content"]), docs.clone()).unwrap();
        let second = DocumentIndex::fit(IndexConfig::new(["content"]), docs).unwrap();

        let options = SearchOptions::new().with_limit(10);
        let a: Vec<(DocId, f32)> = first
            .search("alpha gamma", &options)
            .unwrap()
            .iter()
            .map(|h| (h.doc_id, h.score))
            .collect();
        let b: Vec<(DocId, f32)> = second
            .search("alpha gamma", &options)
            .unwrap()
            .iter()
            .map(|h| (h.doc_id, h.score))
            .collect();
        let again: Vec<(DocId, f32)> = second
            .search("alpha gamma", &options)
            .unwrap()
            .iter()
            .map(|h| (h.doc_id, h.score))
            .collect();

        assert_eq!(a, b);
        assert_eq!(b, again);
    }

    #[test]
    fn test_result_count_never_exceeds_limit_or_corpus() {
        let index = DocumentIndex::fit(
            IndexConfig::new(["content"]),
            (0..7).map(|i| Document::new(format!("{i}.md"), "word ".repeat(i + 1))),
        )
        .unwrap();

        for limit in [1, 3, 7, 8, 100] {
            let hits = index
                .search("word", &SearchOptions::new().with_limit(limit))
                .unwrap();
            assert!(hits.len() <= limit.min(index.document_count()));
        }
    }

    // ============================================
    // Keyword Filter Tests
    // ============================================

    fn sectioned_index() -> DocumentIndex {
        DocumentIndex::fit(
            IndexConfig::new(["content"]).with_keyword_fields(["section", "lang"]),
            vec![
                Document::new("a.md", "deploy server")
                    .with_field("section", "ops")
                    .with_field("lang", "en"),
                Document::new("b.md", "deploy deploy client")
                    .with_field("section", "dev")
                    .with_field("lang", "en"),
                Document::new("c.md", "deploy").with_field("section", "ops"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_keyword_filter() {
        let index = sectioned_index();
        let hits = index
            .search("deploy", &SearchOptions::new().with_filter("section", "ops"))
            .unwrap();
        assert_eq!(filenames(&hits), vec!["a.md", "c.md"]);
    }

    #[test]
    fn test_keyword_filters_intersect() {
        let index = sectioned_index();
        let hits = index
            .search(
                "deploy",
                &SearchOptions::new()
                    .with_filter("section", "ops")
                    .with_filter("lang", "en"),
            )
            .unwrap();
        assert_eq!(filenames(&hits), vec!["a.md"]);
    }

    #[test]
    fn test_unknown_keyword_filter() {
        let index = sectioned_index();
        let result = index.search("deploy", &SearchOptions::new().with_filter("author", "x"));
        assert!(matches!(result, Err(IndexError::UnknownKeywordField(_))));
    }
}
