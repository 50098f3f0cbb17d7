// Term ranking: TF-IDF for single documents, raw frequency for topic groups.
//
// The two call sites want different statistics. Keyword extraction on one
// article needs TF-IDF so that terms spread evenly across a background corpus
// get pushed down. Topic labelling ranks the pooled text of a cluster, where
// plain summed frequency is what describes the group.
//
// Every function here builds its frequency tables from scratch on each call.
// Nothing is cached between calls, so one request can never see terms from
// another.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::TopicError;

/// Tokens shorter than this (in characters) are discarded.
pub const MIN_TOKEN_LEN: usize = 3;

/// Fixed English stop-word list. Function words plus a handful of very
/// common low-content verbs that otherwise crowd out real keywords.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "around", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each",
    "even", "few", "for", "from", "further", "get", "got", "had", "has", "have", "having", "he",
    "her", "here", "hers", "herself", "him", "himself", "his", "how", "into", "is", "it", "its",
    "itself", "just", "like", "made", "make", "many", "may", "more", "most", "much", "must", "my",
    "myself", "new", "nor", "not", "now", "off", "of", "on", "once", "one", "only", "or", "other",
    "our", "ours", "ourselves", "out", "over", "own", "per", "put", "said", "same", "sat", "saw",
    "say", "says", "see", "set", "she", "should", "since", "some", "still", "such", "than",
    "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
    "this", "those", "through", "too", "two", "under", "until", "upon", "very", "was", "way",
    "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// A ranked term and its score. Scores are never negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermScore {
    pub term: String,
    pub score: f64,
}

/// Returns true if `word` (already lowercased) is in the stop-word list.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Unicode `\W+`: combining marks count as word characters, so decomposed
/// accents stay inside their token.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("valid non-word pattern"));

/// Lowercase `text`, split it on runs of non-word characters and drop
/// short tokens and stop words. Token order follows the source text.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_WORD
        .split(&lowered)
        .filter(|token| token.chars().count() >= MIN_TOKEN_LEN && !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Per-call frequency table that remembers when each term was first seen,
/// so equal scores fall back to source order.
#[derive(Default)]
struct TermTable {
    index: HashMap<String, usize>,
    terms: Vec<(String, u64)>,
}

impl TermTable {
    fn add(&mut self, token: String) {
        match self.index.get(&token) {
            Some(&slot) => self.terms[slot].1 += 1,
            None => {
                self.index.insert(token.clone(), self.terms.len());
                self.terms.push((token, 1));
            }
        }
    }

    fn total(&self) -> u64 {
        self.terms.iter().map(|(_, count)| count).sum()
    }
}

/// Sort by descending score. `sort_by` is stable, so ties keep first-seen order.
fn sort_scores(scores: &mut [TermScore]) {
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Score every term in `text` with TF-IDF, where the document set is just
/// the text itself.
pub fn score_document(text: &str) -> Vec<TermScore> {
    score_document_against(text, &[])
}

/// Score every term in `text` with TF-IDF against a background corpus.
///
/// `tf = count / total_tokens` and `idf = ln((1 + N) / (1 + df)) + 1`, where
/// the document set is `text` plus `background` (so N >= 1 and every term of
/// `text` has df >= 1). The smoothed IDF keeps scores strictly positive.
pub fn score_document_against(text: &str, background: &[String]) -> Vec<TermScore> {
    let mut table = TermTable::default();
    for token in tokenize(text) {
        table.add(token);
    }

    let total = table.total();
    if total == 0 {
        return Vec::new();
    }

    let background_sets: Vec<HashSet<String>> = background
        .iter()
        .map(|doc| tokenize(doc).into_iter().collect())
        .collect();
    let n_docs = (background_sets.len() + 1) as f64;

    let mut scores: Vec<TermScore> = table
        .terms
        .into_iter()
        .map(|(term, count)| {
            let df = 1 + background_sets.iter().filter(|set| set.contains(&term)).count();
            let tf = count as f64 / total as f64;
            let idf = ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0;
            TermScore {
                term,
                score: tf * idf,
            }
        })
        .collect();

    sort_scores(&mut scores);
    scores
}

/// Score terms across a group of texts by summed raw frequency.
pub fn score_corpus<S: AsRef<str>>(texts: &[S]) -> Vec<TermScore> {
    let mut table = TermTable::default();
    for text in texts {
        for token in tokenize(text.as_ref()) {
            table.add(token);
        }
    }

    let mut scores: Vec<TermScore> = table
        .terms
        .into_iter()
        .map(|(term, count)| TermScore {
            term,
            score: count as f64,
        })
        .collect();

    sort_scores(&mut scores);
    scores
}

/// Top `top_n` TF-IDF keywords of a single document. The document set is
/// the text alone, so IDF is constant and the order is by term frequency.
pub fn rank_document(text: &str, top_n: usize) -> Vec<String> {
    rank_document_against(text, &[], top_n)
}

/// Top `top_n` TF-IDF keywords of `text`, with `background` documents
/// pushing down terms they share with it.
pub fn rank_document_against(text: &str, background: &[String], top_n: usize) -> Vec<String> {
    score_document_against(text, background)
        .into_iter()
        .take(top_n)
        .map(|s| s.term)
        .collect()
}

/// Every term across `texts`, most frequent first.
pub fn rank_corpus<S: AsRef<str>>(texts: &[S]) -> Vec<String> {
    score_corpus(texts).into_iter().map(|s| s.term).collect()
}

/// Convert untyped JSON entries into texts, rejecting anything that is not
/// a string. This is where malformed ranking input gets caught: once the
/// data is a `&str` it can always be tokenized.
pub fn texts_from_json(values: &[serde_json::Value]) -> Result<Vec<String>, TopicError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            serde_json::Value::String(s) => Ok(s.clone()),
            _ => Err(TopicError::Ranking { index }),
        })
        .collect()
}
