//! Context Engine defaults and the keyword-extraction stopword list.

/// Default `ContextOptions::max_chunks`.
pub const DEFAULT_MAX_CHUNKS: usize = 10;
/// Default `ContextOptions::max_depth` for graph expansion.
pub const DEFAULT_MAX_DEPTH: usize = 2;
/// Default `ContextOptions::min_score` for vector search filtering.
pub const DEFAULT_MIN_SCORE: f32 = 0.5;
/// `maxGraphResults` when vector search already returned at least this many hits.
pub const VECTOR_HIT_THRESHOLD_FOR_LOW_GRAPH_BUDGET: usize = 5;
/// `maxGraphResults` used when the vector phase returned few hits.
pub const GRAPH_RESULTS_HIGH_BUDGET: usize = 15;
/// `maxGraphResults` used when the vector phase already returned enough hits.
pub const GRAPH_RESULTS_LOW_BUDGET: usize = 5;
/// Number of keywords used to drive the graph keyword phase.
pub const TOP_KEYWORDS: usize = 3;
/// Per-keyword limit on file-path matches.
pub const FILES_PER_KEYWORD_LIMIT: usize = 5;
/// Number of top-scoring symbols expanded via caller/callee lookups.
pub const EXPANSION_CANDIDATES: usize = 5;
/// Max callers/callees fetched per expansion candidate.
pub const EXPANSION_FANOUT: usize = 3;
/// Fraction of `tokenLimit` below which caller expansion is still allowed.
pub const EXPANSION_BUDGET_FRACTION: f64 = 0.8;
/// Fraction of `tokenLimit` localization greedily packs up to.
pub const LOCALIZATION_BUDGET_FRACTION: f64 = 0.9;
/// Characters-per-token estimate (`chars/4`, rounded up).
pub const CHARS_PER_TOKEN: usize = 4;
/// Flat token cost charged per rendered relationship line.
pub const RELATIONSHIP_TOKEN_CHARS: usize = 50;
/// Weight of vector/keyword relevance in the localization combined score.
pub const COMBINED_SCORE_RELEVANCE_WEIGHT: f64 = 0.7;
/// Weight of graph centrality in the localization combined score.
pub const COMBINED_SCORE_CENTRALITY_WEIGHT: f64 = 0.3;
/// Divisor in the `log1p(degree)/10` centrality formula.
pub const CENTRALITY_LOG_SCALE: f64 = 10.0;

/// Closed stopword list: common English function words plus generic coding
/// verbs, stripped before keyword extraction from a query.
pub const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "else", "for", "of", "to", "in", "on",
    "at", "by", "with", "from", "into", "is", "are", "was", "were", "be", "been", "being", "this",
    "that", "these", "those", "it", "its", "as", "so", "not", "no", "do", "does", "did", "can",
    "could", "should", "would", "will", "shall", "may", "might", "must", "i", "you", "he", "she",
    "we", "they", "what", "which", "who", "how", "why", "when", "where", "please", "help", "me",
    "my", "our", "your",
    // generic coding verbs
    "make", "write", "create", "add", "update", "change", "fix", "implement", "refactor", "show",
    "find", "get", "use", "need", "want", "look",
];
