//! Similarity scanning against known material.
//!
//! Three bounded sub-scores feed the combiner in `skillforge-core`:
//! structural fingerprint overlap with a reference corpus, suspicious
//! authorship patterns, and semantic token overlap. All of it is a
//! deterministic function of the submission text.

use std::collections::HashSet;

use async_trait::async_trait;

use skillforge_core::plagiarism::{
    combine_similarity, PlagiarismMatch, PlagiarismResult, SimilaritySignals, METHOD_MULTI_FACTOR,
};
use skillforge_core::traits::{PlagiarismDetector, ScanRequest};

/// Reference material the scanner compares against. Stands in for the
/// prior-submission database a production deployment would query.
const CORPUS: &[(&str, &str)] = &[
    (
        "starter-rest-controller",
        r#"
public class GreetingController {
    // initialize the counters before the main loop
    private int requestCount = 0;

    public String greet() {
        requestCount = requestCount + 1;
        if (requestCount > 100) {
            return "busy";
        }
        return "Hello World";
    }
}
"#,
    ),
    (
        "bubble-sort-tutorial",
        r#"
public class Sorter {
    public void sort(int[] arr) {
        // classic bubble sort from the tutorial
        for (int i = 0; i < arr.length; i++) {
            for (int j = 0; j < arr.length - i - 1; j++) {
                if (arr[j] > arr[j + 1]) {
                    int temp = arr[j];
                    arr[j] = arr[j + 1];
                    arr[j + 1] = temp;
                }
            }
        }
    }
}
"#,
    ),
];

/// Deterministic plagiarism scanner.
#[derive(Debug, Default)]
pub struct SimilarityScanner;

impl SimilarityScanner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PlagiarismDetector for SimilarityScanner {
    fn name(&self) -> &str {
        "similarity"
    }

    async fn scan(&self, request: &ScanRequest) -> anyhow::Result<PlagiarismResult> {
        let code = request.code.as_str();
        if code.trim().is_empty() {
            return Ok(PlagiarismResult::no_code());
        }

        let (structural, best_source) = structural_similarity(code);
        let signals = SimilaritySignals {
            structural,
            pattern: pattern_similarity(code),
            semantic: semantic_similarity(code),
        };
        let similarity = combine_similarity(signals);
        let detected = similarity > request.threshold;

        let matches = if detected {
            vec![locate_match(code, best_source, similarity)]
        } else {
            Vec::new()
        };

        if detected {
            tracing::info!(
                submission = %request.submission_id,
                similarity,
                source = best_source,
                "plagiarism flagged"
            );
        }

        Ok(PlagiarismResult {
            similarity,
            detected,
            method: METHOD_MULTI_FACTOR.to_string(),
            matches,
        })
    }
}

/// Tag sequence summarizing a file's control structure.
fn fingerprint(code: &str) -> Vec<&'static str> {
    let mut tags = Vec::new();
    for line in code.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("class ") || trimmed.contains(" class ") {
            tags.push("CLASS");
        } else if trimmed.starts_with("fn ")
            || trimmed.starts_with("def ")
            || trimmed.starts_with("public ")
            || trimmed.starts_with("private ")
        {
            tags.push("FN");
        } else if trimmed.contains("if ") || trimmed.contains("if(") {
            tags.push("IF");
        } else if trimmed.contains("for ") || trimmed.contains("for(") {
            tags.push("FOR");
        } else if trimmed.contains("while ") || trimmed.contains("while(") {
            tags.push("WHILE");
        } else if trimmed.starts_with("return") {
            tags.push("RET");
        }
    }
    tags
}

type Trigram = (&'static str, &'static str, &'static str);

fn trigrams(tags: &[&'static str]) -> HashSet<Trigram> {
    tags.windows(3).map(|w| (w[0], w[1], w[2])).collect()
}

fn jaccard(a: &HashSet<Trigram>, b: &HashSet<Trigram>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    intersection / union
}

/// Best structural overlap with the corpus, scaled so its weighted
/// contribution to the total similarity never exceeds 0.40.
fn structural_similarity(code: &str) -> (f64, &'static str) {
    let submission = fingerprint(code);
    let submission_grams = trigrams(&submission);

    let mut best = 0.0;
    let mut best_source = CORPUS[0].0;
    for &(name, sample) in CORPUS {
        let sample_tags = fingerprint(sample);
        let score = jaccard(&submission_grams, &trigrams(&sample_tags));
        if score > best {
            best = score;
            best_source = name;
        }
    }

    (best * 0.8, best_source)
}

/// Suspicious authorship patterns, each contributing a fixed increment.
fn pattern_similarity(code: &str) -> f64 {
    let mut score = 0.0;

    if code.contains("temp123") || code.contains("myVar") || code.contains("variable1") {
        score += 0.2;
    }
    if code.contains("copied from") || code.contains("source:") {
        score += 0.3;
    }
    let has_tab_indent = code.lines().any(|l| l.starts_with('\t'));
    let has_space_indent = code.lines().any(|l| l.starts_with("    "));
    if has_tab_indent && has_space_indent {
        score += 0.2;
    }
    if code.contains("for (int i = 0; i < arr.length; i++)")
        || code.contains("while (condition == true)")
    {
        score += 0.3;
    }

    score.min(1.0)
}

fn comment_lines(code: &str) -> Vec<&str> {
    code.lines()
        .map(str::trim)
        .filter(|l| l.starts_with("//") || l.starts_with('#'))
        .collect()
}

fn string_literals(code: &str) -> Vec<&str> {
    let mut literals = Vec::new();
    let mut rest = code;
    while let Some(start) = rest.find('"') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('"') else { break };
        literals.push(&after[..end]);
        rest = &after[end + 1..];
    }
    literals
}

/// Overlap in identifiers, comments, and string literals.
fn semantic_similarity(code: &str) -> f64 {
    let mut score = 0.0;

    let tokens: HashSet<&str> = code
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.contains("temp") || tokens.contains("result") || tokens.contains("data") {
        score += 0.3;
    }

    let corpus_comments: HashSet<&str> = CORPUS
        .iter()
        .flat_map(|(_, sample)| comment_lines(sample))
        .collect();
    if comment_lines(code)
        .iter()
        .any(|c| c.len() > 10 && corpus_comments.contains(c))
    {
        score += 0.4;
    }

    if string_literals(code).iter().any(|s| {
        let lower = s.to_lowercase();
        lower == "hello world" || lower == "test message" || lower == "lorem ipsum"
    }) {
        score += 0.3;
    }

    score.min(1.0)
}

/// Locate the matching region: the span of lines shared verbatim with the
/// best corpus source, or the whole file when no line matches exactly.
fn locate_match(code: &str, source: &str, similarity: f64) -> PlagiarismMatch {
    let sample = CORPUS
        .iter()
        .find(|(name, _)| *name == source)
        .map(|(_, sample)| *sample)
        .unwrap_or_default();
    let sample_lines: HashSet<&str> = sample
        .lines()
        .map(str::trim)
        .filter(|l| l.len() >= 10)
        .collect();

    let mut first = None;
    let mut last = 0;
    for (idx, line) in code.lines().enumerate() {
        if sample_lines.contains(line.trim()) {
            first.get_or_insert(idx + 1);
            last = idx + 1;
        }
    }

    let line_count = code.lines().count().max(1) as u32;
    PlagiarismMatch {
        source_ref: source.to_string(),
        start_line: first.unwrap_or(1) as u32,
        end_line: if last > 0 { last as u32 } else { line_count },
        similarity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(code: &str, threshold: f64) -> ScanRequest {
        ScanRequest {
            submission_id: "sub-test".into(),
            code: code.into(),
            threshold,
        }
    }

    #[tokio::test]
    async fn empty_code_short_circuits() {
        let scanner = SimilarityScanner::new();
        let result = scanner.scan(&request("", 0.75)).await.unwrap();
        assert_eq!(result.similarity, 0.0);
        assert!(!result.detected);
        assert_eq!(result.method, "NO_CODE");
        assert!(result.matches.is_empty());
    }

    #[tokio::test]
    async fn original_work_scores_low() {
        let scanner = SimilarityScanner::new();
        let code = r#"
fn shortest_route(graph: &Graph, origin: NodeId) -> Distances {
    let mut frontier = BinaryHeap::new();
    frontier.push(Visit { node: origin, cost: 0 });
    let mut distances = Distances::new();
    while let Some(visit) = frontier.pop() {
        for edge in graph.edges(visit.node) {
            frontier.push(Visit { node: edge.to, cost: visit.cost + edge.weight });
        }
    }
    distances
}
"#;
        let result = scanner.scan(&request(code, 0.75)).await.unwrap();
        assert!(!result.detected, "similarity was {}", result.similarity);
        assert_eq!(result.method, METHOD_MULTI_FACTOR);
    }

    /// A near-verbatim corpus copy dressed up with every suspicious
    /// pattern the scanner knows about.
    fn blatant_copy() -> String {
        let mut code = CORPUS[1].1.to_string();
        code.push_str("// copied from stackoverflow, source: tutorial\n");
        code.push_str("\tint temp123 = 0;\n");
        code.push_str("    int result = temp;\n");
        code.push_str("while (condition == true) { }\n");
        code.push_str("// classic bubble sort from the tutorial\n");
        code.push_str("String greeting = \"Hello World\";\n");
        code
    }

    #[tokio::test]
    async fn blatant_copy_is_detected_with_matches() {
        let scanner = SimilarityScanner::new();
        let result = scanner.scan(&request(&blatant_copy(), 0.75)).await.unwrap();
        assert!(
            result.detected,
            "expected detection, similarity {}",
            result.similarity
        );
        assert!(!result.matches.is_empty());
        let m = &result.matches[0];
        assert_eq!(m.source_ref, "bubble-sort-tutorial");
        assert!(m.start_line >= 1);
        assert!(m.end_line >= m.start_line);
    }

    #[tokio::test]
    async fn threshold_controls_the_verdict() {
        let scanner = SimilarityScanner::new();
        let code = blatant_copy();

        let strict = scanner.scan(&request(&code, 0.99)).await.unwrap();
        assert!(!strict.detected);

        let lax = scanner.scan(&request(&code, 0.10)).await.unwrap();
        assert!(lax.detected);
    }

    #[tokio::test]
    async fn scan_is_deterministic() {
        let scanner = SimilarityScanner::new();
        let code = blatant_copy();
        let a = scanner.scan(&request(&code, 0.75)).await.unwrap();
        let b = scanner.scan(&request(&code, 0.75)).await.unwrap();
        assert_eq!(a.similarity, b.similarity);
        assert_eq!(a.detected, b.detected);
    }

    #[test]
    fn similarity_stays_in_unit_interval() {
        let code = blatant_copy();
        let signals = SimilaritySignals {
            structural: structural_similarity(&code).0,
            pattern: pattern_similarity(&code),
            semantic: semantic_similarity(&code),
        };
        let total = combine_similarity(signals);
        assert!((0.0..=1.0).contains(&total));
    }
}
