/// Scores a plan or execution text into a `[0,1]` confidence value.
///
/// The weights baked into [`HeuristicConfidence`] are policy, not
/// mechanism — callers needing a different scoring strategy implement this
/// trait rather than editing the default.
pub trait ConfidenceScorer: Send + Sync {
    fn score_plan(&self, plan_text: &str) -> f64;
    fn score_execution(&self, execution_text: &str, tool_call_count: usize) -> f64;
}

/// Default scorer: presence-of-signal heuristics, each worth an equal share
/// of the total.
pub struct HeuristicConfidence;

const ERROR_KEYWORDS: &[&str] = &["error", "failed", "exception", "unable to", "cannot"];
const ORDERING_TOKENS: &[&str] = &["first", "then", "next", "finally", "after"];

impl ConfidenceScorer for HeuristicConfidence {
    fn score_plan(&self, plan_text: &str) -> f64 {
        let has_enumeration = plan_text
            .lines()
            .any(|line| line.trim_start().starts_with(|c: char| c.is_ascii_digit()));
        let has_length = plan_text.len() > 100;
        let has_ordering = ORDERING_TOKENS
            .iter()
            .any(|token| plan_text.to_ascii_lowercase().contains(token));

        let hits = [has_enumeration, has_length, has_ordering]
            .iter()
            .filter(|signal| **signal)
            .count();
        hits as f64 / 3.0
    }

    fn score_execution(&self, execution_text: &str, tool_call_count: usize) -> f64 {
        let lower = execution_text.to_ascii_lowercase();
        let has_length = execution_text.len() > 50;
        let has_tool_calls = tool_call_count > 0;
        let has_no_errors = !ERROR_KEYWORDS.iter().any(|keyword| lower.contains(keyword));

        let hits = [has_length, has_tool_calls, has_no_errors]
            .iter()
            .filter(|signal| **signal)
            .count();
        hits as f64 / 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_with_all_signals_scores_one() {
        let scorer = HeuristicConfidence;
        let plan = "1. First do X\n2. Then do Y\n3. Finally do Z with enough words to pass the length check easily";
        assert_eq!(scorer.score_plan(plan), 1.0);
    }

    #[test]
    fn plan_with_no_signals_scores_zero() {
        let scorer = HeuristicConfidence;
        assert_eq!(scorer.score_plan("no"), 0.0);
    }

    #[test]
    fn execution_with_error_keyword_loses_a_point() {
        let scorer = HeuristicConfidence;
        let text = "operation failed unexpectedly but here is some padding to reach the length threshold";
        let score = scorer.score_execution(text, 1);
        assert!(score < 1.0);
    }

    #[test]
    fn execution_clean_with_tool_calls_scores_one() {
        let scorer = HeuristicConfidence;
        let text = "the result was computed successfully with plenty of detail to pad the length out";
        assert_eq!(scorer.score_execution(text, 2), 1.0);
    }
}
