//! Phase 5 — constrained selection: threshold relaxation, a
//! compatibility-aware greedy pass, and a diversity-aware DP pass,
//! grounded on `deepseek_analyzer.py::_select_optimal_clips` /
//! `_dp_optimal_selection` / `_filter_overlapping_clips` / `_text_similarity`.

use std::collections::HashSet;
use std::rc::Rc;

use clipforge_models::HighlightCandidate;

use crate::config::AnalyzerConfig;
use crate::scoring::duration_optimality;

const RELAXED_THRESHOLDS: [f64; 5] = [0.55, 0.5, 0.45, 0.4, 0.35];
const SIMILARITY_OVERLAP_THRESHOLD: f64 = 0.6;
const SIMILARITY_PENALTY_WEIGHT: f64 = 0.15;
const MAX_DIVERSITY_BONUS: f64 = 0.2;

fn final_score(candidate: &HighlightCandidate, config: &AnalyzerConfig) -> f64 {
    candidate.final_score(duration_optimality(candidate.duration(), config))
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| ".,!?;:()\"'".contains(c)).to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Jaccard similarity over lowercased, punctuation-stripped tokens.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    if a.trim().is_empty() || b.trim().is_empty() {
        return 0.0;
    }
    let ta = tokenize(a);
    let tb = tokenize(b);
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let intersection = ta.intersection(&tb).count() as f64;
    let union = ta.union(&tb).count() as f64;
    if union == 0.0 {
        0.0
    } else {
        intersection / union
    }
}

fn overlap_ratio(a: &HighlightCandidate, b: &HighlightCandidate) -> f64 {
    let overlap = (a.end.min(b.end) - a.start.max(b.start)).max(0.0);
    overlap / a.duration().max(b.duration()).max(1e-6)
}

fn compatible(a: &HighlightCandidate, b: &HighlightCandidate, min_separation: f64) -> bool {
    let sim = text_similarity(&a.transcription, &b.transcription);
    let allowed_overlap = if sim >= SIMILARITY_OVERLAP_THRESHOLD { 0.35 } else { 0.5 };
    let ratio = overlap_ratio(a, b);
    let separation_ok = (b.start - a.end) >= min_separation || (a.start - b.end) >= min_separation;
    ratio <= allowed_overlap || separation_ok
}

/// Selects the final clip set: relaxes the viral-score threshold until
/// something clears it, greedily picks non-conflicting high scorers, then
/// compares against a diversity-aware DP pass and keeps whichever sums
/// higher.
pub fn select_optimal(candidates: Vec<HighlightCandidate>, config: &AnalyzerConfig) -> Vec<HighlightCandidate> {
    if candidates.is_empty() {
        return candidates;
    }
    if candidates.len() == 1 {
        return candidates;
    }

    let mut filtered: Vec<HighlightCandidate> = candidates
        .iter()
        .cloned()
        .filter(|c| final_score(c, config) >= config.viral_score_threshold)
        .collect();

    if filtered.is_empty() {
        for threshold in RELAXED_THRESHOLDS {
            filtered = candidates.iter().cloned().filter(|c| final_score(c, config) >= threshold).collect();
            if !filtered.is_empty() {
                break;
            }
        }
    }

    if filtered.is_empty() {
        let mut all = candidates;
        all.sort_by(|a, b| final_score(b, config).partial_cmp(&final_score(a, config)).unwrap());
        // ceil(0.5 * n), not floor: N = min(max(5, ceil(0.5*n)), n).
        let take = ((all.len() + 1) / 2).max(5).min(all.len());
        all.truncate(take);
        return all;
    }

    if filtered.len() == 1 {
        return filtered;
    }

    let n = filtered.len();
    let dynamic_limit = config.max_clips_per_video.min(n.max(5));
    let max_clips_allowed = dynamic_limit.min(n);

    let mut by_score = filtered.clone();
    by_score.sort_by(|a, b| final_score(b, config).partial_cmp(&final_score(a, config)).unwrap());

    let mut selected: Vec<HighlightCandidate> = Vec::new();
    for clip in &by_score {
        if selected.len() >= max_clips_allowed {
            break;
        }
        let admits = selected.iter().all(|c| compatible(clip, c, config.min_clip_separation_s));
        if admits {
            selected.push(clip.clone());
        }
    }

    if selected.len() < max_clips_allowed && n > 1 {
        let dp_selected = dp_select(&filtered, config, max_clips_allowed);
        let greedy_sum: f64 = selected.iter().map(|c| final_score(c, config)).sum();
        let dp_sum: f64 = dp_selected.iter().map(|c| final_score(c, config)).sum();
        if dp_sum > greedy_sum {
            selected = dp_selected;
        }
    }

    selected.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap());
    selected
}

/// DP over candidates sorted by start time: `dp[i][k]` holds the best
/// achievable score using exactly `k` clips with the `i`-th candidate as
/// the most recent pick, plus the `Rc`-shared index list that achieves
/// it. Sharing the list via `Rc` avoids deep-cloning the selection at
/// every cell — only the cells that extend a chain allocate a new node.
fn dp_select(candidates: &[HighlightCandidate], config: &AnalyzerConfig, max_clips: usize) -> Vec<HighlightCandidate> {
    let n = candidates.len();
    let max_k = max_clips.min(n);
    if n == 0 || max_k == 0 {
        return Vec::new();
    }

    let mut sorted = candidates.to_vec();
    sorted.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap());

    let mut compatible_matrix = vec![vec![false; n]; n];
    for i in 0..n {
        for j in 0..n {
            if i != j {
                compatible_matrix[i][j] = compatible(&sorted[i], &sorted[j], config.min_clip_separation_s);
            }
        }
    }

    let scores: Vec<f64> = sorted.iter().map(|c| final_score(c, config)).collect();
    let tokens: Vec<HashSet<String>> = sorted.iter().map(|c| tokenize(&c.transcription)).collect();

    let empty_list: Rc<Vec<usize>> = Rc::new(Vec::new());
    let mut dp: Vec<Vec<(f64, Rc<Vec<usize>>)>> = vec![vec![(0.0, empty_list.clone()); max_k + 1]; n];

    dp[0][1] = (scores[0], Rc::new(vec![0]));

    for i in 1..n {
        for k in 0..=max_k {
            dp[i][k] = dp[i - 1][k].clone();
        }
        if scores[i] > dp[i][1].0 {
            dp[i][1] = (scores[i], Rc::new(vec![i]));
        }
        for k in 2..=max_k {
            for j in 0..i {
                if !compatible_matrix[j][i] || dp[j][k - 1].0 <= 0.0 {
                    continue;
                }
                let (prev_score, prev_list) = &dp[j][k - 1];
                let sim_penalty: f64 = prev_list.iter().map(|&idx| text_similarity(&sorted[idx].transcription, &sorted[i].transcription)).sum();

                let current_tokens = &tokens[i];
                let prev_tokens: HashSet<String> = prev_list.iter().flat_map(|&idx| tokens[idx].iter().cloned()).collect();
                let new_tokens = current_tokens.difference(&prev_tokens).count();
                let diversity_bonus = if current_tokens.is_empty() { 0.0 } else { (new_tokens as f64 / current_tokens.len() as f64).min(MAX_DIVERSITY_BONUS) };

                let combined = prev_score + scores[i] - sim_penalty * SIMILARITY_PENALTY_WEIGHT + diversity_bonus;
                if combined > dp[i][k].0 {
                    let mut list = (**prev_list).clone();
                    list.push(i);
                    dp[i][k] = (combined, Rc::new(list));
                }
            }
        }
    }

    let mut best_score = 0.0;
    let mut best_list: Rc<Vec<usize>> = empty_list;
    for i in 0..n {
        for k in 1..=max_k {
            if dp[i][k].0 > best_score {
                best_score = dp[i][k].0;
                best_list = dp[i][k].1.clone();
            }
        }
    }

    best_list.iter().map(|&idx| sorted[idx].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(start: f64, end: f64, base_score: f64, text: &str) -> HighlightCandidate {
        HighlightCandidate {
            start,
            end,
            base_score,
            emotional_intensity: 0.5,
            speech_clarity: 0.8,
            keyword_density: 1.0,
            conversation_flow: 0.4,
            confidence: 0.7,
            transcription: text.to_string(),
            reason: "test".to_string(),
            suggested_duration: None,
        }
    }

    #[test]
    fn text_similarity_identical_is_one() {
        assert_eq!(text_similarity("hola mundo", "hola mundo"), 1.0);
    }

    #[test]
    fn text_similarity_empty_is_zero() {
        assert_eq!(text_similarity("", "hola"), 0.0);
    }

    #[test]
    fn select_optimal_drops_heavily_overlapping_lower_scorer() {
        let config = AnalyzerConfig { viral_score_threshold: 0.1, ..Default::default() };
        let candidates = vec![
            candidate(0.0, 30.0, 0.9, "un contenido incre\u{ed}ble y distinto"),
            candidate(2.0, 28.0, 0.85, "otra frase totalmente diferente aqu\u{ed}"),
            candidate(100.0, 130.0, 0.7, "segmento separado y lejano"),
        ];
        let selected = select_optimal(candidates, &config);
        assert!(selected.len() <= 2);
        assert!(selected.iter().any(|c| c.start == 100.0));
    }

    #[test]
    fn last_resort_fallback_takes_the_ceiling_not_the_floor() {
        // All 11 candidates score well under every relaxed threshold
        // (down to 0.35), forcing the top-N last-resort branch. Spec
        // Phase 5: N = min(max(5, ceil(0.5*|candidates|)), |candidates|);
        // ceil(0.5*11) = 6, not floor(0.5*11) = 5.
        let config = AnalyzerConfig::default();
        let candidates: Vec<HighlightCandidate> = (0..11)
            .map(|i| HighlightCandidate {
                start: i as f64 * 300.0,
                end: i as f64 * 300.0 + 3.0,
                base_score: 0.1,
                emotional_intensity: 0.1,
                speech_clarity: 0.1,
                keyword_density: 0.1,
                conversation_flow: 0.1,
                confidence: 0.0,
                transcription: format!("candidato {i}"),
                reason: "test".to_string(),
                suggested_duration: None,
            })
            .collect();
        let selected = select_optimal(candidates, &config);
        assert_eq!(selected.len(), 6);
    }

    #[test]
    fn select_optimal_single_candidate_passthrough() {
        let config = AnalyzerConfig::default();
        let candidates = vec![candidate(0.0, 30.0, 0.9, "solo uno")];
        let selected = select_optimal(candidates, &config);
        assert_eq!(selected.len(), 1);
    }
}
