//! Silence sentence library and selector
//!
//! A fixed catalog of short grounding sentences by category. Global
//! indices follow catalog order (stability, center, pause, growth) and are
//! what the per-user history records.

use rand::seq::SliceRandom;
use rand::Rng;
use crate::core::patterns::RESPONSIBILITY_TONE;
use crate::types::{Emotion, RecentIndices, SelectedSentence, SilenceCategory};
use crate::SILENCE_HISTORY_CAPACITY;

/// Catalog version, bumped whenever sentences change
pub const LIBRARY_VERSION: &str = "silence-lib/1";

const STABILITY: &[&str] = &[
    "지금 마음이 먼저 다친 것 같아요.",
    "지금은 서두르지 않아도 됩니다.",
    "지금은 판단보다 이해가 먼저 같아요.",
    "그 상황에서 버틴 것만으로도 충분히 큰 일이에요.",
];

const CENTER: &[&str] = &[
    "지금은 결론보다 숨을 고르는 게 먼저예요.",
    "지금은 정답보다 중심이 중요해 보여요.",
    "그 말 속에 이미 핵심이 있어요.",
];

const PAUSE: &[&str] = &[
    "여기서 한 번 멈추는 게 더 성숙할 수 있어요.",
    "그건 가볍게 넘길 일이 아니죠.",
];

const GROWTH: &[&str] = &[
    "그건 책임감이 있는 사람만 느끼는 무게예요.",
    "이건 당신이 대충 살고 있지 않다는 증거네요.",
    "그 말을 꺼낸 것 자체가 이미 한 걸음이에요.",
];

fn sentences_of(category: SilenceCategory) -> &'static [&'static str] {
    match category {
        SilenceCategory::Stability => STABILITY,
        SilenceCategory::Center => CENTER,
        SilenceCategory::Pause => PAUSE,
        SilenceCategory::Growth => GROWTH,
    }
}

/// Global index of a category's first sentence
fn offset_of(category: SilenceCategory) -> usize {
    SilenceCategory::ALL
        .iter()
        .take_while(|c| **c != category)
        .map(|c| sentences_of(*c).len())
        .sum()
}

/// Total number of sentences in the catalog
pub fn library_len() -> usize {
    SilenceCategory::ALL.iter().map(|c| sentences_of(*c).len()).sum()
}

/// Sentence at a global index
pub fn sentence_at(index: usize) -> Option<&'static str> {
    let mut rest = index;
    for category in SilenceCategory::ALL {
        let list = sentences_of(category);
        if rest < list.len() {
            return Some(list[rest]);
        }
        rest -= list.len();
    }
    None
}

/// Global indices for a category, or the whole catalog for None
pub fn candidate_indices(category: Option<SilenceCategory>) -> Vec<usize> {
    match category {
        Some(c) => {
            let start = offset_of(c);
            (start..start + sentences_of(c).len()).collect()
        }
        None => (0..library_len()).collect(),
    }
}

/// Category by priority: responsibility tone, then emotion, else the union
pub fn resolve_category(user_text: &str, emotion: Emotion) -> Option<SilenceCategory> {
    if RESPONSIBILITY_TONE.is_match(user_text) {
        return Some(SilenceCategory::Growth);
    }
    match emotion {
        Emotion::Fear | Emotion::Shame => Some(SilenceCategory::Stability),
        Emotion::Anger => Some(SilenceCategory::Center),
        Emotion::Frustration => Some(SilenceCategory::Pause),
        _ => None,
    }
}

/// Pick a sentence for this user, skipping indices in `history`, and
/// record the pick in `history`. Only the newest three entries count.
/// When every candidate is among them the cycle resets and any candidate
/// may be picked.
pub fn select_silence_sentence<R: Rng + ?Sized>(
    user_text: &str,
    emotion: Emotion,
    history: &mut RecentIndices,
    rng: &mut R,
) -> SelectedSentence {
    let category = resolve_category(user_text, emotion);
    let candidates = candidate_indices(category);
    history.clamp(SILENCE_HISTORY_CAPACITY);

    let available: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|i| !history.contains(*i))
        .collect();

    let cycle_reset = available.is_empty();
    let pool = if cycle_reset { &candidates } else { &available };

    // Candidates are never empty: every category has sentences
    let index = pool.choose(rng).copied().unwrap_or(0);
    let sentence = sentence_at(index).unwrap_or(STABILITY[0]).to_string();

    history.push(index, SILENCE_HISTORY_CAPACITY);

    SelectedSentence { index, sentence, category, cycle_reset }
}

/// Uniformly random sentence from the whole catalog (rewrite fallback)
pub fn random_sentence<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    let index = rng.gen_range(0..library_len());
    sentence_at(index).unwrap_or(CENTER[0])
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_catalog_indexing() {
        assert_eq!(library_len(), 12);
        assert_eq!(candidate_indices(Some(SilenceCategory::Center)), vec![4, 5, 6]);
        assert_eq!(candidate_indices(Some(SilenceCategory::Growth)), vec![9, 10, 11]);
        assert_eq!(sentence_at(4), Some(CENTER[0]));
        assert_eq!(sentence_at(12), None);
    }

    #[test]
    fn test_no_sentence_contains_question() {
        for i in 0..library_len() {
            let s = sentence_at(i).unwrap();
            assert!(!s.contains('?'));
        }
    }

    #[test]
    fn test_category_priority() {
        assert_eq!(
            resolve_category("this is my responsibility", Emotion::Anger),
            Some(SilenceCategory::Growth)
        );
        assert_eq!(resolve_category("ugh", Emotion::Shame), Some(SilenceCategory::Stability));
        assert_eq!(resolve_category("ugh", Emotion::Anger), Some(SilenceCategory::Center));
        assert_eq!(resolve_category("ugh", Emotion::Frustration), Some(SilenceCategory::Pause));
        assert_eq!(resolve_category("ugh", Emotion::Elevation), None);
    }

    #[test]
    fn test_selection_skips_recent_and_records() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut history = RecentIndices::from_slice(&[4, 5]);
        let picked = select_silence_sentence("ugh", Emotion::Anger, &mut history, &mut rng);
        assert_eq!(picked.index, 6);
        assert!(!picked.cycle_reset);
        assert_eq!(history.last(), Some(6));
    }

    #[test]
    fn test_overlong_history_only_counts_last_three() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut history = RecentIndices::from_slice(&[4, 5, 6, 7]);
        let picked = select_silence_sentence("ugh", Emotion::Anger, &mut history, &mut rng);
        assert_eq!(picked.index, 4);
        assert!(!picked.cycle_reset);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![6, 7, 4]);
    }

    #[test]
    fn test_exhausted_category_resets() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut history = RecentIndices::from_slice(&[7, 8]);
        let picked = select_silence_sentence("ugh", Emotion::Frustration, &mut history, &mut rng);
        assert!(picked.cycle_reset);
        assert!(picked.index == 7 || picked.index == 8);
    }

    #[test]
    fn test_random_sentence_from_catalog() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let s = random_sentence(&mut rng);
            assert!((0..library_len()).any(|i| sentence_at(i) == Some(s)));
        }
    }
}
