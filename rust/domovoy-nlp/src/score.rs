//! Title scoring shared by location and device matching.
//!
//! The score of a phrase against a title is the number of equal
//! (phrase token, title token) pairs. Repeated tokens count on both sides, so
//! a multi-word overlap beats a single shared word.

use crate::token::Tokens;

/// Count equal token pairs between `phrase` and `title`.
pub fn title_score(phrase: &Tokens, title: &Tokens) -> i64 {
    phrase
        .iter()
        .map(|p| title.iter().filter(|t| *t == p).count() as i64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::normalize;
    use proptest::prelude::*;

    #[test]
    fn counts_single_overlap() {
        let phrase = normalize("включи лампу в кухне");
        assert_eq!(title_score(&phrase, &normalize("лампа")), 1);
        assert_eq!(title_score(&phrase, &normalize("торшер")), 0);
    }

    #[test]
    fn counts_repetitions_on_both_sides() {
        let phrase: Tokens = vec!["свет".to_string(), "свет".to_string()].into();
        let title: Tokens = vec!["свет".to_string(), "свет".to_string(), "ламп".to_string()].into();
        assert_eq!(title_score(&phrase, &title), 4);
    }

    #[test]
    fn empty_sides_score_zero() {
        assert_eq!(title_score(&Tokens::default(), &normalize("лампа")), 0);
        assert_eq!(title_score(&normalize("лампа"), &Tokens::default()), 0);
    }

    fn tokens() -> impl Strategy<Value = Tokens> {
        prop::collection::vec(prop::sample::select(vec!["ламп", "свет", "кухн", "включ"]), 0..6)
            .prop_map(|words| Tokens::from(words.into_iter().map(String::from).collect::<Vec<_>>()))
    }

    proptest! {
        #[test]
        fn score_is_symmetric(phrase in tokens(), title in tokens()) {
            prop_assert_eq!(title_score(&phrase, &title), title_score(&title, &phrase));
        }
    }
}
