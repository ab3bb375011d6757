use hangman_types::{GameError, Word};
use rand::Rng;

/// Picks one word uniformly at random from an eligible catalog slice.
pub fn pick_random_word(words: Vec<Word>) -> Result<Word, GameError> {
    if words.is_empty() {
        return Err(GameError::NoWordsAvailable);
    }

    let mut words = words;
    let index = rand::rng().random_range(0..words.len());
    Ok(words.swap_remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn word(text: &str) -> Word {
        Word {
            id: Uuid::new_v4(),
            text: text.to_string(),
            category: "animals".to_string(),
            difficulty: 1,
            course_id: Uuid::new_v4(),
            teacher_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_empty_catalog_slice_fails() {
        let result = pick_random_word(Vec::new());
        assert!(matches!(result, Err(GameError::NoWordsAvailable)));
    }

    #[test]
    fn test_single_candidate_is_always_picked() {
        let picked = pick_random_word(vec![word("CAT")]).unwrap();
        assert_eq!(picked.text, "CAT");
    }

    #[test]
    fn test_picked_word_comes_from_the_slice() {
        let words = vec![word("CAT"), word("DOG"), word("OWL")];
        let texts: Vec<String> = words.iter().map(|w| w.text.clone()).collect();

        for _ in 0..20 {
            let picked = pick_random_word(words.clone()).unwrap();
            assert!(texts.contains(&picked.text));
        }
    }
}
