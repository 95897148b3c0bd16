// Free-text answers mapped to option numbers

/// Option number (1-based) for each accepted spelling
const ANSWER_WORDS: &[(&str, usize)] = &[
    ("one", 1),
    ("first", 1),
    ("a", 1),
    ("один", 1),
    ("одна", 1),
    ("первый", 1),
    ("первая", 1),
    ("первое", 1),
    ("а", 1),
    ("two", 2),
    ("second", 2),
    ("b", 2),
    ("два", 2),
    ("две", 2),
    ("второй", 2),
    ("вторая", 2),
    ("второе", 2),
    ("б", 2),
    ("three", 3),
    ("third", 3),
    ("c", 3),
    ("три", 3),
    ("третий", 3),
    ("третья", 3),
    ("третье", 3),
    ("в", 3),
    ("four", 4),
    ("fourth", 4),
    ("d", 4),
    ("четыре", 4),
    ("четвертый", 4),
    ("четвёртый", 4),
    ("четвертая", 4),
    ("четвёртая", 4),
    ("г", 4),
    ("five", 5),
    ("fifth", 5),
    ("e", 5),
    ("пять", 5),
    ("пятый", 5),
    ("пятая", 5),
    ("д", 5),
];

pub const MAX_OPTIONS: usize = 5;

/// Resolve a typed answer to a 1-based option number
///
/// Accepts a digit 1-5 or one of the known words. Anything else is `None`.
pub fn resolve_answer(input: &str) -> Option<usize> {
    let normalized = input.trim().trim_end_matches(['.', ')']).to_lowercase();

    if let Ok(n) = normalized.parse::<usize>() {
        return (1..=MAX_OPTIONS).contains(&n).then_some(n);
    }

    ANSWER_WORDS
        .iter()
        .find(|(word, _)| *word == normalized)
        .map(|(_, n)| *n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits() {
        assert_eq!(resolve_answer("1"), Some(1));
        assert_eq!(resolve_answer(" 5 "), Some(5));
        assert_eq!(resolve_answer("3."), Some(3));
        assert_eq!(resolve_answer("0"), None);
        assert_eq!(resolve_answer("6"), None);
    }

    #[test]
    fn test_words_and_letters() {
        assert_eq!(resolve_answer("Two"), Some(2));
        assert_eq!(resolve_answer("third"), Some(3));
        assert_eq!(resolve_answer("D"), Some(4));
        assert_eq!(resolve_answer("Пять"), Some(5));
        assert_eq!(resolve_answer("четвёртый"), Some(4));
        assert_eq!(resolve_answer("б)"), Some(2));
    }

    #[test]
    fn test_unresolvable() {
        assert_eq!(resolve_answer(""), None);
        assert_eq!(resolve_answer("piano"), None);
        assert_eq!(resolve_answer("-1"), None);
    }
}
