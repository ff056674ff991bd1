use icu_properties::CodePointMapData;
use icu_properties::props::GeneralCategory;

/// Character class used for composition thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    Lower,
    Upper,
    Digit,
    Other,
}

impl CharClass {
    /// Classifies by Unicode general category: `Ll` is lower, `Lu` upper
    /// and `Nd` digit. Titlecase, modifier and caseless letters are letters
    /// but belong to no class, so they yield `None`. Everything else,
    /// including non-decimal numbers such as `²` or `Ⅻ`, is `Other`.
    pub fn of(ch: char) -> Option<Self> {
        match general_category(ch) {
            GeneralCategory::LowercaseLetter => Some(CharClass::Lower),
            GeneralCategory::UppercaseLetter => Some(CharClass::Upper),
            GeneralCategory::DecimalNumber => Some(CharClass::Digit),
            GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter => None,
            _ => Some(CharClass::Other),
        }
    }
}

fn general_category(ch: char) -> GeneralCategory {
    CodePointMapData::<GeneralCategory>::new().get(ch)
}

/// True for every letter category (`Lu`, `Ll`, `Lt`, `Lm`, `Lo`).
pub fn is_letter(ch: char) -> bool {
    matches!(
        general_category(ch),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub lower: usize,
    pub upper: usize,
    pub digit: usize,
    pub other: usize,
}

impl ClassCounts {
    /// Number of classes with a positive count, always in `0..=4`.
    pub fn diversity(&self) -> usize {
        [self.lower, self.upper, self.digit, self.other]
            .iter()
            .filter(|&&n| n > 0)
            .count()
    }

    /// Classified characters. Letters outside `Ll`/`Lu` are not counted.
    pub fn total(&self) -> usize {
        self.lower + self.upper + self.digit + self.other
    }
}

pub fn count_by_class(s: &str) -> ClassCounts {
    let mut counts = ClassCounts::default();
    for ch in s.chars() {
        match CharClass::of(ch) {
            Some(CharClass::Lower) => counts.lower += 1,
            Some(CharClass::Upper) => counts.upper += 1,
            Some(CharClass::Digit) => counts.digit += 1,
            Some(CharClass::Other) => counts.other += 1,
            None => {}
        }
    }
    counts
}

pub fn class_diversity(s: &str) -> usize {
    count_by_class(s).diversity()
}

/// Counts maximal runs of letters. Digits and punctuation separate words.
pub fn count_words(s: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;
    for ch in s.chars() {
        if is_letter(ch) {
            if !in_word {
                in_word = true;
                count += 1;
            }
        } else {
            in_word = false;
        }
    }
    count
}

/// Longest stretch of characters identical to their predecessor.
/// Counts repeats beyond the first occurrence, so "ccc" yields 2.
pub fn longest_repeated_run(s: &str) -> usize {
    longest_run_by(s, |prev, cur| prev == cur)
}

/// Longest stretch of characters whose code point is one above or below
/// their predecessor's. Same convention as [`longest_repeated_run`].
pub fn longest_adjacent_run(s: &str) -> usize {
    longest_run_by(s, |prev, cur| (prev as u32).abs_diff(cur as u32) == 1)
}

fn longest_run_by(s: &str, continues: impl Fn(char, char) -> bool) -> usize {
    let mut chars = s.chars();
    let Some(mut prev) = chars.next() else {
        return 0;
    };

    let mut current = 0;
    let mut longest = 0;
    for ch in chars {
        if continues(prev, ch) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
        prev = ch;
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_by_class() {
        assert_eq!(count_by_class("ABACUS").lower, 0);
        assert_eq!(count_by_class("abacus").lower, 6);
        assert_eq!(count_by_class("abACUS").lower, 2);
        assert_eq!(count_by_class("abaCU$").upper, 2);

        let counts = count_by_class("ab4CU$");
        assert_eq!(
            counts,
            ClassCounts {
                lower: 2,
                upper: 2,
                digit: 1,
                other: 1
            }
        );
    }

    #[test]
    fn test_ascii_classes_cover_every_character() {
        for s in ["", "hello", "Xk9!mQ_z", "\u{7}\t ", "héllo wörld"] {
            assert_eq!(count_by_class(s).total(), s.chars().count(), "{s:?}");
        }
    }

    #[test]
    fn test_letters_without_case_count_in_no_class() {
        // CJK ideographs (Lo), titlecase (Lt) and modifier letters (Lm)
        let counts = count_by_class("日本ǅªʰ");
        assert_eq!(counts, ClassCounts::default());

        let counts = count_by_class("日本語abc");
        assert_eq!(counts.lower, 3);
        assert_eq!(counts.other, 0);
        assert_eq!(counts.diversity(), 1);
    }

    #[test]
    fn test_only_decimal_digits_are_digits() {
        let counts = count_by_class("²½Ⅻ①");
        assert_eq!(counts.digit, 0);
        assert_eq!(counts.upper, 0);
        assert_eq!(counts.other, 4);

        // Non-ASCII decimal digits still count
        assert_eq!(count_by_class("٣३").digit, 2);
    }

    #[test]
    fn test_class_diversity() {
        assert_eq!(class_diversity(""), 0);
        for s in ["1", "a", "A", "$"] {
            assert_eq!(class_diversity(s), 1, "{s:?}");
        }
        assert_eq!(class_diversity("1aA$"), 4);
        assert_eq!(class_diversity("123abcABC$%^"), 4);
    }

    #[test]
    fn test_diversity_matches_positive_counts() {
        for s in ["", "aa", "aA", "a1!", "Zz9 ", "!!!"] {
            let counts = count_by_class(s);
            let positive = [counts.lower, counts.upper, counts.digit, counts.other]
                .iter()
                .filter(|&&n| n > 0)
                .count();
            assert_eq!(class_diversity(s), positive);
            assert!(class_diversity(s) <= 4);
        }
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("1234@#$123"), 0);
        assert_eq!(count_words("abacus"), 1);
        assert_eq!(count_words("ABACUS"), 1);
        assert_eq!(count_words("aBAcus"), 1);
        assert_eq!(count_words("!abacus"), 1);
        assert_eq!(count_words("abacus!"), 1);
        assert_eq!(count_words("!abacus!"), 1);
        assert_eq!(count_words("abacus!aardvark"), 2);
        assert_eq!(count_words("abacus!aardvark!"), 2);
        assert_eq!(count_words("abacus!aardvark8amulet"), 3);
        assert_eq!(count_words("!abacus!aardvark8amulet"), 3);
        assert_eq!(count_words("日本ǅ"), 1);
        assert_eq!(count_words("Ⅻ"), 0);
    }

    #[test]
    fn test_longest_repeated_run() {
        assert_eq!(longest_repeated_run(""), 0);
        assert_eq!(longest_repeated_run("a"), 0);
        assert_eq!(longest_repeated_run("12345abcde"), 0);
        assert_eq!(longest_repeated_run("abccdef"), 1);
        assert_eq!(longest_repeated_run("abccdefffg"), 2);
        assert_eq!(longest_repeated_run("abcccdeffg"), 2);
    }

    #[test]
    fn test_longest_adjacent_run() {
        assert_eq!(longest_adjacent_run(""), 0);
        assert_eq!(longest_adjacent_run("24680"), 0);
        assert_eq!(longest_adjacent_run("24679"), 1);
        assert_eq!(longest_adjacent_run("ace12gik123"), 2);
        assert_eq!(longest_adjacent_run("ace123gik12"), 2);
    }

    #[test]
    fn test_adjacent_run_counts_descending_steps() {
        assert_eq!(longest_adjacent_run("cba"), 2);
        // Direction may flip mid-run
        assert_eq!(longest_adjacent_run("121"), 2);
        // Repeats break an adjacent run
        assert_eq!(longest_adjacent_run("1123"), 2);
    }
}
