//! Word lists and suffix tables used by the rules.
//!
//! Everything here works on *folded* text: lowercase with `ё` written as `е`.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Lowercase `s` and replace `ё` with `е`.
pub fn fold(s: &str) -> String {
    s.to_lowercase().replace('ё', "е")
}

static MALE_NAMES: &[&str] = &[
    "александр", "алексей", "анатолий", "андрей", "антон", "аркадий", "артем", "борис", "вадим", "валерий",
    "василий", "виктор", "владимир", "владислав", "геннадий", "георгий", "глеб", "григорий", "денис", "дмитрий",
    "евгений", "егор", "иван", "игорь", "илья", "кирилл", "константин", "леонид", "максим", "михаил", "никита", "николай",
    "олег", "петр", "роман", "руслан", "сергей", "станислав", "степан", "тимур", "федор", "юрий", "ярослав",
];

static FEMALE_NAMES: &[&str] = &[
    "александра", "алена", "алина", "анастасия", "ангелина", "анна", "валентина", "валерия", "вера", "вероника",
    "виктория", "галина", "дарья", "диана", "евгения", "екатерина", "елена", "елизавета", "ирина", "кристина",
    "ксения", "людмила", "маргарита", "марина", "мария", "надежда", "наталья", "нина", "оксана", "ольга",
    "полина", "светлана", "софья", "татьяна", "юлия", "яна",
];

/// Singular case endings that replace the nominative ending of a name.
fn name_forms(name: &str) -> Vec<String> {
    let (stem, endings): (&str, &[&str]) = if let Some(stem) = name.strip_suffix("ий") {
        (stem, &["ия", "ию", "ием", "ии"])
    } else if let Some(stem) = name.strip_suffix('й') {
        (stem, &["я", "ю", "ем", "е"])
    } else if let Some(stem) = name.strip_suffix("ия") {
        (stem, &["ии", "ию", "ией"])
    } else if let Some(stem) = name.strip_suffix('я') {
        (stem, &["и", "е", "ю", "ей"])
    } else if let Some(stem) = name.strip_suffix('ь') {
        (stem, &["я", "ю", "ем", "е"])
    } else if let Some(stem) = name.strip_suffix('а') {
        if stem.ends_with(['г', 'к', 'х', 'ж', 'ш', 'ч', 'щ']) {
            (stem, &["и", "е", "у", "ой"])
        } else {
            (stem, &["ы", "е", "у", "ой"])
        }
    } else {
        (name, &["а", "у", "ом", "е"])
    };

    std::iter::once(name.to_string()).chain(endings.iter().map(|e| format!("{stem}{e}"))).collect()
}

/// Every known form of a first name, mapped to `(nominative, feminine)`.
/// A nominative always maps to itself ("александра" is not read as the
/// genitive of "александр"); other shared forms keep the first name listed.
static NAME_FORMS: Lazy<HashMap<String, (&'static str, bool)>> = Lazy::new(|| {
    let all: Vec<(&'static str, bool)> =
        MALE_NAMES.iter().map(|n| (*n, false)).chain(FEMALE_NAMES.iter().map(|n| (*n, true))).collect();

    let mut forms: HashMap<String, (&'static str, bool)> =
        all.iter().map(|&(name, feminine)| (name.to_string(), (name, feminine))).collect();
    for &(name, feminine) in &all {
        for form in name_forms(name) {
            forms.entry(form).or_insert((name, feminine));
        }
    }
    forms
});

/// Look up a folded word as a first name.
pub fn first_name(folded: &str) -> Option<(&'static str, bool)> {
    NAME_FORMS.get(folded).copied()
}

pub fn is_name_form(folded: &str) -> bool {
    NAME_FORMS.contains_key(folded)
}

// Checked in order, so the feminine "ова" wins over "ов" in "петрова".
const FEMININE_SURNAME_ENDS: &[&str] = &["ова", "ева", "ина", "ына", "кая"];
const MASCULINE_SURNAME_ENDS: &[&str] = &["ов", "ев", "ин", "ын", "кий"];

/// A word of at least five letters with a common surname ending.
pub fn is_family(folded: &str) -> bool {
    folded.chars().count() >= 5
        && FEMININE_SURNAME_ENDS.iter().chain(MASCULINE_SURNAME_ENDS).any(|end| folded.ends_with(end))
}

/// `Some(true)` for a feminine surname ending, `Some(false)` for a masculine
/// one.
pub fn surname_gender(folded: &str) -> Option<bool> {
    if FEMININE_SURNAME_ENDS.iter().any(|end| folded.ends_with(end)) {
        Some(true)
    } else if MASCULINE_SURNAME_ENDS.iter().any(|end| folded.ends_with(end)) {
        Some(false)
    } else {
        None
    }
}

/// Pronouns, conjunctions, particles and the introduction vocabulary. None of
/// these can name a company or a place of work.
static FUNCTION_WORDS: &[&str] = &[
    "а", "бы", "в", "вам", "вас", "вы", "да", "до", "же", "звать", "зовут", "и", "или", "имя", "к", "как", "ли",
    "мне", "мое", "мы", "меня", "мой", "моя", "не", "нет", "но", "ну", "о", "от", "с", "так", "там", "тут", "у",
    "что", "это", "этот", "я", "беспокоит", "разрешите", "представиться", "звонит", "здравствуйте", "привет",
];

pub fn is_function_word(folded: &str) -> bool {
    FUNCTION_WORDS.contains(&folded)
}

/// Prepositions allowed inside a place of work ("менеджер по продажам").
static PLACE_PREPOSITIONS: &[&str] = &["по", "в", "из", "при", "с"];

pub fn is_place_preposition(folded: &str) -> bool {
    PLACE_PREPOSITIONS.contains(&folded)
}

const VERB_ENDS: &[&str] = &[
    "ть", "ться", "ет", "ит", "ут", "ют", "ат", "ят", "ем", "им", "ешь", "ишь", "ется", "ится", "ал", "ил", "ел",
    "ала", "ила", "ела", "али", "или", "ели",
];

/// Rough finite-verb and infinitive check by ending.
pub fn looks_like_verb(folded: &str) -> bool {
    VERB_ENDS.iter().any(|end| folded.ends_with(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_found_in_oblique_cases() {
        assert_eq!(first_name("сергея"), Some(("сергей", false)));
        assert_eq!(first_name("василием"), Some(("василий", false)));
        assert_eq!(first_name("ивану"), Some(("иван", false)));
        assert_eq!(first_name("ольги"), Some(("ольга", true)));
        assert_eq!(first_name("марией"), Some(("мария", true)));
        assert_eq!(first_name("натальи"), Some(("наталья", true)));
        assert_eq!(first_name("ангелины"), Some(("ангелина", true)));
        assert_eq!(first_name("федор"), Some(("федор", false)));
        assert_eq!(first_name("игоря"), Some(("игорь", false)));
        assert_eq!(first_name("александра"), Some(("александра", true)));
        assert_eq!(first_name("ромашка"), None);
    }

    #[test]
    fn common_call_names_are_known() {
        let names = [
            ("иван", false),
            ("ангелина", true),
            ("федор", false),
            ("екатерина", true),
            ("василий", false),
            ("максим", false),
            ("сергей", false),
            ("дмитрий", false),
            ("виктория", true),
            ("анастасия", true),
        ];
        for (name, feminine) in names {
            assert_eq!(first_name(name), Some((name, feminine)), "{name}");
        }
        assert_eq!(first_name("ивана"), Some(("иван", false)));
        assert_eq!(first_name("иваном"), Some(("иван", false)));
    }

    #[test]
    fn surname_endings() {
        assert!(is_family("петров"));
        assert!(is_family("смирнова"));
        assert!(is_family("достоевский"));
        assert!(!is_family("ин"));
        assert!(!is_family("дом"));
        assert_eq!(surname_gender("петрова"), Some(true));
        assert_eq!(surname_gender("петров"), Some(false));
        assert_eq!(surname_gender("ромашка"), None);
    }

    #[test]
    fn fold_treats_yo_as_ye() {
        assert_eq!(fold("Фёдор"), "федор");
        assert_eq!(fold("МОЁ"), "мое");
    }
}
