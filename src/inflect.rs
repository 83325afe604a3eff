//! Singularization used to derive default foreign-key column names.

/// Maps a plural English noun to its singular form.
pub trait Inflector {
    fn singular(&self, word: &str) -> String;
}

impl<F> Inflector for F
where
    F: Fn(&str) -> String,
{
    fn singular(&self, word: &str) -> String {
        self(word)
    }
}

/// Rule-based English singularizer covering the table names Rails
/// generates. `order_items` singularizes its last segment only.
#[derive(Debug, Clone, Copy, Default)]
pub struct English;

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "news",
    "police",
    "metadata",
    "data",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("sexes", "sex"),
    ("moves", "move"),
    ("zombies", "zombie"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("oxen", "ox"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("criteria", "criterion"),
    ("analyses", "analysis"),
    ("statuses", "status"),
    ("aliases", "alias"),
    ("buses", "bus"),
    ("quizzes", "quiz"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("knives", "knife"),
    ("lives", "life"),
    ("wives", "wife"),
    ("heroes", "hero"),
    ("potatoes", "potato"),
    ("tomatoes", "tomato"),
    ("movies", "movie"),
    ("cookies", "cookie"),
];

/// Suffix rewrites, most specific first.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("sses", "ss"),
    ("shes", "sh"),
    ("ches", "ch"),
    ("xes", "x"),
    ("ss", "ss"),
    ("us", "us"),
    ("is", "is"),
    ("s", ""),
];

impl English {
    fn singular_word(word: &str) -> String {
        // ASCII lowering keeps byte offsets aligned with `word`
        let lower = word.to_ascii_lowercase();
        if UNCOUNTABLE.contains(&lower.as_str()) {
            return word.to_string();
        }
        if let Some((_, single)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
            return match_case(word, single);
        }
        // viruses, campuses; houses and causes fall through to the `s` rule
        if let Some(stem) = lower.strip_suffix("uses") {
            if stem.ends_with(|c: char| c.is_ascii_alphabetic() && !"aeiou".contains(c)) {
                return word[..word.len() - 2].to_string();
            }
        }
        for (suffix, replacement) in SUFFIX_RULES {
            if lower.len() > suffix.len() && lower.ends_with(suffix) {
                let stem = &word[..word.len() - suffix.len()];
                return match_case(word, &format!("{}{}", stem, replacement));
            }
        }
        word.to_string()
    }
}

/// Carry an all-caps or capitalized spelling over to `out`.
fn match_case(word: &str, out: &str) -> String {
    let mut letters = word.chars().filter(|c| c.is_alphabetic()).peekable();
    if letters.peek().is_some() && letters.all(char::is_uppercase) {
        return out.to_uppercase();
    }
    let mut chars = out.chars();
    match (word.chars().next(), chars.next()) {
        (Some(first), Some(head)) if first.is_uppercase() => {
            head.to_uppercase().chain(chars).collect()
        }
        _ => out.to_string(),
    }
}

impl Inflector for English {
    fn singular(&self, word: &str) -> String {
        match word.rsplit_once('_') {
            Some((head, last)) if !last.is_empty() => {
                format!("{}_{}", head, Self::singular_word(last))
            }
            _ => Self::singular_word(word),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        let en = English;
        assert_eq!(en.singular("users"), "user");
        assert_eq!(en.singular("categories"), "category");
        assert_eq!(en.singular("addresses"), "address");
        assert_eq!(en.singular("boxes"), "box");
        assert_eq!(en.singular("branches"), "branch");
        assert_eq!(en.singular("wolves"), "wolf");
        assert_eq!(en.singular("knives"), "knife");
        assert_eq!(en.singular("viruses"), "virus");
        assert_eq!(en.singular("campuses"), "campus");
        assert_eq!(en.singular("bonuses"), "bonus");
        assert_eq!(en.singular("houses"), "house");
        assert_eq!(en.singular("causes"), "cause");
    }

    #[test]
    fn test_keeps_input_case() {
        let en = English;
        assert_eq!(en.singular("Users"), "User");
        assert_eq!(en.singular("USERS"), "USER");
        assert_eq!(en.singular("Boxes"), "Box");
        assert_eq!(en.singular("People"), "Person");
        assert_eq!(en.singular("admin_Categories"), "admin_Category");
        assert_eq!(en.singular("Campuses"), "Campus");
    }

    #[test]
    fn test_irregular_and_uncountable() {
        let en = English;
        assert_eq!(en.singular("people"), "person");
        assert_eq!(en.singular("statuses"), "status");
        assert_eq!(en.singular("movies"), "movie");
        assert_eq!(en.singular("houses"), "house");
        assert_eq!(en.singular("news"), "news");
        assert_eq!(en.singular("data"), "data");
    }

    #[test]
    fn test_already_singular() {
        let en = English;
        assert_eq!(en.singular("status"), "status");
        assert_eq!(en.singular("class"), "class");
        assert_eq!(en.singular("user"), "user");
    }

    #[test]
    fn test_compound_table_names() {
        let en = English;
        assert_eq!(en.singular("order_items"), "order_item");
        assert_eq!(en.singular("admin_users"), "admin_user");
        assert_eq!(en.singular("user_categories"), "user_category");
    }

    #[test]
    fn test_closure_inflector() {
        let upper = |w: &str| w.to_uppercase();
        assert_eq!(upper.singular("users"), "USERS");
    }
}
