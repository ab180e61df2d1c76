//! English singular/plural inflection for single lowercase words.

const UNCOUNTABLE: &[&str] = &[
    "data",
    "deer",
    "equipment",
    "feedback",
    "fish",
    "information",
    "metadata",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
    "staff",
];

/// (singular, plural)
const IRREGULAR: &[(&str, &str)] = &[
    ("analysis", "analyses"),
    ("axis", "axes"),
    ("calorie", "calories"),
    ("child", "children"),
    ("cookie", "cookies"),
    ("crisis", "crises"),
    ("criterion", "criteria"),
    ("diagnosis", "diagnoses"),
    ("foot", "feet"),
    ("genie", "genies"),
    ("goose", "geese"),
    ("guru", "gurus"),
    ("half", "halves"),
    ("hero", "heroes"),
    ("knife", "knives"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("man", "men"),
    ("menu", "menus"),
    ("mouse", "mice"),
    ("movie", "movies"),
    ("ox", "oxen"),
    ("person", "people"),
    ("potato", "potatoes"),
    ("quiz", "quizzes"),
    ("rookie", "rookies"),
    ("selfie", "selfies"),
    ("shelf", "shelves"),
    ("taxi", "taxis"),
    ("thesis", "theses"),
    ("tooth", "teeth"),
    ("wife", "wives"),
    ("wolf", "wolves"),
    ("woman", "women"),
    ("zombie", "zombies"),
];

pub fn pluralize(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(s, _)| *s == word) {
        return plural.to_string();
    }
    if IRREGULAR.iter().any(|(_, p)| *p == word) {
        return word.to_string();
    }

    // Already plural when the word is the regular plural of its own singular.
    let singular = singular_rule(word);
    if singular != word && plural_rule(&singular) == word {
        return word.to_string();
    }

    plural_rule(word)
}

pub fn singularize(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, p)| *p == word) {
        return singular.to_string();
    }
    if IRREGULAR.iter().any(|(s, _)| *s == word) {
        return word.to_string();
    }

    singular_rule(word)
}

fn plural_rule(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("sis") {
        return format!("{stem}ses");
    }
    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().last().is_some_and(is_consonant) {
            return format!("{stem}ies");
        }
    }
    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{word}es");
    }
    format!("{word}s")
}

/// Singular nouns whose trailing `s` is not a plural marker.
fn ends_in_singular_s(word: &str) -> bool {
    word == "gas"
        || word == "bias"
        || word.ends_with("alias")
        || word.ends_with("canvas")
        || word.ends_with("tlas")
        || word.ends_with("tmas")
        || word.ends_with("ris")
}

fn singular_rule(word: &str) -> String {
    if word.ends_with("ss")
        || word.ends_with("us")
        || word.ends_with("is")
        || ends_in_singular_s(word)
    {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("es") {
        if ends_in_singular_s(stem) {
            return stem.to_string();
        }
    }
    if word.len() > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("yses") {
        return format!("{stem}ysis");
    }
    if word.ends_with("sses")
        || word.ends_with("ches")
        || word.ends_with("shes")
        || word.ends_with("xes")
        || word.ends_with("zzes")
    {
        return word[..word.len() - 2].to_string();
    }
    if let Some(stem) = word.strip_suffix("uses") {
        if stem.chars().last().is_some_and(is_consonant) {
            return format!("{stem}us");
        }
    }
    if word.len() > 1 {
        if let Some(stem) = word.strip_suffix('s') {
            return stem.to_string();
        }
    }
    word.to_string()
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
