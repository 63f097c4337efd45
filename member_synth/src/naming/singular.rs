//! English singularization of collection field names.
//!
//! Only the last camel-case word is singularized, so `userEntries` becomes
//! `userEntry`. Words the rules cannot handle yield `None`; callers reuse the
//! plural name in that case.

const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("oxen", "ox"),
    ("indices", "index"),
    ("appendices", "appendix"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("analyses", "analysis"),
    ("axes", "axis"),
    ("crises", "crisis"),
    ("theses", "thesis"),
    ("aliases", "alias"),
    ("statuses", "status"),
    ("buses", "bus"),
    ("quizzes", "quiz"),
    ("leaves", "leaf"),
    ("knives", "knife"),
    ("lives", "life"),
    ("wives", "wife"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("selves", "self"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("shoes", "shoe"),
    ("toes", "toe"),
    ("canoes", "canoe"),
    // -che words, where only the trailing "s" is plural.
    ("aches", "ache"),
    ("caches", "cache"),
    ("headaches", "headache"),
    ("niches", "niche"),
    ("cliches", "cliche"),
    ("quiches", "quiche"),
    ("psyches", "psyche"),
    ("avalanches", "avalanche"),
    ("moustaches", "moustache"),
    ("mustaches", "mustache"),
    // -s words that take "es".
    ("gases", "gas"),
    ("lenses", "lens"),
    ("atlases", "atlas"),
    ("canvases", "canvas"),
    // -use words with a consonant before the "u".
    ("excuses", "excuse"),
    ("fuses", "fuse"),
    ("muses", "muse"),
    ("refuses", "refuse"),
];

const UNCOUNTABLE: &[&str] = &[
    "data",
    "deer",
    "equipment",
    "feedback",
    "fish",
    "hardware",
    "information",
    "metadata",
    "money",
    "music",
    "news",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
    "staff",
];

fn singular_word(word: &str) -> Option<String> {
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return None;
    }
    if let Some((_, single)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
        return Some((*single).to_owned());
    }
    for suffix in ["sses", "shes", "ches", "xes", "zzes", "oes"] {
        if let Some(stem) = lower.strip_suffix(suffix) {
            // Only the trailing "es" is plural.
            let kept = suffix.strip_suffix("es").unwrap_or(suffix);
            return Some(format!("{stem}{kept}"));
        }
    }
    if let Some(stem) = lower.strip_suffix("uses") {
        // bonus, virus, campus: a consonant before "us" marks a Latin -us.
        if stem.chars().last().is_some_and(|c| !"aeiou".contains(c)) {
            return Some(format!("{stem}us"));
        }
    }
    if let Some(stem) = lower.strip_suffix("ies") {
        if !stem.is_empty() {
            return Some(format!("{stem}y"));
        }
    }
    if ["ss", "us", "is"].iter().any(|s| lower.ends_with(s)) {
        return None;
    }
    lower
        .strip_suffix('s')
        .filter(|stem| !stem.is_empty())
        .map(str::to_owned)
}

fn restore_case(original: &str, single: &str) -> String {
    if original.chars().next().is_some_and(char::is_uppercase) {
        super::capitalize(single)
    } else {
        single.to_owned()
    }
}

/// Singular form of a (camel-case) plural name.
///
/// ```
/// use member_synth::naming::singularize;
///
/// assert_eq!(singularize("entries").as_deref(), Some("entry"));
/// assert_eq!(singularize("knownPeople").as_deref(), Some("knownPerson"));
/// assert_eq!(singularize("information"), None);
/// ```
#[must_use]
pub fn singularize(name: &str) -> Option<String> {
    let split = name
        .char_indices()
        .filter(|(_, c)| c.is_uppercase())
        .map(|(i, _)| i)
        .last()
        .unwrap_or(0);
    let (head, last) = name.split_at(split);
    let single = singular_word(last)?;
    Some(format!("{head}{}", restore_case(last, &single)))
}
