//! Rule-based English lemmatizer.
//!
//! Reduces inflected forms to a dictionary base form in four steps:
//! 1. irregular-form table (`built` → `build`, `people` → `person`)
//! 2. invariant words that merely look inflected (`kubernetes`, `analysis`)
//! 3. `-ing` / `-ed` stripping with consonant undoubling and silent-`e` restoration
//! 4. plural stripping (`-ies` → `-y`, sibilant `-es`, plain `-s`)
//!
//! Input is expected to be a single lower-case alphabetic word. The function is
//! total and deterministic; unknown shapes are returned unchanged.

const IRREGULAR: &[(&str, &str)] = &[
    ("am", "be"),
    ("analyses", "analysis"),
    ("are", "be"),
    ("began", "begin"),
    ("begun", "begin"),
    ("bought", "buy"),
    ("brought", "bring"),
    ("built", "build"),
    ("cached", "cache"),
    ("caches", "cache"),
    ("caching", "cache"),
    ("came", "come"),
    ("children", "child"),
    ("criteria", "criterion"),
    ("did", "do"),
    ("does", "do"),
    ("done", "do"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("feet", "foot"),
    ("fell", "fall"),
    ("felt", "feel"),
    ("found", "find"),
    ("gave", "give"),
    ("given", "give"),
    ("got", "get"),
    ("gotten", "get"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("had", "have"),
    ("has", "have"),
    ("having", "have"),
    ("held", "hold"),
    ("is", "be"),
    ("kept", "keep"),
    ("knew", "know"),
    ("known", "know"),
    ("led", "lead"),
    ("left", "leave"),
    ("lying", "lie"),
    ("made", "make"),
    ("men", "man"),
    ("met", "meet"),
    ("paid", "pay"),
    ("people", "person"),
    ("ran", "run"),
    ("said", "say"),
    ("saw", "see"),
    ("seen", "see"),
    ("sent", "send"),
    ("sold", "sell"),
    ("spent", "spend"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("stood", "stand"),
    ("taught", "teach"),
    ("taken", "take"),
    ("took", "take"),
    ("thought", "think"),
    ("told", "tell"),
    ("understood", "understand"),
    ("used", "use"),
    ("uses", "use"),
    ("using", "use"),
    ("was", "be"),
    ("went", "go"),
    ("were", "be"),
    ("women", "woman"),
    ("won", "win"),
    ("wrote", "write"),
    ("written", "write"),
];

/// Words whose surface form ends like an inflection but is already a lemma.
const INVARIANT: &[&str] = &[
    "access", "address", "alias", "analysis", "analytics", "atlas", "aws", "axis", "basis",
    "bias", "business", "canvas", "census", "chaos", "class", "consensus", "corpus", "crisis",
    "devops", "devsecops", "diagnosis", "during", "economics", "emphasis", "ethics", "express",
    "focus", "gas", "genesis", "gitops", "hundred", "hypothesis", "ios", "jenkins",
    "kubernetes", "logistics", "macos", "mathematics", "mlops", "morning", "news", "nexus",
    "pandas", "physics", "plus", "postgres", "process", "progress", "radius", "redis",
    "series", "species", "statistics", "status", "success", "syllabus", "synopsis", "tennis",
    "thesis", "various", "virus", "wedding",
];

/// Stem endings that lost a silent `e` when the suffix was attached.
const E_RESTORING_ENDINGS: &[&str] = &[
    "at", "bl", "iz", "ag", "ut", "rc", "nc", "rv", "lv", "iv", "uc", "dg", "yz", "uir",
    "gur", "cur", "tur",
];

pub fn lemmatize(word: &str) -> String {
    if let Some((_, base)) = IRREGULAR.iter().find(|(form, _)| *form == word) {
        return (*base).to_string();
    }
    if INVARIANT.contains(&word) || word.chars().count() <= 3 {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ing") {
        return verb_stem(stem).unwrap_or_else(|| word.to_string());
    }
    if let Some(stem) = word.strip_suffix("ied") {
        if stem.chars().count() >= 2 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("ed") {
        return verb_stem(stem).unwrap_or_else(|| word.to_string());
    }

    singular(word)
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Repairs a stem left behind by removing `-ing` or `-ed`.
/// Returns `None` when the word should be kept as-is (`string`, `need`).
fn verb_stem(stem: &str) -> Option<String> {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n < 3 || !chars.iter().copied().any(is_vowel) || chars[n - 1] == 'e' {
        return None;
    }

    let (prev, last) = (chars[n - 2], chars[n - 1]);
    if prev == last && !is_vowel(last) && !matches!(last, 'l' | 's' | 'z' | 'f') {
        return Some(chars[..n - 1].iter().collect());
    }
    // British doubling after an unstressed -el: modell, travell, cancell.
    if n >= 4 && chars[n - 3..] == ['e', 'l', 'l'] && vowel_groups(&chars) >= 2 {
        return Some(chars[..n - 1].iter().collect());
    }

    if E_RESTORING_ENDINGS.iter().any(|ending| stem.ends_with(ending)) || is_short_cvc(&chars) {
        return Some(format!("{stem}e"));
    }

    Some(stem.to_string())
}

/// Single-syllable stem ending consonant-vowel-consonant (`mak`, `hop`, `scal`).
fn is_short_cvc(chars: &[char]) -> bool {
    let n = chars.len();
    if n < 3 {
        return false;
    }
    let (c1, v, c2) = (chars[n - 3], chars[n - 2], chars[n - 1]);
    vowel_groups(chars) == 1
        && !is_vowel(c1)
        && is_vowel(v)
        && !is_vowel(c2)
        && !matches!(c2, 'w' | 'x' | 'y')
}

fn vowel_groups(chars: &[char]) -> usize {
    chars
        .iter()
        .enumerate()
        .filter(|(i, c)| is_vowel(**c) && (*i == 0 || !is_vowel(chars[i - 1])))
        .count()
}

fn singular(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().count() >= 2 {
            return format!("{stem}y");
        }
    }
    for sibilant in ["sses", "shes", "ches", "xes", "zzes"] {
        if word.ends_with(sibilant) {
            return word[..word.len() - 2].to_string();
        }
    }
    if ["ss", "us"].iter().any(|end| word.ends_with(end)) {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}
