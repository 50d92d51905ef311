//! Precompiled regex pattern families, keyed by category, assembled once
//! at startup into a typed table. Scoring is then a pure function of
//! `(text, compiled_tables)`.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("pattern family regex must compile"))
        .collect()
}

pub static HIGH_INTENSITY_EMOTION: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?i)\b(incre[ií]ble|alucinante|brutal|[ée]pico|insane)\b",
        r"(?i)\b(no puedo creer|can't believe|imposible)\b",
        r"(?i)\b(me muero|dying|me parto|hilarious)\b",
        r"!{2,}",
        r"(?i)\b(amor|love|odio|hate) .* (much[ií]simo|so much)\b",
    ])
});

pub static MEMORABILITY_INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?i)\b(recuerda|remember|nunca olvides|never forget)\b",
        r"(?i)\b(siempre|always|para toda la vida|forever)\b",
        r"(?i)\b(historia|story|experiencia|experience)\b",
        r"(?i)\b(primera vez|first time|nunca hab[ií]a|never had)\b",
    ])
});

pub static CATCHY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"\b[A-Z][a-z]+ [A-Z][a-z]+\b",
        r"(?i)\b\d+.*tips?\b",
        r"(?i)\b(secreto|secret|truco|hack|tip)\b",
        "\"[^\"]{10,50}\"",
    ])
});

pub static SHARE_TRIGGERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?i)\b(comparte|share|tag|etiqueta)\b",
        r"(?i)\b(incre[ií]ble|amazing|must see|debes ver)\b",
        r"(?i)\b(no vas a creer|won't believe|check this)\b",
        r"(?i)\b(todos deber[ií]an|everyone should|mundo deber[ií]a)\b",
    ])
});

pub static CONTROVERSY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?i)\b(opini[oó]n|opinion|debate|discussion)\b",
        r"(?i)\b(est[aá]s de acuerdo|do you agree|qu[eé] piensas)\b",
        r"(?i)\b(pol[eé]mica|controversial|divisive)\b",
    ])
});

pub static VALUE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?i)\b(aprende|learn|descubre|discover)\b",
        r"(?i)\b(sab[ií]as que|did you know|fact|dato)\b",
        r"(?i)\b(tip|consejo|advice|hack|truco)\b",
    ])
});

pub static ENGAGEMENT_TRIGGERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?i)\b(comenta|comment|dime|tell me)\b",
        r"(?i)\b(qu[eé] piensas|what do you think|opini[oó]n)\b",
        r"(?i)\b(like si|like if|dale like)\b",
        r"(?i)\b(est[aá]s de acuerdo|do you agree)\b",
        r"(?i)\b(tu experiencia|your experience|les pasa)\b",
    ])
});

pub static RELATABLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?i)\b(todos|everyone|siempre nos pasa|always happens)\b",
        r"(?i)\b(t[ií]pico|typical|cl[aá]sico|classic)\b",
        r"(?i)\b(qui[eé]n m[aá]s|who else|alguien m[aá]s|someone else)\b",
    ])
});

pub static CONVERSATIONAL_INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?i)\b(pero|but|sin embargo|however)\b",
        r"(?i)\b(entonces|so|por eso|therefore)\b",
        r"(?i)\b(adem[aá]s|also|tambi[eé]n|too)\b",
        r"\?.*[.!]",
    ])
});

pub static HOOK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?i)^\s*(espera|wait|para|no vas a creer|incre[ií]ble)",
        r"(?i)^\s*(mira esto|watch this|f[ií]jate|check)",
        r"(?i)^\s*(qu[eé]|what|c[oó]mo|how).*[!?]",
        r"(?i)^\s*(nunca|never|jam[aá]s).*[!.]",
    ])
});

pub static CURIOSITY_BOOSTERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?i)\b(secreto|secret|nunca creer[aá]s|won't believe)\b",
        r"(?i)\b(mira esto|watch this|check|f[ií]jate)\b",
        r"(?i)\b(incre[ií]ble|amazing|insane|brutal)\b",
    ])
});

pub static RETENTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?i)\b(primero|first|paso 1|step 1)\b",
        r"(?i)\b(segundo|second|despu[eé]s|then|next)\b",
        r"(?i)\b(pero eso no es todo|but that's not all)\b",
        r"(?i)\b(espera a ver|wait to see|al final|at the end)\b",
    ])
});

pub static NARRATIVE_TENSION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?i)\b(pero luego|but then|sin embargo|however)\b",
        r"(?i)\b(de repente|suddenly|entonces|then)\b",
        r"(?i)\b(resulta que|turns out|pasa que)\b",
        r"(?i)\b(plot twist|giro|unexpected)\b",
    ])
});

pub static QUESTION_MARK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\?").unwrap());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_patterns_compile_and_match_spanish_hook() {
        let text = "espera a ver esto!".to_lowercase();
        assert!(HOOK_PATTERNS.iter().any(|p| p.is_match(&text)));
    }

    #[test]
    fn high_intensity_matches_repeated_exclamations() {
        assert!(HIGH_INTENSITY_EMOTION.iter().any(|p| p.is_match("wow!!")));
    }
}
