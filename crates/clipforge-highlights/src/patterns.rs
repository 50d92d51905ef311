//! Precompiled regex pattern families for Phase 4 scoring, keyed by
//! category into a typed table, precompiled once via
//! `once_cell::sync::Lazy`, grounded directly on
//! `deepseek_analyzer.py::ViralContentDetector.viral_patterns`.

use once_cell::sync::Lazy;
use regex::Regex;

/// One viral-content category: its match patterns and its contribution
/// weight in the weighted-average base score.
pub struct PatternFamily {
    pub patterns: Vec<Regex>,
    pub weight: f64,
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).expect("pattern family regex must compile")).collect()
}

pub static VIRAL_CONTENT_FAMILIES: Lazy<Vec<PatternFamily>> = Lazy::new(|| {
    vec![
        PatternFamily {
            patterns: compile(&[
                r"(?i)\b(incre[ií]ble|impresionante|alucinante|brutal|[ée]pico)\b",
                r"(?i)\b(no puedo creer|no way|imposible|qu[eé] locura)\b",
                r"(?i)\b(amor|odio|detesto|adoro|fascina)\b",
                r"(?i)\b(perfecto|horrible|terrible|maravilloso)\b",
            ]),
            weight: 2.5,
        },
        PatternFamily {
            patterns: compile(&[
                r"(?i)\b(wow|guau|ostras|joder|madre m[ií]a)\b",
                r"(?i)\b(en serio|de verdad|no me digas|qu[eé] fuerte)\b",
                r"(?i)\b(me muero|me parto|me cago)\b",
                r"!{2,}|\?{2,}",
            ]),
            weight: 2.0,
        },
        PatternFamily {
            patterns: compile(&[
                r"(?i)\b(gracioso|divertido|chistoso|c[oó]mico)\b",
                r"(?i)\b(jajaja|jejeje|jijijij)\b",
                r"(?i)\b(meme|viral|tendencia|trend)\b",
                r"(?i)\b(risa|re[ií]r|carcajada)\b",
            ]),
            weight: 1.8,
        },
        PatternFamily {
            patterns: compile(&[
                r"(?i)\b(pol[eé]mico|controversial|esc[aá]ndalo)\b",
                r"(?i)\b(opini[oó]n|debate|discusi[oó]n|problema)\b",
                r"(?i)\b(critica|defiende|ataca|pol[eé]mica)\b",
            ]),
            weight: 1.5,
        },
        PatternFamily {
            patterns: compile(&[
                r"(?i)\b(ahora|inmediatamente|urgente|r[aá]pido)\b",
                r"(?i)\b(limitado|exclusivo|por tiempo limitado)\b",
                r"(?i)\b([uú]ltima oportunidad|no te pierdas)\b",
            ]),
            weight: 1.3,
        },
        PatternFamily {
            patterns: compile(&[
                r"(?i)\b(secreto|truco|tip|consejo|hack)\b",
                r"(?i)\b(aprende|descubre|revela|desvela)\b",
                r"(?i)\b(m[eé]todo|t[eé]cnica|estrategia|f[oó]rmula)\b",
            ]),
            weight: 1.2,
        },
    ]
});

pub static ANTI_VIRAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\b(aburrido|mon[oó]tono|lento|pesado)\b",
        r"(?i)\b(complicado|dif[ií]cil|complejo|t[eé]cnico)\b",
        r"(?i)\b(largo|extenso|detallado|exhaustivo)\b",
        r"(?i)\b(obvio|evidente|normal|t[ií]pico)\b",
    ])
});

pub static CONVERSATION_FLOW_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\b(pero|sin embargo|aunque|adem[aá]s|tambi[eé]n)\b",
        r"(?i)\b(entonces|por eso|as[ií] que|por tanto)\b",
        r"(?i)\b(primero|segundo|despu[eé]s|finalmente)\b",
        r"(?i)\b(por ejemplo|es decir|o sea|vamos)\b",
        r"\?",
        r"(?i)\b(mira|f[ií]jate|imag[ií]nate|piensa)\b",
    ])
});

/// Matches a duration the remote model may have embedded in a `reason`
/// string, e.g. "12s" or "cut at 30 seconds".
pub static SUGGESTED_DURATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d+(?:\.\d+)?)(?:s|sec|secs)?\b").unwrap());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viral_families_match_expected_examples() {
        let lower = "no puedo creer esto, wow!!".to_lowercase();
        let matched = VIRAL_CONTENT_FAMILIES
            .iter()
            .any(|family| family.patterns.iter().any(|p| p.is_match(&lower)));
        assert!(matched);
    }

    #[test]
    fn anti_viral_patterns_match_boring_text() {
        assert!(ANTI_VIRAL_PATTERNS.iter().any(|p| p.is_match("esto es muy aburrido y lento")));
    }

    #[test]
    fn suggested_duration_extracts_first_number() {
        let caps = SUGGESTED_DURATION.captures("cut at 12s for maximum impact").unwrap();
        assert_eq!(&caps[1], "12");
    }
}
