//! Word tokenizer for a single line of ATF transliteration.
//!
//! The tokenizer walks the line with a cursor and applies a fixed, ordered
//! list of rules at each position (first match wins):
//!
//! 1. whitespace is skipped
//! 2. `, . ; :` become punctuation
//! 3. `[...]` becomes a broken span (dropped when unterminated)
//! 4. `_..._` becomes a logogram span
//! 5. `{code}word` becomes a prefix determinative
//! 6. otherwise a maximal run of word characters is consumed
//! 7. a run directly followed by `{code}` becomes a suffix determinative
//! 8. a run matching the metrological pattern becomes a numeric token
//! 9. anything else becomes a logogram (all caps) or a plain word
//!
//! Characters no rule accepts are skipped one at a time. Transliteration
//! corpora carry encoding noise and a single bad character must not cost the
//! whole line.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::determinative::lookup_determinative;

static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:/\d+)*(?:\([^()\s]+\))?[#?!]*$").unwrap());

static SIGN_VARIANT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[~@]\w+").unwrap());

/// Where a determinative sits relative to the word it classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeterminativePosition {
    Prefix,
    Suffix,
}

/// A second classifier written after a word that already carries a prefix
/// one, as in `{lu₂}elam{ki}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingDeterminative {
    pub determinative: String,
    pub det_type: String,
    pub det_label: String,
    pub det_display: String,
}

impl TrailingDeterminative {
    fn new(code: &str) -> Self {
        let info = lookup_determinative(code);
        Self {
            determinative: code.to_string(),
            det_type: info.det_type,
            det_label: info.label,
            det_display: info.display,
        }
    }
}

/// A typed token produced from one line of transliteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WordToken {
    /// Word separator punctuation (`,` `.` `;` `:`).
    Punctuation {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lookup_key: Option<String>,
    },
    /// A bracketed broken/restored span.
    Broken {
        /// The span including its brackets.
        text: String,
        /// Content between the brackets.
        inner: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lookup_key: Option<String>,
    },
    /// A sign group read as a whole word.
    Logogram {
        text: String,
        display: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lookup_key: Option<String>,
    },
    /// A word carrying a semantic classifier.
    Determinative {
        /// The classified word, damage markers removed.
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lookup_key: Option<String>,
        /// The code between the braces.
        determinative: String,
        det_type: String,
        det_label: String,
        det_display: String,
        position: DeterminativePosition,
        /// Suffix classifier on a word that also has a prefix one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trailing: Option<TrailingDeterminative>,
        #[serde(default)]
        damaged: bool,
        #[serde(default)]
        uncertain: bool,
        #[serde(default)]
        corrected: bool,
    },
    /// A phonetically written word.
    Word {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lookup_key: Option<String>,
        damaged: bool,
        uncertain: bool,
        corrected: bool,
    },
    /// A number or metrological quantity such as `5(diš)` or `1/2(iku)`.
    Numeric {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lookup_key: Option<String>,
        damaged: bool,
    },
}

impl WordToken {
    /// Original surface form.
    pub fn text(&self) -> &str {
        match self {
            WordToken::Punctuation { text, .. }
            | WordToken::Broken { text, .. }
            | WordToken::Logogram { text, .. }
            | WordToken::Determinative { text, .. }
            | WordToken::Word { text, .. }
            | WordToken::Numeric { text, .. } => text,
        }
    }

    /// Normalized dictionary lookup key, if any.
    pub fn lookup_key(&self) -> Option<&str> {
        match self {
            WordToken::Punctuation { lookup_key, .. }
            | WordToken::Broken { lookup_key, .. }
            | WordToken::Logogram { lookup_key, .. }
            | WordToken::Determinative { lookup_key, .. }
            | WordToken::Word { lookup_key, .. }
            | WordToken::Numeric { lookup_key, .. } => lookup_key.as_deref(),
        }
    }

    /// Whether the token is marked damaged (`#`).
    pub fn is_damaged(&self) -> bool {
        match self {
            WordToken::Determinative { damaged, .. }
            | WordToken::Word { damaged, .. }
            | WordToken::Numeric { damaged, .. } => *damaged,
            _ => false,
        }
    }

    /// Whether the token is marked uncertain (`?`).
    pub fn is_uncertain(&self) -> bool {
        match self {
            WordToken::Determinative { uncertain, .. } | WordToken::Word { uncertain, .. } => {
                *uncertain
            }
            _ => false,
        }
    }

    /// Whether the token is marked corrected (`!`).
    pub fn is_corrected(&self) -> bool {
        match self {
            WordToken::Determinative { corrected, .. } | WordToken::Word { corrected, .. } => {
                *corrected
            }
            _ => false,
        }
    }

    /// Render the token back into ATF.
    pub fn to_atf(&self) -> String {
        match self {
            WordToken::Determinative {
                text,
                determinative,
                position,
                trailing,
                damaged,
                uncertain,
                corrected,
                ..
            } => {
                let word = with_markers(text, *damaged, *uncertain, *corrected);
                match (position, trailing) {
                    (DeterminativePosition::Prefix, Some(trailing)) => {
                        format!("{{{}}}{}{{{}}}", determinative, word, trailing.determinative)
                    }
                    (DeterminativePosition::Prefix, None) => {
                        format!("{{{}}}{}", determinative, word)
                    }
                    (DeterminativePosition::Suffix, _) => format!("{}{{{}}}", word, determinative),
                }
            }
            other => other.text().to_string(),
        }
    }
}

/// Tokenize one line of transliteration.
///
/// The caller strips composite references and surrounding whitespace first.
pub fn tokenize(text: &str) -> Vec<WordToken> {
    Tokenizer::new(text).collect()
}

/// Render tokens back into a single ATF line.
pub fn render_line(tokens: &[WordToken]) -> String {
    tokens
        .iter()
        .map(WordToken::to_atf)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a sign sequence into a dictionary lookup key.
///
/// Removes damage markers, compound-sign notation (`|`, `×`) and subscript
/// index digits, lowercases, then drops sign-variant suffixes (`~a`, `@g`).
/// Returns `None` when nothing is left.
pub fn normalize(text: &str) -> Option<String> {
    let stripped: String = text
        .chars()
        .filter(|&c| !matches!(c, '#' | '?' | '!' | '|' | '×') && !is_subscript_digit(c))
        .collect();
    let lowered = stripped.to_lowercase();
    let key = SIGN_VARIANT.replace_all(&lowered, "");
    let key = key.trim();

    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

/// Cursor-based tokenizer; yields one token per `next` call.
pub struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
}

impl Tokenizer {
    /// Create a tokenizer over a line.
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Index of the next `close` at or after `from`.
    fn find_from(&self, from: usize, close: char) -> Option<usize> {
        self.chars
            .get(from..)?
            .iter()
            .position(|&c| c == close)
            .map(|offset| from + offset)
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Consume a maximal run of word characters.
    fn take_run(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_word_char) {
            self.pos += 1;
        }
        self.slice(start, self.pos)
    }

    /// `[...]` at the cursor. Unterminated spans yield `None` and consume
    /// only the bracket.
    fn broken_span(&mut self) -> Option<WordToken> {
        let start = self.pos;
        let Some(end) = self.find_from(start + 1, ']') else {
            trace!(position = start, "dropping unterminated broken span");
            self.pos += 1;
            return None;
        };
        self.pos = end + 1;
        Some(WordToken::Broken {
            text: self.slice(start, end + 1),
            inner: self.slice(start + 1, end),
            lookup_key: None,
        })
    }

    /// `_..._` at the cursor.
    fn logogram_span(&mut self) -> Option<WordToken> {
        let start = self.pos;
        let Some(end) = self.find_from(start + 1, '_') else {
            trace!(position = start, "dropping unterminated logogram span");
            self.pos += 1;
            return None;
        };
        self.pos = end + 1;

        let inner = self.slice(start + 1, end);
        let display = inner.trim().to_string();
        if display.is_empty() {
            return None;
        }
        Some(WordToken::Logogram {
            text: self.slice(start, end + 1),
            lookup_key: normalize(&display),
            display,
        })
    }

    /// `{code}` at the cursor followed by the word it classifies. A second
    /// `{code}` directly after the word is kept on the same token.
    ///
    /// Empty braces are consumed without producing a token so that the
    /// following word is tokenized on its own.
    fn prefix_determinative(&mut self) -> Option<WordToken> {
        let start = self.pos;
        let Some(end) = self.find_from(start + 1, '}') else {
            trace!(position = start, "dropping unterminated determinative");
            self.pos += 1;
            return None;
        };
        let code = self.slice(start + 1, end);
        self.pos = end + 1;

        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        let word = self.take_run();
        let mut token = determinative_token(code, &word, DeterminativePosition::Prefix);
        if word.is_empty() {
            return Some(token);
        }
        if let (Some(suffix), WordToken::Determinative { trailing, .. }) =
            (self.take_suffix_code(), &mut token)
        {
            *trailing = Some(TrailingDeterminative::new(&suffix));
        }
        Some(token)
    }

    /// Code of a non-empty `{code}` directly at the cursor, consuming it.
    fn take_suffix_code(&mut self) -> Option<String> {
        if self.peek() != Some('{') {
            return None;
        }
        let end = self.find_from(self.pos + 1, '}')?;
        let code = self.slice(self.pos + 1, end);
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        self.pos = end + 1;
        Some(code.to_string())
    }
}

impl Iterator for Tokenizer {
    type Item = WordToken;

    fn next(&mut self) -> Option<WordToken> {
        loop {
            self.skip_whitespace();
            let c = self.peek()?;

            let token = match c {
                ',' | '.' | ';' | ':' => {
                    self.pos += 1;
                    Some(WordToken::Punctuation {
                        text: c.to_string(),
                        lookup_key: None,
                    })
                }
                '[' => self.broken_span(),
                '_' => self.logogram_span(),
                '{' => self.prefix_determinative(),
                _ => {
                    let run = self.take_run();
                    if run.is_empty() {
                        trace!(character = %c, "skipping unrecognized character");
                        self.pos += 1;
                        None
                    } else if let Some(code) = self.take_suffix_code() {
                        Some(determinative_token(&code, &run, DeterminativePosition::Suffix))
                    } else {
                        Some(classify_run(run))
                    }
                }
            };

            if token.is_some() {
                return token;
            }
        }
    }
}

/// Damage/uncertainty/correction markers stripped from a word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Markers {
    damaged: bool,
    uncertain: bool,
    corrected: bool,
}

/// Strip trailing markers in the fixed order `#`, `?`, `!`, at most one of
/// each.
fn strip_markers(run: &str) -> (&str, Markers) {
    let mut rest = run;
    let mut markers = Markers::default();

    if let Some(s) = rest.strip_suffix('#') {
        rest = s;
        markers.damaged = true;
    }
    if let Some(s) = rest.strip_suffix('?') {
        rest = s;
        markers.uncertain = true;
    }
    if let Some(s) = rest.strip_suffix('!') {
        rest = s;
        markers.corrected = true;
    }
    (rest, markers)
}

/// Reattach stripped markers in the order they are stripped from the end.
fn with_markers(text: &str, damaged: bool, uncertain: bool, corrected: bool) -> String {
    let mut word = text.to_string();
    if corrected {
        word.push('!');
    }
    if uncertain {
        word.push('?');
    }
    if damaged {
        word.push('#');
    }
    word
}

fn determinative_token(code: &str, word: &str, position: DeterminativePosition) -> WordToken {
    let info = lookup_determinative(code);
    let (cleaned, markers) = strip_markers(word);
    WordToken::Determinative {
        text: cleaned.to_string(),
        lookup_key: normalize(cleaned),
        determinative: code.to_string(),
        det_type: info.det_type,
        det_label: info.label,
        det_display: info.display,
        position,
        trailing: None,
        damaged: markers.damaged,
        uncertain: markers.uncertain,
        corrected: markers.corrected,
    }
}

/// Rules 8 and 9: numeric, logogram or plain word.
fn classify_run(run: String) -> WordToken {
    if NUMERIC.is_match(&run) {
        return WordToken::Numeric {
            damaged: run.ends_with('#'),
            text: run,
            lookup_key: None,
        };
    }

    let (cleaned, markers) = strip_markers(&run);
    let lookup_key = normalize(cleaned);

    if is_logogram_form(cleaned) {
        WordToken::Logogram {
            display: run.clone(),
            text: run,
            lookup_key,
        }
    } else {
        WordToken::Word {
            text: run,
            lookup_key,
            damaged: markers.damaged,
            uncertain: markers.uncertain,
            corrected: markers.corrected,
        }
    }
}

/// Uppercase sign names (`LUGAL`, `DUMU-MEŠ`, `GA₂`) are read as logograms.
fn is_logogram_form(cleaned: &str) -> bool {
    let mut chars = cleaned.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_alphabetic()
        && first.is_uppercase()
        && cleaned.chars().count() > 1
        && chars.all(|c| {
            (c.is_alphabetic() && c.is_uppercase())
                || c.is_ascii_digit()
                || is_subscript_digit(c)
                || c == '-'
        })
}

fn is_subscript_digit(c: char) -> bool {
    ('₀'..='₉').contains(&c) || c == 'ₓ'
}

fn is_word_char(c: char) -> bool {
    c.is_alphabetic()
        || c.is_ascii_digit()
        || is_subscript_digit(c)
        || matches!(
            c,
            '(' | ')' | '-' | '~' | '@' | '|' | '#' | '?' | '!' | '×' | '+' | '/'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> WordToken {
        match tokenize(text).into_iter().next() {
            Some(token) => token,
            None => panic!("no token for {:?}", text),
        }
    }

    #[test]
    fn test_plain_words() {
        let tokens = tokenize("lugal e₂-gal-la");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].lookup_key(), Some("lugal"));
        assert_eq!(tokens[1].text(), "e₂-gal-la");
        assert_eq!(tokens[1].lookup_key(), Some("e-gal-la"));
    }

    #[test]
    fn test_punctuation() {
        let tokens = tokenize("a-na, be-li₂ : x");
        let kinds: Vec<&str> = tokens.iter().map(|t| t.text()).collect();
        assert_eq!(kinds, vec!["a-na", ",", "be-li₂", ":", "x"]);
        assert!(matches!(tokens[1], WordToken::Punctuation { .. }));
    }

    #[test]
    fn test_broken_span() {
        let tokens = tokenize("[x x] lugal");
        assert_eq!(
            tokens[0],
            WordToken::Broken {
                text: "[x x]".to_string(),
                inner: "x x".to_string(),
                lookup_key: None,
            }
        );
        assert_eq!(tokens[1].text(), "lugal");
    }

    #[test]
    fn test_unterminated_broken_span_is_dropped() {
        let tokens = tokenize("[x lugal");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text()).collect();
        assert_eq!(texts, vec!["x", "lugal"]);
    }

    #[test]
    fn test_logogram_span() {
        match word("_a-sza3_") {
            WordToken::Logogram {
                text,
                display,
                lookup_key,
            } => {
                assert_eq!(text, "_a-sza3_");
                assert_eq!(display, "a-sza3");
                assert_eq!(lookup_key.as_deref(), Some("a-sza3"));
            }
            other => panic!("expected logogram, got {:?}", other),
        }
    }

    #[test]
    fn test_uppercase_logogram() {
        assert!(matches!(word("LUGAL"), WordToken::Logogram { .. }));
        assert!(matches!(word("DUMU-MEŠ"), WordToken::Logogram { .. }));
        assert!(matches!(word("GA₂"), WordToken::Logogram { .. }));
        // A single capital is not a logogram.
        assert!(matches!(word("A"), WordToken::Word { .. }));
    }

    #[test]
    fn test_prefix_determinative() {
        match word("{d}utu") {
            WordToken::Determinative {
                text,
                determinative,
                det_type,
                position,
                ..
            } => {
                assert_eq!(text, "utu");
                assert_eq!(determinative, "d");
                assert_eq!(det_type, "divine");
                assert_eq!(position, DeterminativePosition::Prefix);
            }
            other => panic!("expected determinative, got {:?}", other),
        }
    }

    #[test]
    fn test_suffix_determinative() {
        match word("nibru{ki}") {
            WordToken::Determinative {
                text,
                det_type,
                position,
                ..
            } => {
                assert_eq!(text, "nibru");
                assert_eq!(det_type, "place");
                assert_eq!(position, DeterminativePosition::Suffix);
            }
            other => panic!("expected determinative, got {:?}", other),
        }
    }

    #[test]
    fn test_determinative_carries_damage() {
        match word("{d}inana-me-en#") {
            WordToken::Determinative {
                text,
                damaged,
                lookup_key,
                ..
            } => {
                assert_eq!(text, "inana-me-en");
                assert!(damaged);
                assert_eq!(lookup_key.as_deref(), Some("inana-me-en"));
            }
            other => panic!("expected determinative, got {:?}", other),
        }
    }

    #[test]
    fn test_prefix_and_suffix_on_one_word() {
        let tokens = tokenize("{lu₂}elam{ki} lugal");
        assert_eq!(tokens.len(), 2);
        match &tokens[0] {
            WordToken::Determinative {
                text,
                lookup_key,
                determinative,
                det_type,
                position,
                trailing,
                ..
            } => {
                assert_eq!(text, "elam");
                assert_eq!(lookup_key.as_deref(), Some("elam"));
                assert_eq!(determinative, "lu₂");
                assert_eq!(det_type, "person");
                assert_eq!(*position, DeterminativePosition::Prefix);
                let trailing = trailing.as_ref().expect("trailing determinative");
                assert_eq!(trailing.determinative, "ki");
                assert_eq!(trailing.det_type, "place");
            }
            other => panic!("expected determinative, got {:?}", other),
        }
        assert_eq!(tokens[0].to_atf(), "{lu₂}elam{ki}");
        assert_eq!(render_line(&tokens), "{lu₂}elam{ki} lugal");

        let tokens = tokenize("{d}utu{ki}");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text(), "utu");
    }

    #[test]
    fn test_determinative_keeps_correction() {
        let token = word("{d}utu!");
        assert!(token.is_corrected());
        assert_eq!(token.text(), "utu");
        assert_eq!(token.to_atf(), "{d}utu!");

        assert!(word("nibru!{ki}").is_corrected());
        assert_eq!(word("{d}inana#").to_atf(), "{d}inana#");
        assert!(!word("{d}utu").is_corrected());
    }

    #[test]
    fn test_unknown_determinative() {
        match word("{xyz}abc") {
            WordToken::Determinative {
                det_type,
                det_label,
                det_display,
                ..
            } => {
                assert_eq!(det_type, "other");
                assert_eq!(det_label, "xyz");
                assert_eq!(det_display, "(xyz)");
            }
            other => panic!("expected determinative, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_braces_are_a_no_op() {
        let tokens = tokenize("{}lugal");
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0], WordToken::Word { .. }));
        assert_eq!(tokens[0].text(), "lugal");

        let tokens = tokenize("lugal{} x");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text()).collect();
        assert_eq!(texts, vec!["lugal", "x"]);
    }

    #[test]
    fn test_numeric() {
        assert!(matches!(
            word("5(diš)"),
            WordToken::Numeric { damaged: false, .. }
        ));
        assert!(matches!(
            word("1/2(iku)#"),
            WordToken::Numeric { damaged: true, .. }
        ));
        assert!(matches!(word("12"), WordToken::Numeric { .. }));
        assert!(matches!(word("5-ta"), WordToken::Word { .. }));
    }

    #[test]
    fn test_damage_markers_in_fixed_order() {
        match word("šu#?!") {
            WordToken::Word {
                damaged,
                uncertain,
                corrected,
                ..
            } => {
                // `!` is checked last, so `#` and `?` are still attached.
                assert!(!damaged);
                assert!(!uncertain);
                assert!(corrected);
            }
            other => panic!("expected word, got {:?}", other),
        }

        match word("šu!?#") {
            WordToken::Word {
                damaged,
                uncertain,
                corrected,
                lookup_key,
                ..
            } => {
                assert!(damaged && uncertain && corrected);
                assert_eq!(lookup_key.as_deref(), Some("šu"));
            }
            other => panic!("expected word, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_characters_are_skipped() {
        let tokens = tokenize("a-na \u{fffd} lugal * x");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text()).collect();
        assert_eq!(texts, vec!["a-na", "lugal", "x"]);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("lugal#").as_deref(), Some("lugal"));
        assert_eq!(normalize("E₂-GAL").as_deref(), Some("e-gal"));
        assert_eq!(normalize("|GA₂×AN|").as_deref(), Some("gaan"));
        assert_eq!(normalize("ša~a").as_deref(), Some("ša"));
        assert_eq!(normalize("KA@g").as_deref(), Some("ka"));
        assert_eq!(normalize("#?!"), None);
    }

    #[test]
    fn test_render_round_trip() {
        let line = "{d}utu lugal-e nibru{ki} {lu₂}elam{ki} [x] _e2-gal_ 5(diš) , ša";
        let tokens = tokenize(line);
        assert_eq!(render_line(&tokens), line);
        assert_eq!(tokenize(&render_line(&tokens)), tokens);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(word("lugal")).unwrap();
        assert_eq!(json["type"], "word");
        assert_eq!(json["lookup_key"], "lugal");

        let json = serde_json::to_value(word("{d}utu")).unwrap();
        assert_eq!(json["type"], "determinative");
        assert_eq!(json["position"], "prefix");
    }
}
