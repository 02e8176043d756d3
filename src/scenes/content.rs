//! Fixed strings shown in the video.

/// The code the player is trying to find.
pub const SECRET: &str = "1234";
/// The player's guess: one bull (1) and one cow (4).
pub const GUESS: &str = "1456";

pub(crate) const TITLE: &str = "Picas y Fijas";
pub(crate) const SECRET_LABEL: &str = "Secret Code";
pub(crate) const GUESS_LABEL: &str = "Your Guess";
pub(crate) const HIDDEN_DIGIT: &str = "?";
pub(crate) const URL: &str = "picasyfijas.com";

pub(crate) const BULL_EMOJI: &str = "🐂";
pub(crate) const COW_EMOJI: &str = "🐄";

pub(crate) const BULL_HEADLINE: Bilingual = Bilingual::new("1 Bull", "1 Fija");
pub(crate) const BULL_CAPTION: Bilingual =
    Bilingual::new("Right number & position", "Número y posición correcta");
pub(crate) const COW_HEADLINE: Bilingual = Bilingual::new("1 Cow", "1 Pica");
pub(crate) const COW_CAPTION: Bilingual = Bilingual::new(
    "Right number, wrong position",
    "Número correcto, posición incorrecta",
);
pub(crate) const CTA_TAGLINE: Bilingual = Bilingual::new("Play now!", "¡Juega ahora!");

/// Caption language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Language {
    /// English.
    English,
    /// Spanish.
    Spanish,
}

/// A string in both caption languages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bilingual {
    /// English text.
    pub english: &'static str,
    /// Spanish text.
    pub spanish: &'static str,
}

impl Bilingual {
    /// Pair an English string with its Spanish translation.
    pub const fn new(english: &'static str, spanish: &'static str) -> Self {
        Self { english, spanish }
    }

    /// Text for `lang`.
    pub fn get(self, lang: Language) -> &'static str {
        match lang {
            Language::English => self.english,
            Language::Spanish => self.spanish,
        }
    }
}

/// Language shown at `local`, flipping every `period` frames.
///
/// Even blocks `floor(local / period)` are English and odd blocks Spanish. Blocks before the
/// scene starts never count as odd. With `after = Some(n)` the caption stays English up to and
/// including frame `n`.
pub fn language_at(local: i64, period: i64, after: Option<i64>) -> Language {
    let block = local.div_euclid(period.max(1));
    let unlocked = after.is_none_or(|n| local > n);
    if block % 2 == 1 && unlocked {
        Language::Spanish
    } else {
        Language::English
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/content.rs"]
mod tests;
