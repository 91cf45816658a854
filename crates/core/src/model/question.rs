use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("prompt cannot be empty ({locale})")]
    EmptyPrompt { locale: Locale },

    #[error("expected 4 options ({locale}), found {found}")]
    OptionCount { locale: Locale, found: usize },

    #[error("option {index} cannot be empty ({locale})")]
    EmptyOption { locale: Locale, index: usize },

    #[error("correct option {index} is out of range")]
    CorrectOptionOutOfRange { index: i64 },

    #[error("category cannot be empty")]
    EmptyCategory,

    #[error("explanation cannot be empty when present ({locale})")]
    EmptyExplanation { locale: Locale },

    #[error("unknown difficulty: {raw}")]
    InvalidDifficulty { raw: String },
}

//
// ─── LOCALE ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

impl Locale {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Arabic => "ar",
        }
    }

    /// Arabic renders right-to-left.
    #[must_use]
    pub fn is_rtl(self) -> bool {
        matches!(self, Locale::Arabic)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A piece of text carried in both supported locales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    pub ar: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    #[must_use]
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::English => &self.en,
            Locale::Arabic => &self.ar,
        }
    }

    /// First locale whose text is blank, if any.
    fn blank_locale(&self) -> Option<Locale> {
        [Locale::English, Locale::Arabic]
            .into_iter()
            .find(|locale| self.get(*locale).trim().is_empty())
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(QuestionError::InvalidDifficulty { raw: s.to_owned() }),
        }
    }
}

//
// ─── QUESTION DRAFT ────────────────────────────────────────────────────────────
//

/// Unvalidated question as it arrives from the question bank.
///
/// Options are kept as raw per-locale lists so that a malformed row can be
/// reported instead of silently padded or truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub prompt: LocalizedText,
    pub options_en: Vec<String>,
    pub options_ar: Vec<String>,
    pub correct_option: i64,
    pub category: String,
    pub difficulty: Difficulty,
    pub explanation: Option<LocalizedText>,
}

impl QuestionDraft {
    /// Check the draft and turn it into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when any field breaks the question invariants:
    /// blank text, an option list that is not exactly `OPTION_COUNT` long, or a
    /// correct option index outside the option bounds.
    pub fn validate(self) -> Result<Question, QuestionError> {
        if let Some(locale) = self.prompt.blank_locale() {
            return Err(QuestionError::EmptyPrompt { locale });
        }

        check_options(Locale::English, &self.options_en)?;
        check_options(Locale::Arabic, &self.options_ar)?;

        let correct_option = usize::try_from(self.correct_option)
            .ok()
            .filter(|index| *index < OPTION_COUNT)
            .ok_or(QuestionError::CorrectOptionOutOfRange {
                index: self.correct_option,
            })?;

        let category = self.category.trim().to_owned();
        if category.is_empty() {
            return Err(QuestionError::EmptyCategory);
        }

        if let Some(locale) = self.explanation.as_ref().and_then(LocalizedText::blank_locale) {
            return Err(QuestionError::EmptyExplanation { locale });
        }

        let options: [LocalizedText; OPTION_COUNT] = self
            .options_en
            .into_iter()
            .zip(self.options_ar)
            .map(|(en, ar)| LocalizedText::new(en, ar))
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|paired: Vec<LocalizedText>| QuestionError::OptionCount {
                locale: Locale::English,
                found: paired.len(),
            })?;

        Ok(Question {
            id: self.id,
            prompt: self.prompt,
            options,
            correct_option,
            category,
            difficulty: self.difficulty,
            explanation: self.explanation,
        })
    }
}

fn check_options(locale: Locale, options: &[String]) -> Result<(), QuestionError> {
    if options.len() != OPTION_COUNT {
        return Err(QuestionError::OptionCount {
            locale,
            found: options.len(),
        });
    }
    if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
        return Err(QuestionError::EmptyOption { locale, index });
    }
    Ok(())
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    prompt: LocalizedText,
    options: [LocalizedText; OPTION_COUNT],
    correct_option: usize,
    category: String,
    difficulty: Difficulty,
    explanation: Option<LocalizedText>,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &LocalizedText {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[LocalizedText; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&LocalizedText> {
        self.options.get(index)
    }

    #[must_use]
    pub fn correct_option(&self) -> usize {
        self.correct_option
    }

    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_option
    }

    /// Option indices that are not the correct answer, in option order.
    pub fn incorrect_options(&self) -> impl Iterator<Item = usize> + '_ {
        (0..OPTION_COUNT).filter(move |index| *index != self.correct_option)
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&LocalizedText> {
        self.explanation.as_ref()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            id: QuestionId::new(1),
            prompt: LocalizedText::new("What is the capital of Bahrain?", "ما هي عاصمة البحرين؟"),
            options_en: vec!["Manama".into(), "Dubai".into(), "Doha".into(), "Kuwait City".into()],
            options_ar: vec!["المنامة".into(), "دبي".into(), "الدوحة".into(), "مدينة الكويت".into()],
            correct_option: 0,
            category: "Geography".into(),
            difficulty: Difficulty::Easy,
            explanation: Some(LocalizedText::new(
                "Manama is the capital.",
                "المنامة هي العاصمة.",
            )),
        }
    }

    #[test]
    fn valid_draft_builds_question() {
        let question = draft().validate().unwrap();
        assert_eq!(question.id(), QuestionId::new(1));
        assert_eq!(question.correct_option(), 0);
        assert_eq!(question.option(2).unwrap().get(Locale::English), "Doha");
        assert_eq!(question.option(2).unwrap().get(Locale::Arabic), "الدوحة");
        assert!(question.option(4).is_none());
        assert_eq!(question.incorrect_options().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn correct_option_must_be_in_bounds() {
        let mut d = draft();
        d.correct_option = 4;
        assert_eq!(
            d.validate().unwrap_err(),
            QuestionError::CorrectOptionOutOfRange { index: 4 }
        );

        let mut d = draft();
        d.correct_option = -1;
        assert!(matches!(
            d.validate(),
            Err(QuestionError::CorrectOptionOutOfRange { index: -1 })
        ));
    }

    #[test]
    fn option_lists_must_have_four_entries_per_locale() {
        let mut d = draft();
        d.options_ar.pop();
        assert_eq!(
            d.validate().unwrap_err(),
            QuestionError::OptionCount {
                locale: Locale::Arabic,
                found: 3
            }
        );
    }

    #[test]
    fn blank_text_is_rejected() {
        let mut d = draft();
        d.prompt.ar = "  ".into();
        assert_eq!(
            d.validate().unwrap_err(),
            QuestionError::EmptyPrompt {
                locale: Locale::Arabic
            }
        );

        let mut d = draft();
        d.options_en[1] = String::new();
        assert_eq!(
            d.validate().unwrap_err(),
            QuestionError::EmptyOption {
                locale: Locale::English,
                index: 1
            }
        );

        let mut d = draft();
        d.category = " ".into();
        assert_eq!(d.validate().unwrap_err(), QuestionError::EmptyCategory);
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" medium ".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!(matches!(
            "expert".parse::<Difficulty>(),
            Err(QuestionError::InvalidDifficulty { .. })
        ));
    }

    #[test]
    fn arabic_is_right_to_left() {
        assert!(Locale::Arabic.is_rtl());
        assert!(!Locale::English.is_rtl());
    }
}
