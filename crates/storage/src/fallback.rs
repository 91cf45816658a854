//! Built-in question set used when the question bank is unreachable or empty.

use trivia_core::model::Question;

use crate::repository::{QuestionRecord, ingest};

#[allow(clippy::too_many_arguments)]
fn record(
    id: i64,
    question: (&str, &str),
    options: [&str; 4],
    options_ar: [&str; 4],
    correct_answer: i64,
    category: &str,
    difficulty: &str,
    explanation: (&str, &str),
) -> QuestionRecord {
    QuestionRecord {
        id,
        question: question.0.to_owned(),
        question_ar: question.1.to_owned(),
        options: options.iter().map(|s| (*s).to_owned()).collect(),
        options_ar: options_ar.iter().map(|s| (*s).to_owned()).collect(),
        correct_answer,
        category: category.to_owned(),
        difficulty: difficulty.to_owned(),
        explanation: Some(explanation.0.to_owned()),
        explanation_ar: Some(explanation.1.to_owned()),
        is_active: true,
    }
}

/// The offline set in its row form, as the seed binary writes it.
#[must_use]
pub fn fallback_records() -> Vec<QuestionRecord> {
    vec![
        record(
            1,
            ("What is the capital of Bahrain?", "ما هي عاصمة البحرين؟"),
            ["Manama", "Dubai", "Doha", "Kuwait City"],
            ["المنامة", "دبي", "الدوحة", "مدينة الكويت"],
            0,
            "Geography",
            "easy",
            (
                "Manama is the capital and largest city of Bahrain.",
                "المنامة هي عاصمة البحرين وأكبر مدينة فيها.",
            ),
        ),
        record(
            2,
            ("Which year did the first iPhone launch?", "في أي عام تم إطلاق أول آيفون؟"),
            ["2006", "2007", "2008", "2009"],
            ["2006", "2007", "2008", "2009"],
            1,
            "Technology",
            "medium",
            (
                "The first iPhone was announced by Steve Jobs on January 9, 2007.",
                "تم الإعلان عن أول آيفون من قِبل ستيف جوبز في 9 يناير 2007.",
            ),
        ),
        record(
            3,
            (
                "What is the largest planet in our solar system?",
                "ما هو أكبر كوكب في نظامنا الشمسي؟",
            ),
            ["Saturn", "Jupiter", "Neptune", "Earth"],
            ["زحل", "المشتري", "نبتون", "الأرض"],
            1,
            "Science",
            "easy",
            (
                "Jupiter is the largest planet in our solar system.",
                "المشتري هو أكبر كوكب في نظامنا الشمسي.",
            ),
        ),
        record(
            4,
            ("Who painted the Mona Lisa?", "من رسم الموناليزا؟"),
            ["Van Gogh", "Picasso", "Leonardo da Vinci", "Michelangelo"],
            ["فان جوخ", "بيكاسو", "ليوناردو دا فينشي", "مايكل أنجلو"],
            2,
            "Art",
            "medium",
            (
                "Leonardo da Vinci painted the Mona Lisa between 1503-1519.",
                "رسم ليوناردو دا فينشي الموناليزا بين عامي 1503-1519.",
            ),
        ),
        record(
            5,
            ("What is the chemical symbol for gold?", "ما هو الرمز الكيميائي للذهب؟"),
            ["Go", "Gd", "Au", "Ag"],
            ["Go", "Gd", "Au", "Ag"],
            2,
            "Science",
            "medium",
            (
                "Au comes from the Latin word 'aurum' meaning gold.",
                "Au يأتي من الكلمة اللاتينية 'aurum' والتي تعني الذهب.",
            ),
        ),
        record(
            6,
            (
                "In which year was the Kingdom of Bahrain's independence declared?",
                "في أي عام أُعلن استقلال مملكة البحرين؟",
            ),
            ["1961", "1968", "1971", "1975"],
            ["1961", "1968", "1971", "1975"],
            2,
            "History",
            "hard",
            (
                "Bahrain declared independence on August 15, 1971.",
                "أعلنت البحرين استقلالها في 15 أغسطس 1971.",
            ),
        ),
    ]
}

/// The offline set as validated questions, in id order.
#[must_use]
pub fn fallback_questions() -> Vec<Question> {
    ingest(fallback_records(), u32::MAX)
}
