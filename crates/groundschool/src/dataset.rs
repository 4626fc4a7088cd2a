//! Question bank loading.
//!
//! Question sets ship embedded in the binary, one JSON file per
//! category. A directory of replacement files can be loaded instead;
//! categories without a file in that directory are simply empty.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::question::{Category, CategoryFilter, Question};

/// Embedded aerodynamics question set.
const AERODYNAMICS_JSON: &str = include_str!("../questions/aerodynamics.json");
/// Embedded air law question set.
const LEGISLATION_JSON: &str = include_str!("../questions/legislation.json");
/// Embedded engines and instruments question set.
const MATERIALS_JSON: &str = include_str!("../questions/materials.json");
/// Embedded meteorology question set.
const METEOROLOGY_JSON: &str = include_str!("../questions/meteorology.json");
/// Embedded operational procedures question set.
const PRACTICE_JSON: &str = include_str!("../questions/practice.json");

/// On-disk shape of a single question.
///
/// Field names follow the exam dataset export format, hence the
/// non-idiomatic casing.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Question")]
    question: String,
    #[serde(rename = "Answer1")]
    answer1: String,
    #[serde(rename = "Answer2")]
    answer2: String,
    #[serde(rename = "Answer3")]
    answer3: String,
    #[serde(rename = "Answer4")]
    answer4: String,
    #[serde(rename = "Answer")]
    answer: u8,
    #[serde(rename = "ImageID", default)]
    image_id: Option<String>,
}

impl RawQuestion {
    fn into_question(self, category: Category) -> Question {
        Question {
            id: self.id,
            category,
            text: self.question,
            options: [self.answer1, self.answer2, self.answer3, self.answer4],
            answer: self.answer,
            image_id: self.image_id,
        }
    }
}

/// The full set of questions available to a study session.
///
/// Questions are stored in category order: all aerodynamics questions
/// first, then legislation, and so on. Indices into this ordering are
/// stable for the lifetime of the bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Builds the bank from the question sets embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatasetParse`] if an embedded set fails to
    /// parse. This indicates a packaging defect rather than a user
    /// error.
    pub fn builtin() -> Result<Self> {
        let sets = [
            (Category::Aerodynamics, AERODYNAMICS_JSON),
            (Category::Legislation, LEGISLATION_JSON),
            (Category::Materials, MATERIALS_JSON),
            (Category::Meteorology, METEOROLOGY_JSON),
            (Category::Practice, PRACTICE_JSON),
        ];

        let mut questions = Vec::new();
        for (category, json) in sets {
            questions.extend(parse_set(json, category)?);
        }
        debug!(count = questions.len(), "loaded embedded question sets");
        Ok(Self { questions })
    }

    /// Loads question sets from a directory.
    ///
    /// Each category reads `<category>.json` (for example
    /// `aerodynamics.json`). A category whose file does not exist is
    /// loaded empty, so partial directories are fine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatasetRead`] when a set file exists but
    /// cannot be read, and [`Error::DatasetParse`] when a file is not
    /// valid question JSON.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut questions = Vec::new();
        for category in Category::ALL {
            let path = dir.join(format!("{}.json", category.name()));
            let json = match std::fs::read_to_string(&path) {
                Ok(json) => json,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    debug!(category = category.name(), "no question set file, category empty");
                    continue;
                }
                Err(err) => {
                    return Err(Error::DatasetRead {
                        path,
                        source: err,
                    });
                }
            };
            questions.extend(parse_set(&json, category)?);
        }
        debug!(
            dir = %dir.display(),
            count = questions.len(),
            "loaded question sets from directory"
        );
        Ok(Self { questions })
    }

    /// Builds a bank directly from a list of questions.
    #[must_use]
    pub fn from_questions(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Number of questions across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the bank holds no questions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The question at a bank index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// All questions in bank order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Bank indices of the questions a filter admits, in bank order.
    #[must_use]
    pub fn eligible(&self, filter: CategoryFilter) -> Vec<usize> {
        self.questions
            .iter()
            .enumerate()
            .filter(|(_, question)| filter.matches(question.category))
            .map(|(index, _)| index)
            .collect()
    }

    /// Number of questions in one category.
    #[must_use]
    pub fn count_in(&self, category: Category) -> usize {
        self.questions
            .iter()
            .filter(|question| question.category == category)
            .count()
    }
}

/// Parses one category's question set from JSON.
///
/// # Errors
///
/// Returns [`Error::DatasetParse`] tagged with the category name when
/// the JSON does not match the expected shape.
fn parse_set(json: &str, category: Category) -> Result<Vec<Question>> {
    let raw: Vec<RawQuestion> = serde_json::from_str(json).map_err(|err| Error::DatasetParse {
        category: category.name().to_string(),
        source: err,
    })?;
    Ok(raw
        .into_iter()
        .map(|question| question.into_question(category))
        .collect())
}
