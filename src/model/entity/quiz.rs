use serde::{Deserialize, Serialize};

use crate::model::{ValidationError, ValidationResult};

/// Quiz definition as authored in the quiz form. Questions keep their
/// authored order; grading happens server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    questions: Vec<QuizQuestion>,
    passing_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_limit_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_attempts: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    prompt: String,
    options: Vec<QuizOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    text: String,
    is_correct: bool,
}

impl Quiz {
    pub fn new(questions: Vec<QuizQuestion>, passing_score: u8) -> Self {
        Self {
            questions,
            passing_score,
            time_limit_minutes: None,
            max_attempts: None,
        }
    }

    pub fn with_time_limit(mut self, minutes: u32) -> Self {
        self.time_limit_minutes = Some(minutes);
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn passing_score(&self) -> u8 {
        self.passing_score
    }

    pub fn time_limit_minutes(&self) -> Option<u32> {
        self.time_limit_minutes
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.questions.is_empty() {
            return Err(ValidationError::EmptyQuiz);
        }
        if self.passing_score == 0 || self.passing_score > 100 {
            return Err(ValidationError::PassingScoreOutOfRange(self.passing_score));
        }
        for (index, question) in self.questions.iter().enumerate() {
            question.validate(index)?;
        }
        Ok(())
    }
}

impl QuizQuestion {
    pub fn new(prompt: impl Into<String>, options: Vec<QuizOption>) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    fn validate(&self, index: usize) -> ValidationResult<()> {
        if self.prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt { index });
        }
        if self.options.len() < 2 {
            return Err(ValidationError::TooFewOptions { index });
        }
        if !self.options.iter().any(|o| o.is_correct) {
            return Err(ValidationError::NoCorrectOption { index });
        }
        Ok(())
    }
}

impl QuizOption {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}
