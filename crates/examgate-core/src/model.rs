//! Core data model types for examgate.
//!
//! A `Test` is a named, ordered list of `Question`s. Grading a test against a
//! list of answers produces a `Score`.

use std::fmt;

/// A prompt paired with its single correct answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    correct_answer: String,
}

impl Question {
    pub fn new(prompt: impl Into<String>, correct_answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            correct_answer: correct_answer.into(),
        }
    }

    /// The text shown to the student.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Exact comparison: case and whitespace both matter.
    pub fn check_answer(&self, candidate: &str) -> bool {
        candidate == self.correct_answer
    }
}

/// A named, ordered collection of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Test {
    name: String,
    questions: Vec<Question>,
}

impl Test {
    /// Create an empty test.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            questions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Questions in insertion order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Append a question at the end of the test.
    pub fn add_question(&mut self, question: Question) {
        self.questions.push(question);
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Grade a set of answers, paired positionally with the questions.
    ///
    /// Missing answers count as wrong; surplus answers are ignored.
    pub fn grade<S: AsRef<str>>(&self, answers: &[S]) -> Score {
        let correct = self
            .questions
            .iter()
            .zip(answers)
            .filter(|(q, a)| q.check_answer(a.as_ref()))
            .count();
        Score {
            correct,
            total: self.questions.len(),
        }
    }
}

/// The outcome of one test attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    /// Number of questions answered correctly.
    pub correct: usize,
    /// Number of questions in the test.
    pub total: usize,
}

impl Score {
    pub fn is_perfect(&self) -> bool {
        self.correct == self.total
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.correct, self.total)
    }
}
