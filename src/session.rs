use crate::model::{Poll, Question, Quiz};

/// 0-based value the poll status endpoint maps to once the poll is closed.
pub const STATUS_CLOSED: i64 = -3;
/// 0-based value meaning no question is open right now.
pub const STATUS_WAITING: i64 = -2;

/// The live poll question as last reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveIndex {
    Unset,
    Closed,
    Waiting,
    Question(usize),
}

impl LiveIndex {
    /// Converts the backend's 1-based index.
    pub fn from_remote(remote: i64) -> Self {
        Self::from_internal(remote - 1)
    }

    pub fn from_internal(index: i64) -> Self {
        match index {
            STATUS_CLOSED => LiveIndex::Closed,
            STATUS_WAITING => LiveIndex::Waiting,
            i if i >= 0 => LiveIndex::Question(i as usize),
            _ => LiveIndex::Waiting,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PollSession {
    pub poll: Poll,
    pub live: LiveIndex,
    /// Set once the answer to the live question went through.
    pub submitted: bool,
}

impl PollSession {
    pub fn init_poll(poll: Poll) -> Self {
        Self {
            poll,
            live: LiveIndex::Unset,
            submitted: false,
        }
    }

    pub fn set_current_question(&mut self, live: LiveIndex) {
        self.live = live;
    }

    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    pub fn clear_submitted(&mut self) {
        self.submitted = false;
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.poll.questions.get(index)
    }
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    pub quiz: Quiz,
    pub current_question: usize,
    pub remaining_seconds: i64,
    pub score: i64,
    answer_seconds: i64,
}

impl QuizSession {
    pub fn init_quiz(quiz: Quiz, answer_seconds: i64) -> Self {
        Self {
            quiz,
            current_question: 0,
            remaining_seconds: answer_seconds,
            score: 0,
            answer_seconds,
        }
    }

    pub fn set_current_question(&mut self, index: usize) {
        self.current_question = index;
    }

    pub fn add_score(&mut self, delta: i64) {
        self.score += delta;
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    pub fn reset_countdown(&mut self) {
        self.remaining_seconds = self.answer_seconds;
    }

    /// One countdown step; returns the seconds left.
    pub fn tick(&mut self) -> i64 {
        self.remaining_seconds -= 1;
        self.remaining_seconds
    }

    pub fn question_count(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn has_question(&self) -> bool {
        self.current_question < self.question_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_index_is_one_based() {
        assert_eq!(LiveIndex::from_remote(1), LiveIndex::Question(0));
        assert_eq!(LiveIndex::from_remote(4), LiveIndex::Question(3));
        assert_eq!(LiveIndex::from_remote(-2), LiveIndex::Closed);
        assert_eq!(LiveIndex::from_remote(-1), LiveIndex::Waiting);
    }

    #[test]
    fn unknown_negative_index_means_waiting() {
        assert_eq!(LiveIndex::from_remote(0), LiveIndex::Waiting);
        assert_eq!(LiveIndex::from_internal(-7), LiveIndex::Waiting);
    }
}
