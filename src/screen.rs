//! Everything the player sees, as plain data.
//!
//! Controllers write into a [`Screen`]; the terminal layer only draws it.
//! Which regions are visible is derived from the single [`Panel`] value, so
//! two primary panels can never show at once.

use chrono::Local;

use crate::model::{rank, LeaderboardEntry, Question};

pub const HINT_TEXT: &str = "Multiple answers allowed";
pub const SUBMIT_LABEL: &str = "Submit";
pub const BUSY_LABEL: &str = "Submitting ...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Status,
    Info,
    Question,
    Leaderboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Status,
    Info,
    Question,
    Leaderboard,
    Hint,
    LastScore,
}

/// User actions the controllers react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Select or toggle the answer control at this position.
    Select(usize),
    ToggleCursor,
    MoveCursor(isize),
    SubmitAnswer,
    StartQuiz,
    ShowLeaderboard,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerControl {
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone)]
pub struct Screen {
    pub panel: Panel,
    pub title: String,
    pub status_text: String,
    pub description: String,
    pub image_url: String,
    pub question_text: String,
    /// Checkboxes when true, mutually exclusive choices otherwise.
    pub multi_choice: bool,
    pub controls: Vec<AnswerControl>,
    pub cursor: usize,
    pub feedback: Option<Feedback>,
    pub timer_value: Option<String>,
    pub score_value: Option<i64>,
    pub submit_label: String,
    pub back_label: String,
    pub last_score: Option<i64>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub leaderboard_fetched_at: Option<String>,
    /// The last leaderboard fetch failed; nothing more is coming.
    pub leaderboard_unavailable: bool,
    /// One-line message for failures that do not change the panel.
    pub notice: Option<String>,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub fn new() -> Self {
        Self {
            panel: Panel::Status,
            title: String::new(),
            status_text: "Loading ...".to_string(),
            description: String::new(),
            image_url: String::new(),
            question_text: String::new(),
            multi_choice: false,
            controls: Vec::new(),
            cursor: 0,
            feedback: None,
            timer_value: None,
            score_value: None,
            submit_label: SUBMIT_LABEL.to_string(),
            back_label: "Back".to_string(),
            last_score: None,
            leaderboard: Vec::new(),
            leaderboard_fetched_at: None,
            leaderboard_unavailable: false,
            notice: None,
        }
    }

    pub fn show(&mut self, panel: Panel) {
        self.panel = panel;
    }

    pub fn show_status(&mut self, text: &str) {
        self.status_text = text.to_string();
        self.panel = Panel::Status;
    }

    pub fn is_visible(&self, region: Region) -> bool {
        match region {
            Region::Status => self.panel == Panel::Status,
            Region::Info => self.panel == Panel::Info,
            Region::Question => self.panel == Panel::Question,
            Region::Leaderboard => self.panel == Panel::Leaderboard,
            Region::Hint => self.panel == Panel::Question && self.multi_choice,
            Region::LastScore => self.panel == Panel::Leaderboard && self.last_score.is_some(),
        }
    }

    /// Replaces the answer controls with fresh, unchecked ones for `question`.
    pub fn render_question(&mut self, question: &Question) {
        self.question_text = question.text.clone();
        self.multi_choice = question.is_multi_choice();
        self.controls = question
            .answers
            .iter()
            .map(|a| AnswerControl {
                label: a.text.clone(),
                checked: false,
            })
            .collect();
        self.cursor = 0;
        self.submit_label = SUBMIT_LABEL.to_string();
        self.panel = Panel::Question;
    }

    /// Checkbox: flips the control. Choice: selects it and clears the others.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.controls.len() {
            return;
        }
        self.cursor = index;
        if self.multi_choice {
            self.controls[index].checked = !self.controls[index].checked;
        } else {
            for (i, control) in self.controls.iter_mut().enumerate() {
                control.checked = i == index;
            }
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.controls.is_empty() {
            return;
        }
        let last = self.controls.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }

    pub fn selections(&self) -> Vec<bool> {
        self.controls.iter().map(|c| c.checked).collect()
    }

    pub fn apply_feedback(&mut self, correct: bool) {
        self.feedback = Some(if correct {
            Feedback::Correct
        } else {
            Feedback::Incorrect
        });
    }

    pub fn clear_feedback(&mut self) {
        self.feedback = None;
    }

    pub fn render_leaderboard(&mut self, entries: Vec<LeaderboardEntry>) {
        self.leaderboard = rank(entries);
        self.leaderboard_fetched_at = Some(Local::now().format("%H:%M:%S").to_string());
        self.leaderboard_unavailable = false;
    }

    pub fn leaderboard_lines(&self) -> Vec<String> {
        self.leaderboard
            .iter()
            .map(|e| format!("{} ({})", e.display_name, e.score))
            .collect()
    }
}
