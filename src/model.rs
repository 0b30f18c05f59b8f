use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "answer_text")]
    pub text: String,
    #[serde(default)]
    pub correct: bool,
    /// Position of the answer in the source spreadsheet row (answers may be shuffled).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    /// What the player checked; only filled in when the question is evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question_text")]
    pub text: String,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

impl Question {
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.correct).count()
    }

    /// Anything but exactly one correct answer gets independent checkboxes.
    pub fn is_multi_choice(&self) -> bool {
        self.correct_count() != 1
    }

    /// All-or-nothing grading of the player's input against the answer key.
    ///
    /// `selected[i]` is the state of the control bound to answer `i`; missing
    /// entries count as unchecked. Records `answered` on every answer and
    /// `success` on the question.
    pub fn evaluate(&mut self, selected: &[bool]) -> bool {
        let mut correct = true;
        for (i, answer) in self.answers.iter_mut().enumerate() {
            let answered = selected.get(i).copied().unwrap_or(false);
            if answered != answer.correct {
                correct = false;
            }
            answer.answered = Some(answered);
        }
        self.success = Some(correct);
        correct
    }

    /// 1-based positions of the answers the player checked.
    pub fn answered_numbers(&self) -> Vec<usize> {
        self.answers
            .iter()
            .enumerate()
            .filter(|(_, a)| a.answered == Some(true))
            .map(|(i, _)| i + 1)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub document_id: String,
    pub title: String,
    #[serde(rename = "internal_data_sheet")]
    pub internal_data_sheet_id: String,
    #[serde(rename = "responses_sheet")]
    pub responses_sheet_id: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub document_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "image", default)]
    pub image_url: String,
    #[serde(rename = "leaderboard_sheet")]
    pub leaderboard_sheet_id: String,
    #[serde(rename = "statistics_sheet", default, skip_serializing_if = "Option::is_none")]
    pub statistics_sheet_id: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Attached once, right before the quiz is submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

/// Body of `POST /api/poll/submit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollSubmission {
    pub anonymous: bool,
    pub success: bool,
    pub question_number: usize,
    pub document_id: String,
    pub sheet_id: String,
    /// Comma-joined 1-based answer positions, e.g. `"1,3"`.
    pub answers: String,
}

impl PollSubmission {
    pub fn new(poll: &Poll, index: usize, question: &Question, success: bool) -> Self {
        let answers = question
            .answered_numbers()
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",");
        Self {
            anonymous: question.anonymous,
            success,
            question_number: index + 1,
            document_id: poll.document_id.clone(),
            sheet_id: poll.responses_sheet_id.clone(),
            answers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(rename = "ldap")]
    pub display_name: String,
    #[serde(deserialize_with = "score_from_number_or_text")]
    pub score: i64,
}

/// Highest score first; entries with equal scores keep their fetch order.
pub fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    // sort_by is stable
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}

fn score_from_number_or_text<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_json::Value::deserialize(deserializer)?;
    match &value {
        // Whole floats like 12.0 come out of the spreadsheet; 12.9 does not count
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .ok_or_else(|| D::Error::custom(format!("invalid score {}", n))),
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(0),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("invalid score {:?}", s))),
        other => Err(D::Error::custom(format!("invalid score {}", other))),
    }
}
