//! # Session Types
//!
//! Conversation messages, the onboarding stage and the read-only snapshot the
//! presentation layer renders from.

use serde::{Deserialize, Serialize};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Assistant => write!(f, "assistant"),
        }
    }
}

/// Sequence number of a message within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One turn in the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    sender: Sender,
    text: String,
    timestamp: String,
}

impl Message {
    pub(crate) fn new(
        id: MessageId,
        sender: Sender,
        text: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id,
            sender,
            text: text.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Display-formatted creation time, e.g. `2:30 PM`
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_assistant(&self) -> bool {
        self.sender == Sender::Assistant
    }
}

/// Onboarding progress step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    DefineGoal,
    SetFrequency,
    ScheduleTime,
    ConfirmPlan,
}

impl Stage {
    pub const FIRST: Stage = Stage::DefineGoal;
    pub const LAST: Stage = Stage::ConfirmPlan;
    pub const COUNT: u8 = 4;

    /// All stages in order
    pub const ALL: [Stage; 4] = [
        Stage::DefineGoal,
        Stage::SetFrequency,
        Stage::ScheduleTime,
        Stage::ConfirmPlan,
    ];

    /// Stage for `n`, clamped into `1..=4`
    pub fn clamped(n: i64) -> Self {
        match n {
            i64::MIN..=1 => Stage::DefineGoal,
            2 => Stage::SetFrequency,
            3 => Stage::ScheduleTime,
            _ => Stage::ConfirmPlan,
        }
    }

    /// 1-based ordinal
    pub fn number(self) -> u8 {
        match self {
            Stage::DefineGoal => 1,
            Stage::SetFrequency => 2,
            Stage::ScheduleTime => 3,
            Stage::ConfirmPlan => 4,
        }
    }

    /// The following stage; `ConfirmPlan` has none.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::DefineGoal => Some(Stage::SetFrequency),
            Stage::SetFrequency => Some(Stage::ScheduleTime),
            Stage::ScheduleTime => Some(Stage::ConfirmPlan),
            Stage::ConfirmPlan => None,
        }
    }

    pub fn is_last(self) -> bool {
        self == Stage::LAST
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::DefineGoal => "Define Goal",
            Stage::SetFrequency => "Set Frequency",
            Stage::ScheduleTime => "Schedule Time",
            Stage::ConfirmPlan => "Confirm Plan",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Stage::DefineGoal => "What do you want to achieve?",
            Stage::SetFrequency => "How often will you do it?",
            Stage::ScheduleTime => "When will you do it?",
            Stage::ConfirmPlan => "Review and commit",
        }
    }

    /// Short summary of the goal shown while this stage is current
    pub fn goal_preview(self) -> &'static str {
        match self {
            Stage::DefineGoal => "Not set yet",
            Stage::SetFrequency => "Defining frequency...",
            Stage::ScheduleTime => "Setting schedule...",
            Stage::ConfirmPlan => "Ready to confirm!",
        }
    }

    /// Share of the flow reached at this stage, rounded to a whole percent
    pub fn progress_percent(self) -> u8 {
        // n / 4 * 100 is exact for every stage
        self.number() * 100 / Self::COUNT
    }

    /// How this stage should be drawn when `current` is the active one
    pub fn status_relative_to(self, current: Stage) -> StepStatus {
        match self.cmp(&current) {
            std::cmp::Ordering::Less => StepStatus::Completed,
            std::cmp::Ordering::Equal => StepStatus::Active,
            std::cmp::Ordering::Greater => StepStatus::Upcoming,
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::FIRST
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.number(), self.label())
    }
}

/// Progress indicator state of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Active,
    Upcoming,
}

/// Owned copy of the session state, taken under the session lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub transcript: Vec<Message>,
    pub awaiting_reply: bool,
    pub stage: Stage,
}

impl SessionSnapshot {
    /// Quick-pick suggestions are only offered while defining the goal
    pub fn suggestions_visible(&self) -> bool {
        self.stage == Stage::DefineGoal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_clamping() {
        assert_eq!(Stage::clamped(0), Stage::DefineGoal);
        assert_eq!(Stage::clamped(-7), Stage::DefineGoal);
        assert_eq!(Stage::clamped(1), Stage::DefineGoal);
        assert_eq!(Stage::clamped(3), Stage::ScheduleTime);
        assert_eq!(Stage::clamped(10), Stage::ConfirmPlan);
        assert_eq!(Stage::clamped(i64::MAX), Stage::ConfirmPlan);
    }

    #[test]
    fn test_stage_progression_stops_at_last() {
        let mut stage = Stage::FIRST;
        let mut visited = vec![stage.number()];
        while let Some(next) = stage.next() {
            stage = next;
            visited.push(stage.number());
        }
        assert_eq!(visited, vec![1, 2, 3, 4]);
        assert!(stage.is_last());
    }

    #[test]
    fn test_progress_percent() {
        let percents: Vec<u8> = Stage::ALL.iter().map(|s| s.progress_percent()).collect();
        assert_eq!(percents, vec![25, 50, 75, 100]);
    }

    #[test]
    fn test_step_status() {
        let current = Stage::ScheduleTime;
        assert_eq!(Stage::DefineGoal.status_relative_to(current), StepStatus::Completed);
        assert_eq!(Stage::ScheduleTime.status_relative_to(current), StepStatus::Active);
        assert_eq!(Stage::ConfirmPlan.status_relative_to(current), StepStatus::Upcoming);
    }

    #[test]
    fn test_sender_serialization() {
        let json = serde_json::to_string(&Sender::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
