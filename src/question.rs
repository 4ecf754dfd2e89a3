use crate::api::{CreatedSession, NextKind, NextResolution};
use serde::{Deserialize, Serialize};

/// An interview question as shown to the user.
///
/// Root questions carry their own 1-based `order`; follow-ups keep the root's
/// text as the main prompt and share the root's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u64,
    /// Main prompt text (the root question's text for follow-ups)
    pub main_text: String,
    /// Secondary prompt shown for follow-up questions
    pub sub_text: Option<String>,
    /// 1-based position among root questions
    pub order: u32,
}

impl Question {
    /// The first question of a freshly created session is always root #1
    pub fn first(created: &CreatedSession) -> Self {
        Self {
            id: created.first_question_id,
            main_text: created.first_question_text.clone(),
            sub_text: None,
            order: 1,
        }
    }

    pub fn is_follow_up(&self) -> bool {
        self.sub_text.is_some()
    }
}

/// What the user should be shown next, decoded from a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    Question(Question),
    SessionComplete,
}

/// Decode a next-question resolution into the next step.
///
/// The mapping is identical for poll and timeout results:
/// - `ROOT` becomes a new top-level question at the server-provided root index
/// - `FOLLOW_UP` keeps the current order; the root text stays the main prompt
///   and the follow-up text becomes the secondary prompt
/// - `NONE` (or a resolution without a question id) ends the session
pub fn decode_next(next: Option<&NextResolution>, current_order: u32) -> NextStep {
    let Some(next) = next else {
        return NextStep::SessionComplete;
    };

    let Some(question_id) = next.next_question_id else {
        return NextStep::SessionComplete;
    };

    match next.kind {
        NextKind::None => NextStep::SessionComplete,
        NextKind::Root => NextStep::Question(Question {
            id: question_id,
            main_text: next.next_question_text.clone().unwrap_or_default(),
            sub_text: None,
            order: next.root_index.unwrap_or(current_order),
        }),
        NextKind::FollowUp => NextStep::Question(Question {
            id: question_id,
            main_text: next.root_text.clone().unwrap_or_default(),
            sub_text: Some(next.next_question_text.clone().unwrap_or_default()),
            order: current_order,
        }),
    }
}
