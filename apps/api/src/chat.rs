//! Rule-based replies for the portfolio Q&A widget.
//!
//! Deterministic, no inference: the reply is picked from a fixed rule table
//! keyed on the last user turn. Keeps the widget working on deployments
//! with no AI service behind them.

use axum::Json;
use portfolio_client::{Role, Turn};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<Turn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/chat
///
/// Answers from the rule table. A missing or empty message list is a 400.
pub async fn handle_chat(
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.messages.is_empty() {
        return Err(AppError::Validation(
            "messages field must be a non-empty list".to_string(),
        ));
    }

    let reply = rule_based_reply(&request.messages);
    Ok(Json(ChatResponse { reply }))
}

/// Picks a canned reply from the last user turn. System and assistant
/// turns are skipped when looking for the question.
pub fn rule_based_reply(messages: &[Turn]) -> String {
    let last_user = messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.to_lowercase())
        .unwrap_or_default();

    if last_user.contains("stack") || last_user.contains("tech") {
        "The portfolio runs on a Rust stack: an axum backend with a Tokio async core, \
         and widget controllers that talk to it over JSON."
            .to_string()
    } else if last_user.contains("project") {
        "This site showcases two interactive widgets, a resume and job-posting match \
         analyzer and this Q&A agent, both driven by the same backend."
            .to_string()
    } else if last_user.contains("ai") || last_user.contains("llm") {
        "This deployment answers from a rules-based engine so it runs anywhere; the \
         project is wired so an LLM-backed engine can slot in behind the same endpoint."
            .to_string()
    } else {
        "Hi! I'm a lightweight assistant running on the portfolio backend. Ask me about \
         the tech stack, the projects, or how the widgets are built."
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(content: &str) -> Turn {
        Turn::new(Role::User, content)
    }

    #[test]
    fn test_stack_question_gets_stack_answer() {
        let reply = rule_based_reply(&[user("what tech stack do you use?")]);
        assert!(reply.contains("Rust stack"));
    }

    #[test]
    fn test_project_question_gets_project_answer() {
        let reply = rule_based_reply(&[user("tell me about your projects")]);
        assert!(reply.contains("two interactive widgets"));
    }

    #[test]
    fn test_llm_question_gets_engine_answer() {
        let reply = rule_based_reply(&[user("is there an llm behind this?")]);
        assert!(reply.contains("rules-based engine"));
    }

    #[test]
    fn test_unmatched_question_gets_greeting() {
        let reply = rule_based_reply(&[user("hello there")]);
        assert!(reply.starts_with("Hi!"));
    }

    #[test]
    fn test_last_user_turn_wins_over_earlier_ones() {
        let turns = vec![
            Turn::new(Role::System, "persona"),
            user("what projects do you have?"),
            Turn::new(Role::Assistant, "two widgets"),
            user("and the stack?"),
        ];
        let reply = rule_based_reply(&turns);
        assert!(reply.contains("Rust stack"));
    }

    #[test]
    fn test_no_user_turn_gets_greeting() {
        let turns = vec![Turn::new(Role::System, "persona")];
        let reply = rule_based_reply(&turns);
        assert!(reply.starts_with("Hi!"));
    }

    #[tokio::test]
    async fn test_handler_rejects_empty_message_list() {
        let result = handle_chat(Json(ChatRequest { messages: vec![] })).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_handler_always_produces_a_reply() {
        let Json(response) = handle_chat(Json(ChatRequest {
            messages: vec![user("hi")],
        }))
        .await
        .unwrap();
        assert!(!response.reply.is_empty());
    }
}
