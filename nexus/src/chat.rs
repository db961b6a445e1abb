//! Deck-grounded chat: answer Jira/QA questions using a static `.pptx`
//! knowledge deck as context.

use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};
use std::path::Path;

use crate::extract::extract_pptx_text;
use crate::llm::LlmClient;
use crate::prompt::chat_prompt;

/// Starter questions printed when entering interactive mode.
pub const SUGGESTED_QUESTIONS: &[&str] = &[
    "How do I create a ticket in Jira?",
    "What is an epic in Jira?",
    "How does a user story relate to an epic?",
    "What is a traceability matrix?",
    "What is Test Driven Development?",
    "Explain the ISTQB test levels.",
];

/// Load the knowledge deck text from a `.pptx` file.
pub fn load_deck(path: &Path) -> Result<String> {
    let text = extract_pptx_text(path)
        .with_context(|| format!("Failed to load knowledge deck: {}", path.display()))?;
    if text.trim().is_empty() {
        bail!(
            "Knowledge deck {} is empty or contains no accessible text",
            path.display()
        );
    }
    Ok(text)
}

/// Answer one question grounded on the deck.
pub async fn ask(llm: &LlmClient, deck: &str, question: &str) -> Result<String> {
    llm.complete(&chat_prompt(deck, question), None).await
}

/// Interactive loop: read questions from stdin until EOF or "exit".
pub async fn interactive(llm: &LlmClient, deck: &str) -> Result<()> {
    println!("Suggested questions:");
    for question in SUGGESTED_QUESTIONS {
        println!("  - {}", question);
    }
    println!("Type a question, or \"exit\" to quit.\n");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") {
            break;
        }

        match ask(llm, deck, question).await {
            Ok(answer) => println!("{}\n", answer.trim()),
            Err(e) => eprintln!("Error: {:#}\n", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::write_test_pptx;
    use genai_client::MockProvider;

    #[test]
    fn test_load_deck() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.pptx");
        write_test_pptx(&path, &["Jira onboarding", "Ticket workflow"]);

        let deck = load_deck(&path).unwrap();
        assert!(deck.contains("Jira onboarding"));
        assert!(deck.contains("Ticket workflow"));
    }

    #[test]
    fn test_load_deck_empty_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pptx");
        write_test_pptx(&path, &[" "]);
        assert!(load_deck(&path).is_err());
    }

    #[tokio::test]
    async fn test_ask_uses_deck_and_question() {
        let llm =
            LlmClient::from_provider(Box::new(MockProvider::always_succeeds("An epic groups stories.")));
        let answer = ask(&llm, "deck text", "What is an epic?").await.unwrap();
        assert_eq!(answer, "An epic groups stories.");
    }
}
