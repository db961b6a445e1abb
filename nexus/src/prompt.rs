//! Prompt construction for the generation pipelines.
//!
//! Prompts carry three things the pipeline depends on: the role the stories
//! are written for, the artifact type being requested, and (for the matrix
//! pipeline) the exact JSON key schema the response parser expects.

use clap::ValueEnum;

/// Documents longer than this take the phased analyse-then-generate path.
pub const LARGE_DOCUMENT_THRESHOLD: usize = 5000;

/// How much raw document context accompanies each batched story request.
const BATCH_CONTEXT_CHARS: usize = 2000;

/// How many functionalities are turned into stories per model call.
pub const STORY_BATCH_SIZE: usize = 5;

/// The artifact type requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoryKind {
    /// Functional user stories with acceptance criteria
    Functional,
    /// Non-functional requirement stories
    NonFunctional,
    /// Technical requirement specifications
    Technical,
}

/// How a stories run should proceed for a given document.
#[derive(Debug)]
pub enum PromptPlan {
    /// One prompt covers the whole document
    Single(String),
    /// Document is too large; run the chunked analyse-then-generate flow
    Phased,
}

/// Plan the stories pipeline for one document.
///
/// Only functional stories use the phased flow; NFR and technical documents
/// are sent whole, matching how they are reviewed.
pub fn plan_story_prompt(document: &str, role: &str, kind: StoryKind) -> PromptPlan {
    if kind == StoryKind::Functional && document.len() > LARGE_DOCUMENT_THRESHOLD {
        return PromptPlan::Phased;
    }
    PromptPlan::Single(single_story_prompt(document, role, kind))
}

fn single_story_prompt(document: &str, role: &str, kind: StoryKind) -> String {
    match kind {
        StoryKind::Functional => format!(
            "You are a senior business analyst specialized in QA and exhaustive \
             requirement analysis.\n\n\
             DOCUMENT UNDER ANALYSIS:\n{document}\n\n\
             INSTRUCTIONS:\n\
             1. Identify ALL functionalities in the document.\n\
             2. Keep only the ones that belong to the role: {role}.\n\
             3. Write one detailed user story per functionality, numbered \
             consecutively from 1.\n\n\
             FORMAT for each story:\n\
             STORY #<number>: <title>\n\
             AS A: {role}\n\
             I WANT: <specific functionality>\n\
             SO THAT: <measurable business benefit>\n\
             ACCEPTANCE CRITERIA:\n\
             - Main scenario: GIVEN <context> WHEN <action> THEN <result>\n\
             - Alternative scenario: GIVEN <context> WHEN <action> THEN <result>\n\
             - Validations: GIVEN <error condition> WHEN <action> THEN <handling>\n\
             BUSINESS RULES: <bulleted rules>\n\
             PRIORITY: High/Medium/Low\n\
             COMPLEXITY: Simple/Moderate/Complex\n"
        ),
        StoryKind::NonFunctional => format!(
            "You are a senior business analyst specialized in non-functional \
             requirements.\n\n\
             DOCUMENT UNDER ANALYSIS:\n{document}\n\n\
             Identify ALL non-functional requirements (performance, security, \
             usability, and similar) and write one story per requirement for \
             the role: {role}.\n\n\
             FORMAT for each story:\n\
             NON-FUNCTIONAL STORY #<number>: <title>\n\
             AS A: {role}\n\
             I NEED: <non-functional requirement>\n\
             SO THAT: <quality guarantee>\n\
             ACCEPTANCE CRITERIA: <measurable criteria>\n\
             METRICS: <target metric>\n\
             CATEGORY: Performance/Security/Usability/Other\n\
             PRIORITY: High/Medium/Low\n"
        ),
        StoryKind::Technical => format!(
            "You are a senior software architect.\n\n\
             DOCUMENT UNDER ANALYSIS:\n{document}\n\n\
             Identify ALL technical requirements and write a detailed \
             specification for each, numbered consecutively from 1.\n\n\
             FORMAT for each requirement:\n\
             TECHNICAL REQUIREMENT #<number>: <title>\n\
             DESCRIPTION: <detailed description>\n\
             TECHNICAL CONSIDERATIONS: <bulleted considerations>\n\
             DEPENDENCIES: <bulleted dependencies>\n\
             IMPACT: High/Medium/Low\n\
             COMPLEXITY: Simple/Moderate/Complex\n"
        ),
    }
}

/// Phase-1 prompt: list the functionalities found in one document chunk.
pub fn analysis_prompt(chunk: &str, role: &str) -> String {
    format!(
        "You are a senior business analyst. IDENTIFY AND LIST every \
         functionality in the following document excerpt.\n\n\
         DOCUMENT EXCERPT:\n{chunk}\n\n\
         INSTRUCTIONS:\n\
         1. Read the excerpt completely.\n\
         2. List ONLY functionalities that belong to the role: {role}; ignore \
         any other role.\n\
         3. Reply with a NUMBERED list, one line per functionality:\n\
         1. <functionality name> - <short description>\n\
         2. <functionality name> - <short description>\n\n\
         Do NOT write user stories yet, only the list."
    )
}

/// Phase-2 prompt: turn a slice of the functionality list into stories.
pub fn story_batch_prompt(
    functionalities: &[String],
    document: &str,
    role: &str,
    start_index: usize,
) -> String {
    let end_index = (start_index + STORY_BATCH_SIZE).min(functionalities.len());
    let batch = functionalities[start_index..end_index]
        .iter()
        .enumerate()
        .map(|(i, f)| format!("{}. {}", start_index + i + 1, f))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a senior business analyst. Write DETAILED user stories for \
         these specific functionalities.\n\n\
         FUNCTIONALITIES TO DEVELOP (batch {} to {}):\n{batch}\n\n\
         REFERENCE DOCUMENT (for additional context):\n{}\n\n\
         Write every story from the perspective of the role **{role}** only, \
         numbered consecutively from {}.\n\
         FORMAT for each story:\n\
         STORY #<number>: <title>\n\
         AS A: {role}\n\
         I WANT: <specific functionality>\n\
         SO THAT: <measurable business benefit>\n\
         ACCEPTANCE CRITERIA (main scenario, alternative scenario, \
         validations, each as GIVEN/WHEN/THEN)\n\
         BUSINESS RULES: <bulleted rules>\n\
         PRIORITY: High/Medium/Low\n\
         COMPLEXITY: Simple/Moderate/Complex\n",
        start_index + 1,
        end_index,
        context_excerpt(document),
        start_index + 1,
    )
}

/// Shorten the reference document to `BATCH_CONTEXT_CHARS`, marking the cut
/// with an ellipsis only when something was actually dropped.
fn context_excerpt(document: &str) -> String {
    let excerpt = truncate_chars(document, BATCH_CONTEXT_CHARS);
    if excerpt.len() < document.len() {
        format!("{excerpt}...")
    } else {
        excerpt.to_string()
    }
}

/// Prompt for one test-case matrix over a full requirement document.
///
/// The key schema named here is what [`crate::parse::parse_test_cases`]
/// deserializes; keep the two in sync.
pub fn test_matrix_prompt(requirement: &str, context: &str, flow: &str) -> String {
    format!(
        "You are a QA expert. Reply with ONLY a JSON array of objects with \
         these keys:\n\
         - \"name\" (string)\n\
         - \"description\" (string)\n\
         - \"steps\" (array of strings)\n\
         - \"expected_result\" (string)\n\
         - \"priority\" (string)\n\n\
         No Markdown, no prose, no code fences.\n\n\
         Context: {context}\n\
         Process flow: {flow}\n\n\
         Requirement:\n{requirement}"
    )
}

/// Prompt for the deck-grounded chat assistant.
pub fn chat_prompt(deck: &str, question: &str) -> String {
    format!(
        "You are a Jira technical-support assistant and a senior tester with \
         ISTQB knowledge. Answer Jira questions using the documentation below, \
         and general testing questions from ISTQB fundamentals.\n\n\
         Jira documentation:\n{deck}\n\n\
         User question: {question}\n\n\
         Clear and concise answer:"
    )
}

/// Truncate to at most `max_chars` characters, respecting char boundaries.
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &s[..byte_index],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_functional_document_is_single() {
        let plan = plan_story_prompt("short document", "User", StoryKind::Functional);
        match plan {
            PromptPlan::Single(prompt) => {
                assert!(prompt.contains("short document"));
                assert!(prompt.contains("User"));
            }
            PromptPlan::Phased => panic!("small document should not be phased"),
        }
    }

    #[test]
    fn test_large_functional_document_is_phased() {
        let document = "x".repeat(LARGE_DOCUMENT_THRESHOLD + 1);
        assert!(matches!(
            plan_story_prompt(&document, "User", StoryKind::Functional),
            PromptPlan::Phased
        ));
    }

    #[test]
    fn test_large_nonfunctional_document_stays_single() {
        let document = "x".repeat(LARGE_DOCUMENT_THRESHOLD + 1);
        assert!(matches!(
            plan_story_prompt(&document, "Admin", StoryKind::NonFunctional),
            PromptPlan::Single(_)
        ));
    }

    #[test]
    fn test_matrix_prompt_names_the_record_keys() {
        let prompt = test_matrix_prompt("req", "ctx", "flow");
        for key in ["name", "description", "steps", "expected_result", "priority"] {
            assert!(prompt.contains(key), "missing key {}", key);
        }
        assert!(prompt.contains("req"));
    }

    #[test]
    fn test_batch_prompt_numbering() {
        let functionalities: Vec<String> = (1..=7).map(|i| format!("Feature {}", i)).collect();
        let prompt = story_batch_prompt(&functionalities, "doc", "User", 5);
        // Second batch covers items 6..=7
        assert!(prompt.contains("batch 6 to 7"));
        assert!(prompt.contains("6. Feature 6"));
        assert!(prompt.contains("7. Feature 7"));
        assert!(!prompt.contains("5. Feature 5"));
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        let s = "áéíóú";
        assert_eq!(truncate_chars(s, 3), "áéí");
        assert_eq!(truncate_chars(s, 10), s);
    }

    #[test]
    fn test_context_excerpt_marks_only_real_cuts() {
        let short = "a short reference document";
        assert_eq!(context_excerpt(short), short);

        let long = "z".repeat(BATCH_CONTEXT_CHARS + 50);
        let excerpt = context_excerpt(&long);
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), BATCH_CONTEXT_CHARS + 3);
    }
}
