//! Splitting a knowledge-base answer into its two labelled parts.

use regex::Regex;
use std::sync::OnceLock;

/// An answer split into the part grounded in the knowledge base and the
/// model's own additions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSections {
    pub knowledge_base: String,
    pub additional: Option<String>,
}

fn heading_regex(pattern: &'static str, cell: &'static OnceLock<Regex>) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("heading pattern is valid"))
}

fn knowledge_base_heading() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    heading_regex(
        r"(?im)^[\s#*_\d.:]*(?:part 1[\s:.-]*)?(?:information from (?:the )?knowledge base|информация из базы знаний)[\s*_:.-]*$",
        &CELL,
    )
}

fn additional_heading() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    heading_regex(
        r"(?im)^[\s#*_\d.:]*(?:part 2[\s:.-]*)?(?:what i would add|что полезно добавить поверх базы знаний)[\s*_:.-]*$",
        &CELL,
    )
}

/// Split an answer on the section headings the QA prompt asks for.
///
/// Headings are matched on their own line, in English or Russian, with
/// optional markdown decoration. Without a second heading the whole answer
/// (minus a leading first heading) is the knowledge-base part.
pub fn split_sections(answer: &str) -> AnswerSections {
    let body_start = knowledge_base_heading()
        .find(answer)
        .map(|m| m.end())
        .unwrap_or(0);

    match additional_heading().find_at(answer, body_start) {
        Some(m) => {
            let additional = answer[m.end()..].trim();
            AnswerSections {
                knowledge_base: answer[body_start..m.start()].trim().to_string(),
                additional: (!additional.is_empty()).then(|| additional.to_string()),
            }
        }
        None => AnswerSections {
            knowledge_base: answer[body_start..].trim().to_string(),
            additional: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_answer() {
        let sections = split_sections("Overfitting is when the model memorizes noise.");
        assert_eq!(sections.knowledge_base, "Overfitting is when the model memorizes noise.");
        assert_eq!(sections.additional, None);
    }

    #[test]
    fn test_russian_sections() {
        let answer = "**Информация из базы знаний**\nМашинное обучение - это...\n\n**Что полезно добавить поверх базы знаний:**\nСтоит изучить регуляризацию.";
        let sections = split_sections(answer);
        assert_eq!(sections.knowledge_base, "Машинное обучение - это...");
        assert_eq!(sections.additional.as_deref(), Some("Стоит изучить регуляризацию."));
    }

    #[test]
    fn test_english_sections_with_markdown_headings() {
        let answer = "## Information from knowledge base\nPCA projects data.\n\n## What I would add\nWhiten the components.";
        let sections = split_sections(answer);
        assert_eq!(sections.knowledge_base, "PCA projects data.");
        assert_eq!(sections.additional.as_deref(), Some("Whiten the components."));
    }

    #[test]
    fn test_heading_words_inside_sentence_ignored() {
        let answer = "The phrase what I would add appears mid-sentence here.";
        let sections = split_sections(answer);
        assert_eq!(sections.knowledge_base, answer);
        assert_eq!(sections.additional, None);
    }
}
