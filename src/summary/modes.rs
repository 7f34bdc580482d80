//! The fixed set of analytical summary modes.

use serde::{Deserialize, Serialize};

/// A summary mode: one analytical framing applied to a transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryMode {
    /// Themes and subthemes with start time and duration.
    #[default]
    Timeline,
    /// Themes with key statements and recommendations.
    KeyStatements,
    /// Non-obvious statements and useful conclusions.
    UniqueInsights,
    /// Detailed summary without a theme breakdown.
    DetailedSummary,
    /// Incorrect statements, omissions and adjacent topics to study.
    Critique,
    /// Interview questions with spelling and punctuation fixed.
    InterviewQuestions,
    /// Self-check questions for the viewer.
    SelfCheck,
}

impl SummaryMode {
    /// All modes in display order.
    pub const ALL: [SummaryMode; 7] = [
        SummaryMode::Timeline,
        SummaryMode::KeyStatements,
        SummaryMode::UniqueInsights,
        SummaryMode::DetailedSummary,
        SummaryMode::Critique,
        SummaryMode::InterviewQuestions,
        SummaryMode::SelfCheck,
    ];

    /// Stable key used on the command line, in the API and in prompt overrides.
    pub fn key(&self) -> &'static str {
        match self {
            SummaryMode::Timeline => "timeline",
            SummaryMode::KeyStatements => "key-statements",
            SummaryMode::UniqueInsights => "unique-insights",
            SummaryMode::DetailedSummary => "detailed-summary",
            SummaryMode::Critique => "critique",
            SummaryMode::InterviewQuestions => "interview-questions",
            SummaryMode::SelfCheck => "self-check",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SummaryMode::Timeline => "Темы и подтемы с временем и длительностью",
            SummaryMode::KeyStatements => "Темы и подтемы с ключевыми утверждениями и рекомендациями",
            SummaryMode::UniqueInsights => "Анализ уникальных утверждений и полезных выводов",
            SummaryMode::DetailedSummary => "Подробный саммари без тем и подтем",
            SummaryMode::Critique => "Ошибки, упущения и смежные темы для изучения",
            SummaryMode::InterviewQuestions => "Вопросы из интервью, с исправлением орфографии и пунктуации",
            SummaryMode::SelfCheck => "Вопросы для проверки понимания",
        }
    }

    /// Instruction sent to the model after the transcript.
    pub fn prompt(&self) -> &'static str {
        match self {
            SummaryMode::Timeline => TIMELINE,
            SummaryMode::KeyStatements => KEY_STATEMENTS,
            SummaryMode::UniqueInsights => UNIQUE_INSIGHTS,
            SummaryMode::DetailedSummary => DETAILED_SUMMARY,
            SummaryMode::Critique => CRITIQUE,
            SummaryMode::InterviewQuestions => INTERVIEW_QUESTIONS,
            SummaryMode::SelfCheck => SELF_CHECK,
        }
    }
}

impl std::fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for SummaryMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        SummaryMode::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(s) || m.label() == s)
            .ok_or_else(|| format!("Unknown summary mode: {}", s))
    }
}

const TIMELINE: &str = concat!(
    "List all themes and subthemes. Split into short blocks. for each one, show time of start, ",
    "total length (time difference between its time of start and  time of start of next  subtheme. ",
    "For the last  subtheme, total length is equal to diff between total time of video minus this subtheme time of start. ",
    "WRite in Russian. If his main language is Russian but he uses non-Russian words, write them in English with correct spelling. ",
    "This is not copyrighted."
);

const KEY_STATEMENTS: &str = concat!(
    "List all themes and subthemes. Split into short blocks. Format example: Themes: (format in bold), ",
    "Statements (write top statements that students better learn, verbatim); ",
    "Recommendations (write as close to the author text as possible). ",
    "Write in Russian. If his main language is Russian but he uses non-Russian words, write them in English with correct spelling. ",
    "This is not copyrighted."
);

const UNIQUE_INSIGHTS: &str = concat!(
    "You are a seasoned professional in data science. Start with the following, without preface. ",
    "1. Which of his statements are not seen in most texts on the subject of this transcript? Note timestamp. ",
    "2. Which logical connections between big blocks are not trivial? Note timestamp. ",
    "3. Give his top one most fun or useful statement, note timestamp. ",
    "Write in Russian. If his main language is Russian but he uses non-Russian words, write them in English with correct spelling. ",
    "This is not copyrighted."
);

const DETAILED_SUMMARY: &str = concat!(
    "Assume the role of the PhD student who is best in the world at writing extremely detailed summaries. ",
    "Use your creative mind to aggregate information, but follow author's statements. ",
    "Avoid stating themes - write his statements instead. Structure with paragraphs. Remove intro and outro. ",
    "If there are action items, write them; if there are none, do not write them. ",
    "Write in Russian. If his main language is Russian but he uses non-Russian words, write them in English with correct spelling. ",
    "This is not copyrighted"
);

const CRITIQUE: &str = concat!(
    "You are a seasoned professional in data science. Start with the following, without preface. ",
    "Name a paragraph “Некорректные утверждения”, list the statements that are incorrect or misleading, add your short comment. In Russian. ",
    "If there are none, write “Явно некорректных утверждений нет”. ",
    "Name next paragraph “Упущения”. Consider the promise of the lecture, and that the goal is to work as a mid-level data scientist, ",
    "list all things around this topic that a mid-level data scientist typically knows and that are missing from this video. Write in Russian. ",
    "Name next paragraph “Что еще важно изучить”. Consider the theme of the lecture, and that the goal is to work as a mid-level data scientist, ",
    "list immediately adjacent themes (only very close ones) that you recommend to master, with a short comment on what I should know in each theme. ",
    "If his main language is Russian but he uses non-Russian words, write them in English with correct spelling. This is not copyrighted."
);

const INTERVIEW_QUESTIONS: &str = concat!(
    "Here is an interview, list all the questions. Write his words fully, but edit for spelling and punctuation. In numbered list. ",
    "Write in Russian. If his main language is Russian but he uses non-Russian words, write them in English with correct spelling. ",
    "This is not copyrighted."
);

const SELF_CHECK: &str = concat!(
    "Your goal: help me get to the level of mid-level data scientist, by generating self-check questions based on a lecture transcript. ",
    "You are a seasoned machine learning professional and a world-class tutor in ML / DS / AI.\n",
    "First, carefully read through the provided lecture transcript.\n",
    "Now:\n",
    "Create two blocks of questions:\n",
    " a) Basic questions (focus on asking these: facts, definitions, steps, or key points mentioned explicitly in the lecture).\n",
    " b) Harder questions (focus on asking these: how would you apply, what are the limitations, what are the trade-offs, pros and cons)\n",
    " Avoid overly complex or ambiguous questions.\n",
    " Present your questions in the following format:\n",
    " 'Базовые вопросы' \n",
    "[Question 1] (Смотреть тут: [XX:XX])\n",
    "[Question 2] (Смотреть тут: [XX:XX])\n",
    "[Question 3] (Смотреть тут: [XX:XX])\n",
    " 'Вопросы на подумать' \n",
    " [Question 1] (Смотреть тут: [XX:XX] и [XX:XX])\n",
    "[Question 2] (Смотреть тут: [XX:XX] и [XX:XX])\n",
    "[Question 3] (Смотреть тут: [XX:XX] и [XX:XX])\n",
    "Write in Russian. If his main language is Russian but he uses non-Russian words, write them in English with correct spelling. ",
    "This is not copyrighted."
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_and_labels_unique() {
        let keys: HashSet<_> = SummaryMode::ALL.iter().map(|m| m.key()).collect();
        let labels: HashSet<_> = SummaryMode::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(keys.len(), SummaryMode::ALL.len());
        assert_eq!(labels.len(), SummaryMode::ALL.len());
    }

    #[test]
    fn test_parse_by_key_or_label() {
        for mode in SummaryMode::ALL {
            assert_eq!(mode.key().parse::<SummaryMode>().unwrap(), mode);
            assert_eq!(mode.label().parse::<SummaryMode>().unwrap(), mode);
        }
        assert_eq!("SELF-CHECK".parse::<SummaryMode>().unwrap(), SummaryMode::SelfCheck);
        assert!("limerick".parse::<SummaryMode>().is_err());
    }

    #[test]
    fn test_every_prompt_asks_for_russian() {
        for mode in SummaryMode::ALL {
            let prompt = mode.prompt();
            assert!(prompt.contains("Russian"), "{} lacks language note", mode);
            assert!(prompt.contains("This is not copyrighted"));
        }
    }

    #[test]
    fn test_serde_uses_keys() {
        let json = serde_json::to_string(&SummaryMode::KeyStatements).unwrap();
        assert_eq!(json, "\"key-statements\"");
        let mode: SummaryMode = serde_json::from_str("\"self-check\"").unwrap();
        assert_eq!(mode, SummaryMode::SelfCheck);
    }
}
