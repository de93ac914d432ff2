use course_core::InlineCheckSession;
use course_core::scoring::OptionMark;

/// One answer button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub letter: char,
    pub label: String,
    pub mark: OptionMark,
    pub class: String,
    pub disabled: bool,
}

impl OptionVm {
    #[must_use]
    pub fn new(index: usize, label: &str, mark: OptionMark, disabled: bool) -> Self {
        Self {
            index,
            letter: option_letter(index),
            label: label.to_string(),
            mark,
            class: format!("option option--{}", mark.css_modifier()),
            disabled,
        }
    }
}

/// `A`, `B`, `C`, ... for the first 26 options, `?` past that.
#[must_use]
pub fn option_letter(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map_or('?', |i| char::from(b'A' + i))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub correct: bool,
    pub heading: &'static str,
    pub explanation: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckIntent {
    Select(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckVm {
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub feedback: Option<FeedbackVm>,
}

impl From<&InlineCheckSession> for CheckVm {
    fn from(check: &InlineCheckSession) -> Self {
        let answered = check.state().is_answered();
        let question = check.question();
        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(index, label)| OptionVm::new(index, label, check.option_mark(index), answered))
            .collect();
        let feedback = check.state().is_correct().map(|correct| FeedbackVm {
            correct,
            heading: if correct { "Correct" } else { "Not quite" },
            explanation: question.explanation().to_string(),
        });
        Self {
            prompt: question.prompt().to_string(),
            options,
            feedback,
        }
    }
}
