use dioxus::prelude::*;

use exam_core::model::OptionLabel;

use super::palette::Palette;
use crate::vm::{PaletteEntryVm, QuestionVm};

/// Untimed practice: the same question card as the test screen, but
/// each selection immediately reveals the correct answer and the
/// explanation. Nothing is scored or persisted.
#[component]
pub fn PracticeScreen(
    exam_title: String,
    question: QuestionVm,
    palette: Vec<PaletteEntryVm>,
    on_select: EventHandler<OptionLabel>,
    on_goto: EventHandler<usize>,
    on_previous: EventHandler<()>,
    on_next: EventHandler<()>,
) -> Element {
    let is_first = question.number == 1;
    let is_last = question.number == question.total;
    let answered = question.answer.is_some();
    let got_it = question.answer == Some(question.correct_label);

    rsx! {
        div { class: "page exam-page practice-mode",
            header { class: "exam-header",
                h2 { class: "view-title", "{exam_title}" }
                span { class: "practice-badge", "Practice" }
            }

            div { class: "exam-body",
                section { class: "question-card",
                    header { class: "question-header",
                        span { class: "question-number", "Question {question.number} of {question.total}" }
                    }
                    p { class: "question-prompt", "{question.prompt}" }
                    ul { class: "options",
                        for option in question.options.clone() {
                            li { key: "{option.label}",
                                button {
                                    class: practice_option_class(
                                        answered,
                                        option.selected,
                                        option.label == question.correct_label,
                                    ),
                                    r#type: "button",
                                    onclick: move |_| on_select.call(option.label),
                                    span { class: "option-label", "{option.label}" }
                                    span { class: "option-text", "{option.text}" }
                                }
                            }
                        }
                    }
                    if answered {
                        div { class: if got_it { "feedback feedback-correct" } else { "feedback feedback-incorrect" },
                            if got_it {
                                p { class: "feedback-verdict", "Correct!" }
                            } else {
                                p { class: "feedback-verdict",
                                    "Not quite. The correct answer is {question.correct_label}."
                                }
                            }
                            if let Some(explanation) = question.explanation.clone() {
                                p { class: "feedback-explanation", "{explanation}" }
                            }
                        }
                    }
                    footer { class: "question-footer",
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            disabled: is_first,
                            onclick: move |_| on_previous.call(()),
                            "Previous"
                        }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            disabled: is_last,
                            onclick: move |_| on_next.call(()),
                            "Next"
                        }
                    }
                }

                aside { class: "exam-side",
                    Palette { entries: palette, on_goto }
                }
            }
        }
    }
}

fn practice_option_class(answered: bool, selected: bool, is_correct: bool) -> &'static str {
    if !answered {
        return "option";
    }
    if is_correct {
        "option option-correct"
    } else if selected {
        "option option-wrong"
    } else {
        "option option-muted"
    }
}
