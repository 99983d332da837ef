use dioxus::prelude::*;
use dioxus_router::Link;

use crate::routes::Route;
use crate::vm::SolutionEntryVm;

/// Per-question review of a submitted attempt.
#[component]
pub fn SolutionScreen(
    exam_title: String,
    entries: Vec<SolutionEntryVm>,
    legacy_notice: bool,
    on_back: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "page solution-page",
            header { class: "view-header",
                h2 { class: "view-title", "Solutions · {exam_title}" }
                div { class: "view-actions",
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| on_back.call(()),
                        "Back to results"
                    }
                    Link { class: "btn btn-link", to: Route::Home {}, "Back to tests" }
                }
            }
            div { class: "view-divider" }

            if legacy_notice {
                p { class: "banner banner-warning",
                    "Detailed answers are not available for this attempt; only the correct answers are shown."
                }
            }

            ol { class: "solution-list",
                for entry in entries {
                    li { class: "solution-card", key: "{entry.number}",
                        p { class: "question-prompt", "{entry.prompt}" }
                        ul { class: "options",
                            for (label, text) in entry.options.clone() {
                                li {
                                    key: "{label}",
                                    class: solution_option_class(
                                        label == entry.correct,
                                        entry.chosen == Some(label),
                                    ),
                                    span { class: "option-label", "{label}" }
                                    span { class: "option-text", "{text}" }
                                }
                            }
                        }
                        p { class: "solution-verdict",
                            match (entry.chosen, entry.is_correct) {
                                (None, _) => rsx! { span { class: "verdict-none", "Not attempted" } },
                                (Some(_), true) => rsx! { span { class: "verdict-correct", "Your answer was correct" } },
                                (Some(chosen), false) => rsx! {
                                    span { class: "verdict-wrong", "You chose {chosen}; correct is {entry.correct}" }
                                },
                            }
                        }
                        if let Some(explanation) = entry.explanation.clone() {
                            p { class: "feedback-explanation", "{explanation}" }
                        }
                    }
                }
            }
        }
    }
}

fn solution_option_class(is_correct: bool, is_chosen: bool) -> &'static str {
    match (is_correct, is_chosen) {
        (true, _) => "option option-correct",
        (false, true) => "option option-wrong",
        (false, false) => "option option-muted",
    }
}
