use dioxus::prelude::*;
use dioxus_router::Link;

use crate::routes::Route;
use crate::vm::ResultVm;

/// Scorecard after a submitted attempt.
#[component]
pub fn ResultsScreen(result: ResultVm, on_view_solutions: EventHandler<()>) -> Element {
    rsx! {
        div { class: "page results-page",
            header { class: "view-header",
                h2 { class: "view-title", "{result.exam_title}" }
                p { class: "view-subtitle", "{result.category_name} · submitted {result.submitted_at}" }
            }
            div { class: "view-divider" }

            section { class: "scorecard",
                div { class: "score-main",
                    span { class: "score-value", "{result.score}" }
                    span { class: "score-max", " / {result.max_score}" }
                }
                p { class: "score-percent", "{result.percentage}" }
                ul { class: "score-breakdown",
                    li { class: "score-correct", "Correct: {result.correct}" }
                    li { class: "score-incorrect", "Incorrect: {result.incorrect}" }
                    li { class: "score-unattempted", "Unattempted: {result.unattempted}" }
                }
            }

            div { class: "results-actions",
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_view_solutions.call(()),
                    "View solutions"
                }
                Link { class: "btn btn-secondary", to: Route::Home {}, "Back to tests" }
            }
        }
    }
}
