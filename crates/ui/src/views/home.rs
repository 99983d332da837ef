use dioxus::prelude::*;
use dioxus_router::Link;

use services::SessionError;

use crate::context::AppContext;
use crate::routes::{AttemptMode, Route};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{HistoryEntryVm, map_history};

#[derive(Clone, Debug, PartialEq, Eq)]
struct ExamCardVm {
    exam_id: u64,
    title: String,
    category_name: String,
    question_count: usize,
    duration_label: String,
    resumable: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct HomeData {
    exam_cards: Vec<ExamCardVm>,
    history: Vec<HistoryEntryVm>,
}

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let service = ctx.session_service();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        let service = service.clone();
        async move {
            let exams = catalog.list_exams().await.map_err(|_| ViewError::Unknown)?;
            let resumable = service.resumable_snapshot().await.map(|snap| snap.exam_id);
            let history = match service.list_results().await {
                Ok(results) => map_history(&results),
                Err(SessionError::NotSignedIn) => Vec::new(),
                Err(_) => return Err(ViewError::Unknown),
            };

            let exam_cards = exams
                .iter()
                .map(|exam| ExamCardVm {
                    exam_id: exam.id().value(),
                    title: exam.title().to_string(),
                    category_name: exam.category_name().to_string(),
                    question_count: exam.question_count(),
                    duration_label: format!("{} min", exam.duration_minutes()),
                    resumable: resumable == Some(exam.id()),
                })
                .collect();

            Ok::<_, ViewError>(HomeData {
                exam_cards,
                history,
            })
        }
    });

    let state = view_state_from_resource(&resource);
    rsx! {
        div { class: "page home-page",
            header { class: "view-header",
                h2 { class: "view-title", "Mock Tests" }
                p { class: "view-subtitle", "Pick a test for a timed attempt, or practice without the clock." }
            }
            div { class: "view-divider" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(data) => rsx! {
                    if data.exam_cards.is_empty() {
                        p { class: "empty", "No tests available yet." }
                    }
                    ul { class: "exam-list",
                        for card in data.exam_cards {
                            li { class: "exam-card", key: "{card.exam_id}",
                                div { class: "exam-card-body",
                                    h3 { "{card.title}" }
                                    p { class: "exam-meta",
                                        "{card.category_name} · {card.question_count} questions · {card.duration_label}"
                                    }
                                }
                                div { class: "exam-card-actions",
                                    if card.resumable {
                                        Link {
                                            class: "btn btn-primary",
                                            to: Route::Attempt { exam_id: card.exam_id, mode: AttemptMode::Resume },
                                            "Resume"
                                        }
                                    } else {
                                        Link {
                                            class: "btn btn-primary",
                                            to: Route::Attempt { exam_id: card.exam_id, mode: AttemptMode::Start },
                                            "Start"
                                        }
                                    }
                                    Link {
                                        class: "btn btn-secondary",
                                        to: Route::Attempt { exam_id: card.exam_id, mode: AttemptMode::Practice },
                                        "Practice"
                                    }
                                }
                            }
                        }
                    }
                    if !data.history.is_empty() {
                        section { class: "history",
                            h3 { "Past attempts" }
                            ul { class: "history-list",
                                for entry in data.history {
                                    li { class: "history-row", key: "{entry.index}",
                                        span { class: "history-title", "{entry.exam_title}" }
                                        span { class: "history-score", "{entry.score_line}" }
                                        span { class: "history-date", "{entry.submitted_at}" }
                                        Link {
                                            class: "btn btn-link",
                                            to: Route::Review { result_index: entry.index },
                                            "View"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
