use dioxus::prelude::*;

use exam_core::model::OptionLabel;

use super::palette::Palette;
use crate::vm::{PaletteEntryVm, QuestionVm, SummaryVm};

/// The timed test screen: question card, palette, countdown, and the
/// submit/report modals. All state mutations are emitted upward; this
/// component only owns its modal visibility.
#[component]
#[allow(clippy::too_many_arguments)]
pub fn ExamScreen(
    exam_title: String,
    question: QuestionVm,
    palette: Vec<PaletteEntryVm>,
    summary: SummaryVm,
    timer_label: String,
    low_time: bool,
    time_up: bool,
    submitting: bool,
    banner: Option<String>,
    on_select: EventHandler<OptionLabel>,
    on_toggle_mark: EventHandler<()>,
    on_goto: EventHandler<usize>,
    on_previous: EventHandler<()>,
    on_next: EventHandler<()>,
    on_submit: EventHandler<()>,
    on_report: EventHandler<String>,
) -> Element {
    let mut confirm_open = use_signal(|| false);
    let mut report_open = use_signal(|| false);
    let mut report_text = use_signal(String::new);
    let is_first = question.number == 1;
    let is_last = question.number == question.total;

    rsx! {
        div { class: "page exam-page",
            header { class: "exam-header",
                h2 { class: "view-title", "{exam_title}" }
                span {
                    class: if time_up {
                        "timer timer-expired"
                    } else if low_time {
                        "timer timer-low"
                    } else {
                        "timer"
                    },
                    "{timer_label}"
                }
            }

            if let Some(message) = banner {
                p { class: "banner banner-error", "{message}" }
            }
            if time_up {
                p { class: "banner banner-warning",
                    "Time is up. Your answers are locked; submit to see your score."
                }
            }

            div { class: "exam-body",
                section { class: "question-card",
                    header { class: "question-header",
                        span { class: "question-number", "Question {question.number} of {question.total}" }
                        button {
                            class: if question.marked { "btn btn-mark btn-mark-active" } else { "btn btn-mark" },
                            r#type: "button",
                            disabled: time_up || submitting,
                            onclick: move |_| on_toggle_mark.call(()),
                            if question.marked { "Unmark" } else { "Mark for review" }
                        }
                    }
                    p { class: "question-prompt", "{question.prompt}" }
                    ul { class: "options",
                        for option in question.options.clone() {
                            li { key: "{option.label}",
                                button {
                                    class: if option.selected { "option option-selected" } else { "option" },
                                    r#type: "button",
                                    disabled: time_up || submitting,
                                    onclick: move |_| on_select.call(option.label),
                                    span { class: "option-label", "{option.label}" }
                                    span { class: "option-text", "{option.text}" }
                                }
                            }
                        }
                    }
                    footer { class: "question-footer",
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            disabled: is_first || time_up || submitting,
                            onclick: move |_| on_previous.call(()),
                            "Previous"
                        }
                        button {
                            class: "btn btn-link",
                            r#type: "button",
                            onclick: move |_| report_open.set(true),
                            "Report question"
                        }
                        // The last question trades Next for Submit.
                        if is_last {
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                disabled: submitting,
                                onclick: move |_| confirm_open.set(true),
                                "Submit"
                            }
                        } else {
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                disabled: time_up || submitting,
                                onclick: move |_| on_next.call(()),
                                "Next"
                            }
                        }
                    }
                }

                aside { class: "exam-side",
                    Palette { entries: palette, on_goto }
                    div { class: "summary",
                        p { "Attempted: {summary.attempted}" }
                        p { "Unattempted: {summary.unattempted}" }
                    }
                    button {
                        class: "btn btn-primary btn-submit",
                        r#type: "button",
                        disabled: submitting,
                        onclick: move |_| confirm_open.set(true),
                        if submitting { "Submitting..." } else { "Submit test" }
                    }
                }
            }

            // While the submission round-trip is in flight nothing on the
            // screen should look clickable, so a backdrop with no dismiss
            // action covers the whole body.
            if submitting {
                div { class: "submit-overlay",
                    div { class: "submit-overlay-panel",
                        p { "Submitting your test..." }
                    }
                }
            }

            if confirm_open() {
                div { class: "modal-backdrop",
                    div { class: "modal",
                        h3 { "Submit this test?" }
                        p {
                            "You have attempted {summary.attempted} of {summary.total} questions. "
                            "{summary.unattempted} will be left unanswered."
                        }
                        p { class: "modal-meta", "Time left: {timer_label}" }
                        div { class: "modal-actions",
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| confirm_open.set(false),
                                "Keep going"
                            }
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                onclick: move |_| {
                                    confirm_open.set(false);
                                    on_submit.call(());
                                },
                                "Submit"
                            }
                        }
                    }
                }
            }

            if report_open() {
                div { class: "modal-backdrop",
                    div { class: "modal",
                        h3 { "Report this question" }
                        textarea {
                            class: "report-text",
                            placeholder: "What is wrong with this question?",
                            value: "{report_text}",
                            oninput: move |event| report_text.set(event.value()),
                        }
                        div { class: "modal-actions",
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| report_open.set(false),
                                "Cancel"
                            }
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                disabled: report_text().trim().is_empty(),
                                onclick: move |_| {
                                    report_open.set(false);
                                    on_report.call(report_text());
                                    report_text.set(String::new());
                                },
                                "Send report"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::OptionVm;

    #[component]
    fn Screen(submitting: bool) -> Element {
        let question = QuestionVm {
            number: 1,
            total: 1,
            prompt: "What is item 0?".into(),
            options: vec![OptionVm {
                label: OptionLabel::A,
                text: "alpha 0".into(),
                selected: true,
            }],
            answer: Some(OptionLabel::A),
            marked: false,
            correct_label: OptionLabel::A,
            explanation: None,
        };
        let palette = vec![PaletteEntryVm {
            index: 0,
            number: 1,
            current: true,
            css_class: "palette-answered",
        }];
        let summary = SummaryVm {
            total: 1,
            attempted: 1,
            unattempted: 0,
        };
        rsx! {
            ExamScreen {
                exam_title: "General Knowledge Mock",
                question,
                palette,
                summary,
                timer_label: "29:40",
                low_time: false,
                time_up: false,
                submitting,
                on_select: move |_| {},
                on_toggle_mark: move |_| {},
                on_goto: move |_| {},
                on_previous: move |_| {},
                on_next: move |_| {},
                on_submit: move |_| {},
                on_report: move |_| {},
            }
        }
    }

    fn render(submitting: bool) -> String {
        let mut dom = VirtualDom::new_with_props(Screen, ScreenProps { submitting });
        dom.rebuild_in_place();
        dioxus_ssr::render(&dom)
    }

    #[test]
    fn submission_in_flight_blankets_the_screen() {
        let html = render(true);
        assert!(html.contains("submit-overlay"));
        assert!(html.contains("Submitting your test..."));

        let html = render(false);
        assert!(!html.contains("submit-overlay"));
    }
}
