use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;

use exam_core::model::ExamId;
use services::{ExamSession, SessionAction, SessionService, SessionStage, SessionTick};

use crate::context::AppContext;
use crate::routes::AttemptMode;
use crate::vm::{
    format_clock, map_palette, map_question, map_result, map_solution, map_summary,
};

mod exam;
mod palette;
mod practice;
mod results;
mod solution;

use exam::ExamScreen;
use practice::PracticeScreen;
use results::ResultsScreen;
use solution::SolutionScreen;

/// Below this many remaining seconds the countdown turns urgent.
const LOW_TIME_SECS: u32 = 5 * 60;

/// The session being displayed, or why there is none.
enum SessionSlot {
    Loading,
    Failed(String),
    Ready(ExamSession),
}

/// A live attempt entered from the home screen.
#[component]
pub fn AttemptView(exam_id: u64, mode: AttemptMode) -> Element {
    let ctx = use_context::<AppContext>();
    let service = ctx.session_service();
    let mut slot = use_signal(|| SessionSlot::Loading);
    let banner = use_signal(|| None::<String>);

    let service_for_load = service.clone();
    use_future(move || {
        let service = service_for_load.clone();
        async move {
            let action = match mode {
                AttemptMode::Start => SessionAction::Start,
                AttemptMode::Resume => SessionAction::Resume,
                AttemptMode::Practice => SessionAction::Practice,
            };
            match service.begin(ExamId::new(exam_id), action).await {
                Ok(session) => slot.set(SessionSlot::Ready(session)),
                Err(err) => slot.set(SessionSlot::Failed(err.to_string())),
            }
        }
    });

    // One wall-clock tick per second. The pure state change happens
    // under the write lock; autosave and time-up submission run after
    // the lock is released.
    let service_for_tick = service.clone();
    use_future(move || {
        let service = service_for_tick.clone();
        async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.tick().await;
            loop {
                interval.tick().await;
                let (outcome, snapshot) = {
                    let mut guard = slot.write();
                    match &mut *guard {
                        SessionSlot::Ready(session) => (session.tick(), session.snapshot()),
                        _ => (SessionTick::Idle, None),
                    }
                };
                match outcome {
                    SessionTick::Running { save_due: true, .. } => {
                        if let Some(snapshot) = snapshot {
                            service.save_progress(&snapshot).await;
                        }
                    }
                    SessionTick::TimeUp => run_submit(slot, banner, &service).await,
                    _ => {}
                }
            }
        }
    });

    render_session(slot, banner, &service)
}

/// A past attempt re-entered from the history list.
#[component]
pub fn ReviewView(result_index: usize) -> Element {
    let ctx = use_context::<AppContext>();
    let service = ctx.session_service();
    let catalog = ctx.catalog();
    let mut slot = use_signal(|| SessionSlot::Loading);
    let banner = use_signal(|| None::<String>);

    let service_for_load = service.clone();
    use_future(move || {
        let service = service_for_load.clone();
        let catalog = catalog.clone();
        async move {
            let loaded = async {
                let results = service.list_results().await?;
                let result = results
                    .into_iter()
                    .nth(result_index)
                    .ok_or(services::SessionError::InvalidStage)?;
                let exam = catalog.get_exam(result.exam_id()).await?;
                service
                    .begin_with_exam(exam, SessionAction::Result(result))
                    .await
            }
            .await;
            match loaded {
                Ok(session) => slot.set(SessionSlot::Ready(session)),
                Err(err) => slot.set(SessionSlot::Failed(err.to_string())),
            }
        }
    });

    render_session(slot, banner, &service)
}

/// Grades and persists the attempt, then advances the session. Split
/// into lock/await/lock phases so no signal borrow is held across an
/// await.
async fn run_submit(
    mut slot: Signal<SessionSlot>,
    mut banner: Signal<Option<String>>,
    service: &Arc<SessionService>,
) {
    let graded = {
        let guard = slot.read();
        let SessionSlot::Ready(session) = &*guard else {
            return;
        };
        match service.grade(session) {
            Ok(result) => result,
            Err(err) => {
                drop(guard);
                banner.set(Some(err.to_string()));
                return;
            }
        }
    };

    {
        let mut guard = slot.write();
        let SessionSlot::Ready(session) = &mut *guard else {
            return;
        };
        if session.begin_submit().is_err() {
            return;
        }
    }

    match service.persist_submission(&graded).await {
        Ok(()) => {
            if let SessionSlot::Ready(session) = &mut *slot.write() {
                session.complete_submit(graded);
            }
            banner.set(None);
        }
        Err(err) => {
            if let SessionSlot::Ready(session) = &mut *slot.write() {
                session.fail_submit();
            }
            banner.set(Some(format!("Submission failed: {err}")));
        }
    }
}

fn render_missing_state() -> Element {
    let message = crate::views::ViewError::Unknown.message();
    rsx! {
        div { class: "page", p { "{message}" } }
    }
}

fn render_session(
    slot: Signal<SessionSlot>,
    banner: Signal<Option<String>>,
    service: &Arc<SessionService>,
) -> Element {
    let guard = slot.read();
    match &*guard {
        SessionSlot::Loading => rsx! {
            div { class: "page", p { class: "loading", "Loading..." } }
        },
        SessionSlot::Failed(message) => rsx! {
            div { class: "page",
                div { class: "fatal",
                    h2 { "Cannot open this test" }
                    p { "{message}" }
                }
            }
        },
        SessionSlot::Ready(session) => match session.stage() {
            SessionStage::Loading => rsx! {
                div { class: "page", p { class: "loading", "Loading..." } }
            },
            SessionStage::Exam => render_exam_stage(session, slot, banner, service),
            SessionStage::Practice => render_practice_stage(session, slot),
            SessionStage::Results => render_results_stage(session, slot),
            SessionStage::Solution => render_solution_stage(session, slot),
        },
    }
}

fn render_exam_stage(
    session: &ExamSession,
    slot: Signal<SessionSlot>,
    banner: Signal<Option<String>>,
    service: &Arc<SessionService>,
) -> Element {
    let Some(question) = map_question(session.exam(), session.ledger(), session.current_index())
    else {
        return render_missing_state();
    };
    let exam_title = session.exam().title().to_string();
    let exam_for_report = session.exam().clone();
    let report_index = session.current_index();
    let palette = map_palette(session.ledger(), session.current_index());
    let summary = map_summary(session.attempt_summary());
    let remaining = session.remaining_seconds().unwrap_or(0);
    let timer_label = format_clock(remaining);
    let low_time = remaining < LOW_TIME_SECS;
    let time_up = session.time_up();
    let submitting = session.is_submitting();
    let banner_text = banner.read().clone();
    let service_for_submit = Arc::clone(service);
    let service_for_report = Arc::clone(service);

    rsx! {
        ExamScreen {
            exam_title,
            question,
            palette,
            summary,
            timer_label,
            low_time,
            time_up,
            submitting,
            banner: banner_text,
            on_select: move |label| {
                let mut slot = slot;
                if let SessionSlot::Ready(session) = &mut *slot.write() {
                    session.select_answer(label);
                }
            },
            on_toggle_mark: move |()| {
                let mut slot = slot;
                if let SessionSlot::Ready(session) = &mut *slot.write() {
                    session.toggle_mark();
                }
            },
            on_goto: move |index| {
                let mut slot = slot;
                if let SessionSlot::Ready(session) = &mut *slot.write() {
                    session.goto(index);
                }
            },
            on_previous: move |()| {
                let mut slot = slot;
                if let SessionSlot::Ready(session) = &mut *slot.write() {
                    session.previous();
                }
            },
            on_next: move |()| {
                let mut slot = slot;
                if let SessionSlot::Ready(session) = &mut *slot.write() {
                    session.next();
                }
            },
            on_submit: move |()| {
                let service = Arc::clone(&service_for_submit);
                spawn(async move {
                    run_submit(slot, banner, &service).await;
                });
            },
            on_report: move |message: String| {
                let service = Arc::clone(&service_for_report);
                let exam = exam_for_report.clone();
                let mut banner = banner;
                spawn(async move {
                    if let Err(err) = service.report_question(&exam, report_index, message).await {
                        banner.set(Some(format!("Could not send the report: {err}")));
                    }
                });
            },
        }
    }
}

fn render_practice_stage(session: &ExamSession, slot: Signal<SessionSlot>) -> Element {
    let Some(question) = map_question(session.exam(), session.ledger(), session.current_index())
    else {
        return render_missing_state();
    };
    let exam_title = session.exam().title().to_string();
    let palette = map_palette(session.ledger(), session.current_index());

    rsx! {
        PracticeScreen {
            exam_title,
            question,
            palette,
            on_select: move |label| {
                let mut slot = slot;
                if let SessionSlot::Ready(session) = &mut *slot.write() {
                    session.select_answer(label);
                }
            },
            on_goto: move |index| {
                let mut slot = slot;
                if let SessionSlot::Ready(session) = &mut *slot.write() {
                    session.goto(index);
                }
            },
            on_previous: move |()| {
                let mut slot = slot;
                if let SessionSlot::Ready(session) = &mut *slot.write() {
                    session.previous();
                }
            },
            on_next: move |()| {
                let mut slot = slot;
                if let SessionSlot::Ready(session) = &mut *slot.write() {
                    session.next();
                }
            },
        }
    }
}

fn render_results_stage(session: &ExamSession, slot: Signal<SessionSlot>) -> Element {
    let Some(result) = session.final_result() else {
        return render_missing_state();
    };
    let result = map_result(result, session.exam().question_count());

    rsx! {
        ResultsScreen {
            result,
            on_view_solutions: move |()| {
                let mut slot = slot;
                if let SessionSlot::Ready(session) = &mut *slot.write() {
                    let _ = session.view_solutions();
                }
            },
        }
    }
}

fn render_solution_stage(session: &ExamSession, slot: Signal<SessionSlot>) -> Element {
    let exam_title = session.exam().title().to_string();
    let entries = map_solution(session.exam(), session.ledger());
    let legacy_notice = session.legacy_answers();

    rsx! {
        SolutionScreen {
            exam_title,
            entries,
            legacy_notice,
            on_back: move |()| {
                let mut slot = slot;
                if let SessionSlot::Ready(session) = &mut *slot.write() {
                    let _ = session.back_to_results();
                }
            },
        }
    }
}
