use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use exam_core::model::UserId;
use exam_core::time::fixed_clock;
use services::{ExamCatalog, SessionService, StaticIdentity};
use storage::repository::{InMemoryRepository, Storage};

use crate::context::{UiApp, build_app_context};
use crate::routes::AttemptMode;
use crate::views::{AttemptView, HomeView, ReviewView};

#[derive(Clone)]
struct TestApp {
    session_service: Arc<SessionService>,
    catalog: Arc<ExamCatalog>,
}

impl UiApp for TestApp {
    fn session_service(&self) -> Arc<SessionService> {
        Arc::clone(&self.session_service)
    }

    fn catalog(&self) -> Arc<ExamCatalog> {
        Arc::clone(&self.catalog)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Attempt(u64, AttemptMode),
    Review(usize),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Attempt(exam_id, mode) => rsx! { AttemptView { exam_id, mode } },
        ViewKind::Review(result_index) => rsx! { ReviewView { result_index } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, repo: InMemoryRepository) -> ViewHarness {
    let storage = Storage {
        exams: Arc::new(repo.clone()),
        results: Arc::new(repo.clone()),
        reports: Arc::new(repo.clone()),
    };
    let session_service = Arc::new(SessionService::new(
        fixed_clock(),
        storage.clone(),
        Arc::new(repo.clone()),
        Arc::new(StaticIdentity::signed_in(
            UserId::new(7),
            "taker@example.com",
        )),
    ));
    let catalog = Arc::new(ExamCatalog::new(storage));

    let app = Arc::new(TestApp {
        session_service,
        catalog,
    });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom }
}
