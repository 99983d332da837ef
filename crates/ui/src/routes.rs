use std::fmt;
use std::str::FromStr;

use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{AttemptView, HomeView, ReviewView};

/// How an attempt route enters the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptMode {
    Start,
    Resume,
    Practice,
}

impl fmt::Display for AttemptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AttemptMode::Start => "start",
            AttemptMode::Resume => "resume",
            AttemptMode::Practice => "practice",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptModeParseError(String);

impl fmt::Display for AttemptModeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown attempt mode: {}", self.0)
    }
}

impl std::error::Error for AttemptModeParseError {}

impl FromStr for AttemptMode {
    type Err = AttemptModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "resume" => Ok(Self::Resume),
            "practice" => Ok(Self::Practice),
            other => Err(AttemptModeParseError(other.to_string())),
        }
    }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/attempt/:exam_id/:mode", AttemptView)] Attempt { exam_id: u64, mode: AttemptMode },
        #[route("/review/:result_index", ReviewView)] Review { result_index: usize },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "topbar",
                Link { class: "brand", to: Route::Home {}, "Exam Prep" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
