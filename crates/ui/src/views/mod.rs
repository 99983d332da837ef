mod attempt;
mod home;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use attempt::{AttemptView, ReviewView};
pub use home::HomeView;
pub use state::{ViewError, ViewState, view_state_from_resource};
