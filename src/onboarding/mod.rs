//! Onboarding — the three-step signup wizard.
//!
//! A new parent moves linearly through Account → Kids → Complete. Each
//! step is one form submission that writes directly to the backend; the
//! steps are sequential and non-transactional.

pub mod routes;
pub mod state;

pub use routes::onboarding_routes;
pub use state::OnboardingStep;
