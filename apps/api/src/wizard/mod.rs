// The multi-step form: step catalogue, navigation, the in-flight token and the
// session that ties form state, persistence and generation together.

pub mod handlers;
pub mod inflight;
pub mod navigator;
pub mod session;
pub mod steps;

pub use session::FormSession;
