pub mod listener;
pub mod notifier;

pub use listener::run_feedback_listener;
pub use notifier::TelegramNotifier;
