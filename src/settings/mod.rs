// Quiz settings module
#[allow(clippy::module_inception)]
pub mod settings;

pub use settings::QuizSettings;
