mod callback;
mod command_def;
mod features;
mod handler;
mod router;

pub use command_def::MyCommands;
pub use handler::{answer, answer_callback};
