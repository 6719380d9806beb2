//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod buttons;
pub mod console;
pub mod effects;
pub mod session;

pub use buttons::button_task;
pub use console::console_tx_task;
pub use effects::effects_task;
pub use session::session_task;
