mod console;

pub use console::{print_health, print_outcome, print_session, print_welcome, risk_label};
