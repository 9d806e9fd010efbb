//! # Presentation Boundary
//!
//! What an interactive front end must provide so flows can ask the operator
//! for input. Registry operations never prompt; only front-end flows hold a
//! `UserPrompt` and sequence it with registry calls.

/// Interactive operator I/O.
pub trait UserPrompt {
    /// Asks for a single value. `None` means the operator cancelled.
    fn ask_field(&mut self, name: &str) -> Option<String>;

    /// Asks a yes/no question.
    fn confirm(&mut self, question: &str) -> bool;

    /// Shows an informational message.
    fn notify(&mut self, message: &str);
}

impl<P: UserPrompt + ?Sized> UserPrompt for &mut P {
    fn ask_field(&mut self, name: &str) -> Option<String> {
        (**self).ask_field(name)
    }

    fn confirm(&mut self, question: &str) -> bool {
        (**self).confirm(question)
    }

    fn notify(&mut self, message: &str) {
        (**self).notify(message)
    }
}
