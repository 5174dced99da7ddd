use std::cell::RefCell;
use std::rc::Rc;

use crate::parser::UserInterface;

/// A user interface capturing all output in memory.
///
/// *Available using 'unit_test' crate feature only.*
///
/// Clones share the same buffers, so a clone handed to the parser can be inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInterface {
    messages: Rc<RefCell<Vec<String>>>,
    errors: Rc<RefCell<Vec<String>>>,
}

impl UserInterface for InMemoryInterface {
    fn print(&self, message: String) {
        self.messages.borrow_mut().push(message);
    }

    fn print_error(&self, message: String) {
        self.errors.borrow_mut().push(message);
    }
}

impl InMemoryInterface {
    /// Everything printed so far, one line per `print` call (each terminated by `'\n'`).
    pub fn consume_message(&self) -> String {
        join(self.messages.take())
    }

    /// Every error printed so far, each terminated by `'\n'`.
    pub fn consume_error(&self) -> String {
        join(self.errors.take())
    }
}

fn join(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| format!("{line}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_interface() {
        // Setup
        let interface = InMemoryInterface::default();
        let shared = interface.clone();

        // Execute
        shared.print("a".to_string());
        shared.print("b".to_string());
        shared.print_error("oops".to_string());

        // Verify
        assert_eq!(interface.consume_message(), "a\nb\n");
        assert_eq!(interface.consume_error(), "oops\n");
        assert_eq!(interface.consume_message(), "");
    }
}
