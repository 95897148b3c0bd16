// 🔌 Rental Services - collaborators injected into rentals and processes

use std::rc::Rc;

use crate::audit::{ActionEvent, ActionLog, TracingActionLog};
use crate::notify::{ConsoleNotifier, Notifier};

/// Notifier + action log handed to every component that needs them
#[derive(Clone)]
pub struct RentalServices {
    notifier: Rc<dyn Notifier>,
    actions: Rc<dyn ActionLog>,
}

impl RentalServices {
    pub fn new(notifier: Rc<dyn Notifier>, actions: Rc<dyn ActionLog>) -> Self {
        RentalServices { notifier, actions }
    }

    /// Console notifications, actions as tracing events
    pub fn console() -> Self {
        RentalServices::new(Rc::new(ConsoleNotifier), Rc::new(TracingActionLog))
    }

    pub fn notify(&self, message: &str, recipient: Option<&str>) {
        self.notifier.send(message, recipient);
    }

    pub fn record(&self, event: ActionEvent) {
        self.actions.record(event);
    }
}

impl Default for RentalServices {
    fn default() -> Self {
        Self::console()
    }
}

impl std::fmt::Debug for RentalServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RentalServices").finish_non_exhaustive()
    }
}
