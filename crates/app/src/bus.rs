//! Synchronous event bus for the host layer.
//!
//! The dispatcher itself returns outputs directly; this bus is the
//! external collaborator that fans them out to renderer, notification
//! area, and file picker. Handlers run synchronously in registration
//! order.

use crate::events::Output;

pub type Handler = Box<dyn FnMut(&Output)>;

#[derive(Default)]
pub struct EventBus {
    handlers: Vec<Handler>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, handler: Handler) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, output: &Output) {
        for handler in &mut self.handlers {
            handler(output);
        }
    }

    pub fn publish_all(&mut self, outputs: &[Output]) {
        for output in outputs {
            self.publish(output);
        }
    }
}

/// Collects published outputs for assertions.
#[cfg(test)]
pub(crate) mod collect {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    pub fn collector(bus: &mut EventBus) -> Rc<RefCell<Vec<Output>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(Box::new(move |output| {
            sink.borrow_mut().push(output.clone());
        }));
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handlers_run_in_registration_order() {
        let mut bus = EventBus::new();
        let first = collect::collector(&mut bus);
        let second = collect::collector(&mut bus);

        bus.publish(&Output::info("one"));
        bus.publish_all(&[Output::error("two"), Output::TriggerFileLoad]);

        assert_eq!(first.borrow().len(), 3);
        assert_eq!(*first.borrow(), *second.borrow());
    }
}
