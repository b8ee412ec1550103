//! Instrumentation hooks.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

/// Whether an event fires before or after the instrumented action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InspectWhen {
    Before,
    After,
}

/// One instrumentation event with named attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InspectEvent {
    pub name: &'static str,
    pub when: InspectWhen,
    pub attrs: Vec<(&'static str, String)>,
}

impl InspectEvent {
    #[must_use]
    pub const fn new(name: &'static str, when: InspectWhen) -> Self {
        Self {
            name,
            when,
            attrs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((key, value.into()));
        self
    }

    /// Look up an attribute by key.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Callback invoked when a matching event fires.
pub type Breakpoint = Arc<dyn Fn(&InspectEvent) + Send + Sync>;

/// Breakpoints registered on a state plus the log of fired events.
#[derive(Clone, Default)]
pub struct Inspector {
    breakpoints: Vec<(&'static str, InspectWhen, Breakpoint)>,
    fired: Vec<InspectEvent>,
}

impl Inspector {
    /// Register a callback for events named `name` at `when`.
    pub fn add_breakpoint(
        &mut self,
        name: &'static str,
        when: InspectWhen,
        callback: impl Fn(&InspectEvent) + Send + Sync + 'static,
    ) {
        self.breakpoints.push((name, when, Arc::new(callback)));
    }

    /// Fire an event: run matching breakpoints, then log it.
    pub fn fire(&mut self, event: InspectEvent) {
        trace!(event = event.name, when = ?event.when, attrs = ?event.attrs, "inspect");
        for (name, when, callback) in &self.breakpoints {
            if *name == event.name && *when == event.when {
                callback(&event);
            }
        }
        self.fired.push(event);
    }

    /// Events fired so far, oldest first.
    #[must_use]
    pub fn fired(&self) -> &[InspectEvent] {
        &self.fired
    }
}

impl fmt::Debug for Inspector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inspector")
            .field("breakpoints", &self.breakpoints.len())
            .field("fired", &self.fired)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_breakpoint_matches_name_and_when() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        let mut inspector = Inspector::default();
        inspector.add_breakpoint("syscall", InspectWhen::Before, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        inspector.fire(InspectEvent::new("syscall", InspectWhen::Before));
        inspector.fire(InspectEvent::new("syscall", InspectWhen::After));
        inspector.fire(InspectEvent::new("exit", InspectWhen::Before));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(inspector.fired().len(), 3);
    }

    #[test]
    fn test_event_attrs() {
        let event =
            InspectEvent::new("syscall", InspectWhen::After).with_attr("syscall_name", "open");
        assert_eq!(event.attr("syscall_name"), Some("open"));
        assert_eq!(event.attr("missing"), None);
    }
}
