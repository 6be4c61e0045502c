use spdx_bom::prelude::*;
use std::sync::{Arc, Mutex};

/// One call made on the reporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Message(String),
    Progress { current: usize, total: usize },
    Error(String),
    Completion(String),
}

/// Mock ProgressReporter recording every call in order
#[derive(Default, Clone)]
pub struct MockProgressReporter {
    events: Arc<Mutex<Vec<ReportEvent>>>,
}

impl MockProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn message_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Errors and warnings, in reporting order
    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: ReportEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.record(ReportEvent::Message(message.to_string()));
    }

    fn report_progress(&self, current: usize, total: usize, _message: Option<&str>) {
        self.record(ReportEvent::Progress { current, total });
    }

    fn report_error(&self, message: &str) {
        self.record(ReportEvent::Error(message.to_string()));
    }

    fn report_completion(&self, message: &str) {
        self.record(ReportEvent::Completion(message.to_string()));
    }
}
