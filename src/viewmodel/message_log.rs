use std::collections::VecDeque;

/// Human readable event log, newest entry first.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct MessageLog(VecDeque<String>);

impl MessageLog {
    pub fn new() -> Self {
        Self(VecDeque::new())
    }

    pub fn prepend(&mut self, message: String) {
        self.0.push_front(message);
    }

    pub fn newest(&self) -> Option<&str> {
        self.0.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
