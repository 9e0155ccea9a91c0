//! Console command history with Up/Down navigation

/// Entered command lines, oldest first
#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<String>,
    max_entries: usize,
    /// Current navigation position (None = not navigating)
    position: Option<usize>,
    /// Line being typed when navigation started
    saved_input: String,
}

impl History {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
            position: None,
            saved_input: String::new(),
        }
    }

    /// Add an entry; blank lines and repeats of the last entry are skipped
    pub fn add(&mut self, entry: &str) {
        self.position = None;
        if entry.trim().is_empty() || self.entries.last().is_some_and(|last| last == entry) {
            return;
        }
        self.entries.push(entry.to_string());
        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Step to the previous (older) entry. Returns `None` at the oldest one.
    pub fn prev(&mut self, current_input: &str) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        match self.position {
            None => {
                self.saved_input = current_input.to_string();
                self.position = Some(self.entries.len() - 1);
                self.entries.last().map(String::as_str)
            }
            Some(pos) if pos > 0 => {
                self.position = Some(pos - 1);
                self.entries.get(pos - 1).map(String::as_str)
            }
            _ => None,
        }
    }

    /// Step to the next (newer) entry, ending with the line that was being
    /// typed before navigation started
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&str> {
        match self.position {
            Some(pos) if pos + 1 < self.entries.len() => {
                self.position = Some(pos + 1);
                self.entries.get(pos + 1).map(String::as_str)
            }
            Some(_) => {
                self.position = None;
                Some(&self.saved_input)
            }
            None => None,
        }
    }

    pub fn is_navigating(&self) -> bool {
        self.position.is_some()
    }
}
