#[cfg(test)]
use std::sync::Mutex;

/// Output message captured by MockOutput for testing
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum OutputMessage {
    Success(String),
    Error(String),
    Warning(String),
    Section(String),
    KeyValue(String, String),
    ListItem(String),
    Dimmed(String),
    Blank,
}

/// Trait for terminal output operations to enable testing with mocks
pub trait Output: Send + Sync {
    /// Print a success message
    fn success(&self, message: &str);

    /// Print an error message
    fn error(&self, message: &str);

    /// Print a warning message
    fn warning(&self, message: &str);

    /// Print a section header
    fn section(&self, title: &str);

    /// Print a key-value pair
    fn key_value(&self, key: &str, value: &str);

    /// Print a bulleted list item
    fn list_item(&self, text: &str);

    /// Print a dimmed/muted message
    fn dimmed(&self, message: &str);

    /// Print a blank line
    fn blank(&self);

    /// Print an environment badge
    fn environment_badge(&self, env_name: &str);
}

/// Real terminal output implementation using the output module
pub struct TerminalOutput;

impl Output for TerminalOutput {
    fn success(&self, message: &str) {
        crate::output::success(message);
    }

    fn error(&self, message: &str) {
        crate::output::error(message);
    }

    fn warning(&self, message: &str) {
        crate::output::warning(message);
    }

    fn section(&self, title: &str) {
        crate::output::section(title);
    }

    fn key_value(&self, key: &str, value: &str) {
        crate::output::key_value(key, value);
    }

    fn list_item(&self, text: &str) {
        crate::output::list_item(text);
    }

    fn dimmed(&self, message: &str) {
        crate::output::dimmed(message);
    }

    fn blank(&self) {
        crate::output::blank();
    }

    fn environment_badge(&self, env_name: &str) {
        crate::output::environment_badge(env_name);
    }
}

/// Mock output implementation for testing (captures output)
#[cfg(test)]
pub struct MockOutput {
    messages: Mutex<Vec<OutputMessage>>,
}

#[cfg(test)]
impl MockOutput {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Get all captured messages
    pub fn get_messages(&self) -> Vec<OutputMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Get all error messages
    pub fn get_errors(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| {
                if let OutputMessage::Error(msg) = m {
                    Some(msg.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    fn push(&self, message: OutputMessage) {
        self.messages.lock().unwrap().push(message);
    }

    /// Get all messages formatted as text
    pub fn to_text(&self) -> String {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|msg| match msg {
                OutputMessage::Success(s) => format!("✓ {}", s),
                OutputMessage::Error(s) => format!("✗ {}", s),
                OutputMessage::Warning(s) => format!("⚠ {}", s),
                OutputMessage::Section(s) => format!("\n=== {} ===", s),
                OutputMessage::KeyValue(k, v) => format!("{}: {}", k, v),
                OutputMessage::ListItem(s) => format!("• {}", s),
                OutputMessage::Dimmed(s) => s.clone(),
                OutputMessage::Blank => String::new(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
impl Default for MockOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl Output for MockOutput {
    fn success(&self, message: &str) {
        self.push(OutputMessage::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(OutputMessage::Error(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.push(OutputMessage::Warning(message.to_string()));
    }

    fn section(&self, title: &str) {
        self.push(OutputMessage::Section(title.to_string()));
    }

    fn key_value(&self, key: &str, value: &str) {
        self.push(OutputMessage::KeyValue(key.to_string(), value.to_string()));
    }

    fn list_item(&self, text: &str) {
        self.push(OutputMessage::ListItem(text.to_string()));
    }

    fn dimmed(&self, message: &str) {
        self.push(OutputMessage::Dimmed(message.to_string()));
    }

    fn blank(&self) {
        self.push(OutputMessage::Blank);
    }

    fn environment_badge(&self, env_name: &str) {
        // Treat as a key-value for testing
        self.push(OutputMessage::KeyValue(
            "Environment".to_string(),
            env_name.to_string(),
        ));
    }
}

/// Output that only surfaces errors and warnings (on stderr), for
/// machine-readable modes where stdout carries the result
pub struct QuietOutput;

impl Output for QuietOutput {
    fn success(&self, _message: &str) {}

    fn error(&self, message: &str) {
        crate::output::error(message);
    }

    fn warning(&self, message: &str) {
        crate::output::warning(message);
    }

    fn section(&self, _title: &str) {}

    fn key_value(&self, _key: &str, _value: &str) {}

    fn list_item(&self, text: &str) {
        eprintln!("  • {}", text);
    }

    fn dimmed(&self, _message: &str) {}

    fn blank(&self) {}

    fn environment_badge(&self, _env_name: &str) {}
}
