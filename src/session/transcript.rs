/// Ordered accumulator of committed transcript fragments.
///
/// Owned exclusively by the consumer loop; fragments are appended in the
/// order their underlying audio was processed.
#[derive(Debug, Default)]
pub struct Transcript {
    fragments: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a committed fragment. Whitespace-only fragments are ignored so
    /// empty recognizer results never pad the transcript.
    pub fn push(&mut self, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.fragments.push(text.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Join fragments with single spaces into the final transcript.
    pub fn finish(&self) -> String {
        self.fragments.join(" ")
    }
}
