//! Text filter pipeline.
//!
//! Plain strings from the CMS never reach the output unescaped:
//! - `html_escape` / `HtmlEscapeFilter`: escapes all HTML-significant characters
//! - `LineBreakFilter`: turns multi-line text into `<br>`-separated lines
//! - `FilterPipeline::plain_text`: single-line fields such as titles and quotes
//! - `FilterPipeline::multiline`: callout bodies and step descriptions

/// Trait for text filters in the pipeline.
pub trait TextFilter: Send + Sync {
    /// Process the input text and return filtered output.
    fn process(&self, input: &str) -> String;
}

/// Pipeline of text filters applied in sequence.
pub struct FilterPipeline {
    filters: Vec<Box<dyn TextFilter>>,
}

impl FilterPipeline {
    fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add<F: TextFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Escape only. Newlines pass through untouched.
    pub fn plain_text() -> Self {
        Self::new().add(HtmlEscapeFilter)
    }

    /// Escape, then join the non-empty lines with `<br>`.
    pub fn multiline() -> Self {
        Self::new().add(HtmlEscapeFilter).add(LineBreakFilter)
    }

    /// Process text through all filters in the pipeline.
    pub fn process(&self, input: &str) -> String {
        self.filters
            .iter()
            .fold(input.to_string(), |acc, filter| filter.process(&acc))
    }
}

/// Escape text for use in HTML content and double-quoted attribute values.
pub fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Filter that escapes all HTML characters.
pub struct HtmlEscapeFilter;

impl TextFilter for HtmlEscapeFilter {
    fn process(&self, input: &str) -> String {
        html_escape(input)
    }
}

/// Characters that end a line. `\r\n` needs no entry of its own since the
/// empty segment between the two is dropped.
const LINE_BOUNDARIES: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Filter that splits on line boundaries, drops blank lines and joins the
/// rest with `<br>`.
pub struct LineBreakFilter;

impl TextFilter for LineBreakFilter {
    fn process(&self, input: &str) -> String {
        input
            .split(LINE_BOUNDARIES)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("<br>")
    }
}
