/// Text rendering settings for cells and rows.
///
/// Passed explicitly to every renderer (row rendering, CSV writing); nothing reads a
/// process-wide locale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    /// Separator placed between cells when a whole row is rendered.
    pub delimiter: String,
    /// Text used for null cells.
    pub null_text: String,
    /// `chrono` strftime pattern for timestamps. The default keeps sub-second digits when present.
    pub timestamp_format: String,
    /// Fixed number of fractional digits for floats; `None` uses the shortest round-trip form.
    pub float_precision: Option<usize>,
    /// Character written in place of `.` in floats.
    pub decimal_separator: char,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            null_text: String::new(),
            timestamp_format: "%Y-%m-%d %H:%M:%S%.f".to_string(),
            float_precision: None,
            decimal_separator: '.',
        }
    }
}

impl FormatOptions {
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_null_text(mut self, null_text: impl Into<String>) -> Self {
        self.null_text = null_text.into();
        self
    }

    pub(crate) fn render_float(&self, value: f64) -> String {
        let text = match self.float_precision {
            Some(precision) => format!("{value:.precision$}"),
            None => value.to_string(),
        };
        if self.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &self.decimal_separator.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_rendering_honors_precision_and_separator() {
        let mut options = FormatOptions::default();
        assert_eq!(options.render_float(2.5), "2.5");
        assert_eq!(options.render_float(3.0), "3");

        options.float_precision = Some(2);
        options.decimal_separator = ',';
        assert_eq!(options.render_float(2.5), "2,50");
    }
}
