use tabula_columnar::FormatOptions;

#[derive(Clone, Debug, PartialEq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub has_header: bool,
    /// How to decode raw CSV bytes into text fields.
    pub encoding: TextEncoding,
    /// Non-null values inspected per column before its kind is fixed.
    pub sample_rows: usize,
    /// Decimal separator used when parsing floats.
    ///
    /// `.` matches inputs like `1,234.56`. `,` matches inputs like `1.234,56`.
    pub decimal_separator: char,
    /// Field values (after trimming) that read as null, in addition to the empty field.
    pub null_tokens: Vec<String>,
    /// `chrono` format strings tried in order. Date-only formats read as midnight.
    pub timestamp_formats: Vec<String>,
    /// Strip surrounding whitespace from every field before it is inspected or stored.
    pub trim_fields: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            encoding: TextEncoding::Auto,
            sample_rows: 200,
            decimal_separator: '.',
            null_tokens: Vec::new(),
            timestamp_formats: DEFAULT_TIMESTAMP_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            trim_fields: true,
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_null_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }
}

pub const DEFAULT_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// Attempt to decode as UTF-8; if a field contains invalid UTF-8, fall back to Windows-1252.
    #[default]
    Auto,
    /// Decode as UTF-8 and reject invalid byte sequences.
    Utf8,
    /// Decode as Windows-1252 (aka CP-1252).
    Windows1252,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CsvWriteOptions {
    pub delimiter: u8,
    pub include_header: bool,
    /// Cell rendering. Its `delimiter` is unused here; nulls are written as `null_text`.
    pub format: FormatOptions,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            include_header: true,
            format: FormatOptions::default(),
        }
    }
}
