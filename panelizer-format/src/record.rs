/// One data tuple, positionally aligned with the [FieldSchema](crate::FieldSchema).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueRecord {
    pub(crate) line: usize,
    pub(crate) values: Vec<String>,
}

impl ValueRecord {
    pub fn new(line: usize, values: Vec<String>) -> ValueRecord {
        ValueRecord { line, values }
    }

    /// Input line on which this record's tuple started.
    #[inline(always)]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value at `index`, or an empty string past the end.
    #[inline(always)]
    pub fn get(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}
