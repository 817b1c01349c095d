use crate::dif::FormatError;

pub const FIELD_COUNT: &str = "count";
pub const FIELD_ORDER_NUMBER: &str = "order-nr";
pub const FIELD_FILENAME: &str = "Filename";
pub const FIELD_OPTIONAL_COUNT: &str = "count optional";

/// Field names declared by the header tuple, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema(Vec<String>);

impl FieldSchema {
    pub fn new(names: Vec<String>) -> FieldSchema {
        FieldSchema(names)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Position of the first field called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|x| x == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Positions of the fields a board is built from.
///
/// Resolved once against the [FieldSchema] and reused for every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldIndex {
    pub count: usize,
    pub order_number: usize,
    pub filename: usize,
    pub optional_count: usize,
}

impl FieldIndex {
    pub fn resolve(schema: &FieldSchema) -> Result<FieldIndex, FormatError> {
        let find = |name: &'static str| schema.position(name).ok_or(FormatError::MissingField(name));

        Ok(FieldIndex {
            count: find(FIELD_COUNT)?,
            order_number: find(FIELD_ORDER_NUMBER)?,
            filename: find(FIELD_FILENAME)?,
            optional_count: find(FIELD_OPTIONAL_COUNT)?,
        })
    }
}
