use serde::{Deserialize, Serialize};

/// Keyed rows plus the name of the column that carries the row identifier.
///
/// The id column is fixed when the table is built and cannot be reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table<R> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    rows: Vec<R>,
}

impl<R> Table<R> {
    /// Create a table with an optional id column.
    pub const fn new(id: Option<String>, rows: Vec<R>) -> Self {
        Self { id, rows }
    }

    /// Name of the id column, if the table has one.
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The rows, in input order.
    #[inline]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Take ownership of the rows.
    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert every row, keeping the id column.
    pub fn map<T, F: FnMut(R) -> T>(self, f: F) -> Table<T> {
        Table {
            id: self.id,
            rows: self.rows.into_iter().map(f).collect(),
        }
    }
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self::new(None, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table() {
        let table = Table::new(Some("ID".to_string()), vec![1, 2, 3]);
        assert_eq!(table.id(), Some("ID"));
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows(), &[1, 2, 3]);
        assert_eq!(table.into_rows(), vec![1, 2, 3]);
    }

    #[test]
    fn test_default_is_empty() {
        let table: Table<String> = Table::default();
        assert!(table.is_empty());
        assert_eq!(table.id(), None);
    }

    #[test]
    fn test_map_keeps_id() {
        let table = Table::new(Some("id".to_string()), vec![1, 2]);
        let mapped = table.map(|n| n * 10);
        assert_eq!(mapped.id(), Some("id"));
        assert_eq!(mapped.rows(), &[10, 20]);
    }
}
