use std::collections::BTreeSet;

use crate::column::LabelledColumn;
use crate::error::{LabelledError, Result};

/// Ordered mapping of column name to column with a shared row count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, LabelledColumn)>,
    height: usize,
}

impl Table {
    /// Assemble a table, checking row counts and name uniqueness.
    ///
    /// # Errors
    ///
    /// - [`LabelledError::RowCountMismatch`] if two columns differ in length
    /// - [`LabelledError::DuplicateColumnName`] if a name appears twice
    pub fn assemble<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, LabelledColumn)>,
        S: Into<String>,
    {
        let columns: Vec<(String, LabelledColumn)> = columns
            .into_iter()
            .map(|(name, column)| (name.into(), column))
            .collect();
        let height = columns.first().map_or(0, |(_, column)| column.len());
        let mut names = BTreeSet::new();
        for (name, column) in &columns {
            if column.len() != height {
                return Err(LabelledError::RowCountMismatch {
                    column: name.clone(),
                    expected: height,
                    actual: column.len(),
                });
            }
            if !names.insert(name.as_str()) {
                return Err(LabelledError::DuplicateColumnName { name: name.clone() });
            }
        }
        Ok(Self { columns, height })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&LabelledColumn> {
        self.columns
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, column)| column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LabelledColumn)> {
        self.columns
            .iter()
            .map(|(name, column)| (name.as_str(), column))
    }

    pub fn into_columns(self) -> Vec<(String, LabelledColumn)> {
        self.columns
    }

    /// Project the named columns, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`LabelledError::ColumnNotFound`] for unknown names and
    /// [`LabelledError::DuplicateColumnName`] if a name is selected twice.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let column = self
                .column(name)
                .ok_or_else(|| LabelledError::ColumnNotFound {
                    name: name.to_string(),
                })?;
            columns.push((name.to_string(), column.clone()));
        }
        let mut table = Self::assemble(columns)?;
        if table.is_empty() {
            table.height = self.height;
        }
        Ok(table)
    }

    /// Rename one column, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`LabelledError::ColumnNotFound`] if `from` is absent and
    /// [`LabelledError::DuplicateColumnName`] if `to` is already taken.
    pub fn rename(&self, from: &str, to: &str) -> Result<Self> {
        if self.column(from).is_none() {
            return Err(LabelledError::ColumnNotFound {
                name: from.to_string(),
            });
        }
        Self::assemble(self.columns.iter().map(|(name, column)| {
            let name = if name == from { to } else { name.as_str() };
            (name.to_string(), column.clone())
        }))
    }

    /// Apply a column transform to every column, keeping names and order.
    ///
    /// # Errors
    ///
    /// Returns [`LabelledError::RowCountMismatch`] if the transform changes
    /// the length of any column.
    pub fn map_columns<F>(&self, transform: F) -> Result<Self>
    where
        F: Fn(&LabelledColumn) -> LabelledColumn,
    {
        let mut columns = Vec::with_capacity(self.columns.len());
        for (name, column) in &self.columns {
            let mapped = transform(column);
            if mapped.len() != self.height {
                return Err(LabelledError::RowCountMismatch {
                    column: name.clone(),
                    expected: self.height,
                    actual: mapped.len(),
                });
            }
            columns.push((name.clone(), mapped));
        }
        Ok(Self {
            columns,
            height: self.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueType;

    fn ints(values: &[i64]) -> LabelledColumn {
        LabelledColumn::plain(ValueType::Integer, values.iter().copied().map(Some))
            .expect("column")
    }

    #[test]
    fn assemble_checks_row_counts() {
        let error = Table::assemble([("a", ints(&[1, 2])), ("b", ints(&[1]))])
            .expect_err("row count mismatch");
        assert_eq!(
            error,
            LabelledError::RowCountMismatch {
                column: "b".to_string(),
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn assemble_checks_names() {
        let error = Table::assemble([("a", ints(&[1])), ("a", ints(&[2]))])
            .expect_err("duplicate name");
        assert_eq!(
            error,
            LabelledError::DuplicateColumnName {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn select_and_rename_keep_order() {
        let table = Table::assemble([("a", ints(&[1])), ("b", ints(&[2])), ("c", ints(&[3]))])
            .expect("table");
        let selected = table.select(&["c", "a"]).expect("select");
        assert_eq!(selected.names(), vec!["c", "a"]);
        let renamed = table.rename("b", "bee").expect("rename");
        assert_eq!(renamed.names(), vec!["a", "bee", "c"]);
        assert!(table.rename("b", "a").is_err());
    }

    #[test]
    fn empty_table_has_no_rows() {
        let table = Table::assemble(Vec::<(String, LabelledColumn)>::new()).expect("table");
        assert_eq!(table.height(), 0);
        assert_eq!(table.width(), 0);
    }
}
