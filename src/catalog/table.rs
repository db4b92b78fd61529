//! In-memory catalog table: named text columns with per-column metadata.
//!
//! Cells keep their source text so the MRT writer can infer each column's
//! format from what was actually written. `None` marks a null (empty or
//! masked) cell.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::AppError;

/// Unit placeholder for dimensionless columns.
pub const NO_UNIT: &str = "---";

/// Declared value type of a column, overriding inference from the cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub description: String,
    pub unit: String,
    /// `None` lets the MRT writer infer the format.
    pub kind: Option<ColumnKind>,
    pub values: Vec<Option<String>>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        let name = name.into();
        Self {
            description: name.replace('_', " "),
            unit: NO_UNIT.to_string(),
            kind: None,
            name,
            values,
        }
    }

    pub fn with_kind(mut self, kind: ColumnKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn has_nulls(&self) -> bool {
        self.values.iter().any(Option::is_none)
    }

    /// Apply `f` to every non-null cell.
    pub fn map_values(&mut self, f: impl Fn(&str) -> String) {
        for v in self.values.iter_mut().flatten() {
            let mapped = f(v.as_str());
            *v = mapped;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    /// Read a CSV file with a header row. Empty cells become nulls.
    pub fn from_csv_path(path: &Path, name: &str) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::input(format!("Failed to open table CSV '{}': {e}", path.display())))?;
        Self::from_csv_reader(file, name)
    }

    pub fn from_csv_reader<R: Read>(reader: R, name: &str) -> Result<Self, AppError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| AppError::input(format!("{name}: failed to read CSV headers: {e}")))?
            .clone();
        let mut columns: Vec<Column> = headers.iter().map(|h| Column::new(h, Vec::new())).collect();

        for (idx, result) in reader.records().enumerate() {
            let record = result
                .map_err(|e| AppError::input(format!("{name}:{}: CSV parse error: {e}", idx + 2)))?;
            for (col, cell) in columns.iter_mut().zip(record.iter()) {
                col.values
                    .push(if cell.is_empty() { None } else { Some(cell.to_string()) });
            }
        }

        Ok(Self { name: name.to_string(), columns })
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    fn position(&self, name: &str) -> Result<usize, AppError> {
        self.columns.iter().position(|c| c.name == name).ok_or_else(|| {
            AppError::input(format!(
                "{}: no column '{name}'. Available: {}",
                self.name,
                self.column_names().join(", ")
            ))
        })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column, AppError> {
        let i = self.position(name)?;
        Ok(&self.columns[i])
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column, AppError> {
        let i = self.position(name)?;
        Ok(&mut self.columns[i])
    }

    pub fn remove_column(&mut self, name: &str) -> Result<Column, AppError> {
        let i = self.position(name)?;
        Ok(self.columns.remove(i))
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<(), AppError> {
        let col = self.column_mut(from)?;
        col.name = to.to_string();
        col.description = to.replace('_', " ");
        Ok(())
    }

    pub fn push_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Keep only `names`, in that order.
    pub fn select(&mut self, names: &[&str]) -> Result<(), AppError> {
        let mut picked = Vec::with_capacity(names.len());
        for name in names {
            let i = self.position(name)?;
            picked.push(self.columns[i].clone());
        }
        self.columns = picked;
        Ok(())
    }

    /// Attach descriptions and units, one per column in order.
    pub fn describe(&mut self, meta: &[(&str, &str)]) -> Result<(), AppError> {
        if meta.len() != self.columns.len() {
            return Err(AppError::input(format!(
                "{}: expected {} columns, found {} ({})",
                self.name,
                meta.len(),
                self.columns.len(),
                self.column_names().join(", ")
            )));
        }
        for (col, (description, unit)) in self.columns.iter_mut().zip(meta) {
            col.description = description.to_string();
            col.unit = unit.to_string();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "id,flux,note\nA,1.5,\nB,,x\n";

    #[test]
    fn empty_cells_are_null() {
        let t = Table::from_csv_reader(CSV.as_bytes(), "t").unwrap();
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.column("flux").unwrap().values, vec![Some("1.5".into()), None]);
        assert!(t.column("note").unwrap().has_nulls());
        assert!(!t.column("id").unwrap().has_nulls());
    }

    #[test]
    fn rename_select_and_remove() {
        let mut t = Table::from_csv_reader(CSV.as_bytes(), "t").unwrap();
        t.rename_column("flux", "F_850").unwrap();
        t.select(&["note", "F_850"]).unwrap();
        assert_eq!(t.column_names(), vec!["note", "F_850"]);
        t.remove_column("note").unwrap();
        assert_eq!(t.column_names(), vec!["F_850"]);
        assert!(t.remove_column("id").is_err());
    }

    #[test]
    fn describe_checks_column_count() {
        let mut t = Table::from_csv_reader(CSV.as_bytes(), "t").unwrap();
        assert!(t.describe(&[("a", "---")]).is_err());
        t.describe(&[("ident", "---"), ("flux", "Jy"), ("remark", "---")]).unwrap();
        assert_eq!(t.column("flux").unwrap().unit, "Jy");
        assert_eq!(t.column("id").unwrap().description, "ident");
    }
}
