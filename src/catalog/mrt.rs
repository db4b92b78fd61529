//! Machine-readable table (MRT) writer.
//!
//! An MRT file is a short header, a byte-by-byte description of the columns,
//! and fixed-width data lines:
//!
//! ```text
//! Title: ...
//! Authors: ...
//! Table: ...
//! ================================================================================
//! Byte-by-byte Description of file: table5.mrt
//! --------------------------------------------------------------------------------
//!    Bytes Format Units   Label                  Explanations
//! --------------------------------------------------------------------------------
//!    1- 10 A10    ---     IRASPSC                IRAS PSC identifier
//!   12- 15 F4.1   arcsec  HARP_CO32_FWHM         FWHM of Gaussian fit ...
//! --------------------------------------------------------------------------------
//! 00042+4248 17.2 ...
//! ```
//!
//! Column formats are inferred from the cell text; nullable columns get a `?`
//! in front of their explanation and blank cells.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::catalog::meta::CatalogMeta;
use crate::catalog::table::{Column, ColumnKind, Table};
use crate::error::AppError;

pub const LINE_WIDTH: usize = 80;

pub fn rule(c: char) -> String {
    std::iter::repeat_n(c, LINE_WIDTH).collect()
}

/// Fortran-style column format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFormat {
    Integer { width: usize },
    Float { width: usize, decimals: usize },
    Exponent { width: usize, decimals: usize },
    Text { width: usize },
}

impl ColumnFormat {
    pub fn width(&self) -> usize {
        match *self {
            ColumnFormat::Integer { width }
            | ColumnFormat::Float { width, .. }
            | ColumnFormat::Exponent { width, .. }
            | ColumnFormat::Text { width } => width,
        }
    }

    pub fn code(&self) -> String {
        match *self {
            ColumnFormat::Integer { width } => format!("I{width}"),
            ColumnFormat::Float { width, decimals } => format!("F{width}.{decimals}"),
            ColumnFormat::Exponent { width, decimals } => format!("E{width}.{decimals}"),
            ColumnFormat::Text { width } => format!("A{width}"),
        }
    }

    /// Cell text without padding. `value` must satisfy the format it was
    /// inferred from.
    fn text(&self, value: &str) -> String {
        match *self {
            ColumnFormat::Integer { .. } | ColumnFormat::Text { .. } => value.to_string(),
            ColumnFormat::Float { decimals, .. } => match value.parse::<f64>() {
                Ok(v) => format!("{v:.decimals$}"),
                Err(_) => value.to_string(),
            },
            ColumnFormat::Exponent { decimals, .. } => match value.parse::<f64>() {
                Ok(v) => fortran_exp(v, decimals),
                Err(_) => value.to_string(),
            },
        }
    }

    /// Cell padded to the column width; nulls are blank.
    pub fn render(&self, value: Option<&str>) -> String {
        let width = self.width();
        match value {
            None => " ".repeat(width),
            Some(v) => match self {
                ColumnFormat::Text { .. } => format!("{:<width$}", self.text(v)),
                _ => format!("{:>width$}", self.text(v)),
            },
        }
    }
}

/// `1.50e-07` style: mantissa with `decimals` digits, signed two-digit exponent.
fn fortran_exp(v: f64, decimals: usize) -> String {
    let s = format!("{v:.decimals$e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let e: i32 = exp.parse().unwrap_or(0);
            let sign = if e < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", e.abs())
        }
        None => s,
    }
}

fn decimals_of(s: &str) -> usize {
    let mantissa = s.split(['e', 'E']).next().unwrap_or(s);
    mantissa.split_once('.').map_or(0, |(_, frac)| frac.len())
}

/// Pick the narrowest format that represents every non-null cell.
///
/// A declared `Column::kind` wins over inference when the cells allow it; a
/// declared float column always gets at least one decimal.
pub fn infer_format(column: &Column) -> ColumnFormat {
    let values: Vec<&str> = column.values.iter().flatten().map(String::as_str).collect();
    let text_width = values.iter().map(|v| v.chars().count()).max().unwrap_or(1).max(1);

    if values.is_empty() {
        return match column.kind {
            Some(ColumnKind::Integer) => ColumnFormat::Integer { width: 1 },
            Some(ColumnKind::Float) => ColumnFormat::Float { width: 1, decimals: 0 },
            _ => ColumnFormat::Text { width: 1 },
        };
    }

    let all_float = values
        .iter()
        .all(|v| v.parse::<f64>().is_ok_and(f64::is_finite));
    match column.kind {
        Some(ColumnKind::Text) => return ColumnFormat::Text { width: text_width },
        Some(ColumnKind::Float) if all_float => return float_format(&values, 1),
        _ => {}
    }

    if column.kind != Some(ColumnKind::Float) && values.iter().all(|v| v.parse::<i64>().is_ok()) {
        return ColumnFormat::Integer { width: text_width };
    }
    if !all_float {
        return ColumnFormat::Text { width: text_width };
    }
    float_format(&values, 0)
}

fn float_format(values: &[&str], min_decimals: usize) -> ColumnFormat {
    let decimals = values
        .iter()
        .map(|v| decimals_of(v))
        .max()
        .unwrap_or(0)
        .max(min_decimals);
    let probe = if values.iter().any(|v| v.contains(['e', 'E'])) {
        ColumnFormat::Exponent { width: 0, decimals }
    } else {
        ColumnFormat::Float { width: 0, decimals }
    };
    let width = values.iter().map(|v| probe.text(v).len()).max().unwrap_or(1);
    match probe {
        ColumnFormat::Exponent { .. } => ColumnFormat::Exponent { width, decimals },
        _ => ColumnFormat::Float { width, decimals },
    }
}

/// Byte range and metadata of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub start: usize,
    pub end: usize,
    pub format: ColumnFormat,
    pub unit: String,
    pub label: String,
    pub explanation: String,
}

/// Lay the columns out left to right, one blank between neighbours.
pub fn layout(table: &Table) -> Vec<ColumnLayout> {
    let mut start = 1;
    table
        .columns
        .iter()
        .map(|col| {
            let format = infer_format(col);
            let end = start + format.width() - 1;
            let explanation = if col.has_nulls() {
                format!("? {}", col.description)
            } else {
                col.description.clone()
            };
            let item = ColumnLayout {
                start,
                end,
                format,
                unit: col.unit.clone(),
                label: col.name.clone(),
                explanation,
            };
            start = end + 2;
            item
        })
        .collect()
}

/// Greedy word wrap; continuation lines are prefixed with `indent`.
pub(crate) fn wrap(text: &str, first_width: usize, indent: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut limit = first_width;

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > limit {
            lines.push(std::mem::take(&mut current));
            limit = LINE_WIDTH.saturating_sub(indent.len());
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(i, l)| if i == 0 { l } else { format!("{indent}{l}") })
        .collect()
}

/// The "Byte-by-byte Description" block, shared by the MRT header and the ReadMe.
pub fn byte_description(file_name: &str, columns: &[ColumnLayout]) -> String {
    let label_width = columns.iter().map(|c| c.label.len()).max().unwrap_or(5).max(5);
    let unit_width = columns.iter().map(|c| c.unit.len()).max().unwrap_or(5).max(5);

    let mut out = String::new();
    out.push_str(&format!("Byte-by-byte Description of file: {file_name}\n"));
    out.push_str(&rule('-'));
    out.push('\n');
    out.push_str(
        format!(
            "   Bytes Format {:<unit_width$}  {:<label_width$}  Explanations\n",
            "Units", "Label"
        )
        .as_str(),
    );
    out.push_str(&rule('-'));
    out.push('\n');

    for c in columns {
        let bytes = if c.start == c.end {
            format!("{:>8}", c.end)
        } else {
            format!("{:>4}-{:>3}", c.start, c.end)
        };
        let prefix = format!(
            "{bytes} {:<6} {:<unit_width$}  {:<label_width$}  ",
            c.format.code(),
            c.unit,
            c.label
        );
        let indent = " ".repeat(prefix.len() + 2);
        let wrapped = wrap(&c.explanation, LINE_WIDTH.saturating_sub(prefix.len()), &indent);
        out.push_str(&prefix);
        out.push_str(&wrapped.join("\n"));
        out.push('\n');
    }
    out.push_str(&rule('-'));
    out.push('\n');
    out
}

pub fn data_lines(table: &Table, columns: &[ColumnLayout]) -> Vec<String> {
    (0..table.n_rows())
        .map(|row| {
            let cells: Vec<String> = table
                .columns
                .iter()
                .zip(columns)
                .map(|(col, layout)| layout.format.render(col.values[row].as_deref()))
                .collect();
            cells.join(" ").trim_end().to_string()
        })
        .collect()
}

/// A written MRT file, as listed in the ReadMe.
#[derive(Debug, Clone)]
pub struct MrtFile {
    pub file_name: String,
    pub explanation: String,
    /// Record length: the last byte of the last column.
    pub lrecl: usize,
    pub records: usize,
    pub byte_description: String,
}

/// Render an MRT file in memory.
pub fn format_mrt(table: &Table, meta: &CatalogMeta, explanation: &str) -> (MrtFile, String) {
    let file_name = format!("{}.mrt", table.name);
    let columns = layout(table);
    let byte_description = byte_description(&file_name, &columns);
    let lines = data_lines(table, &columns);

    let mut out = String::new();
    out.push_str(&format!("Title: {}\n", wrap(&meta.title, LINE_WIDTH - 7, "       ").join("\n")));
    out.push_str(&format!("Authors: {}\n", meta.short_author));
    out.push_str(&format!("Table: {explanation}\n"));
    out.push_str(&rule('='));
    out.push('\n');
    out.push_str(&byte_description);
    for line in &lines {
        out.push_str(line);
        out.push('\n');
    }

    let file = MrtFile {
        file_name,
        explanation: explanation.to_string(),
        lrecl: columns.last().map_or(0, |c| c.end),
        records: lines.len(),
        byte_description,
    };
    (file, out)
}

/// Write `<dir>/<table name>.mrt`.
pub fn write_mrt(dir: &Path, table: &Table, meta: &CatalogMeta, explanation: &str) -> Result<MrtFile, AppError> {
    let (file, text) = format_mrt(table, meta, explanation);
    let path = dir.join(&file.file_name);
    fs::write(&path, text)
        .map_err(|e| AppError::output(format!("Failed to write MRT '{}': {e}", path.display())))?;
    info!(path = %path.display(), records = file.records, lrecl = file.lrecl, "wrote MRT table");
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, values: &[Option<&str>]) -> Column {
        Column::new(name, values.iter().map(|v| v.map(str::to_string)).collect())
    }

    #[test]
    fn infers_integer_float_exponent_and_text() {
        assert_eq!(
            infer_format(&col("n", &[Some("1"), Some("-12"), None])),
            ColumnFormat::Integer { width: 3 }
        );
        assert_eq!(
            infer_format(&col("f", &[Some("17.2"), Some("3.25"), Some("120")])),
            ColumnFormat::Float { width: 6, decimals: 2 }
        );
        assert_eq!(
            infer_format(&col("e", &[Some("1.5e-7"), Some("2.25E-06")])),
            ColumnFormat::Exponent { width: 8, decimals: 2 }
        );
        assert_eq!(
            infer_format(&col("s", &[Some("KU And"), Some("1.0")])),
            ColumnFormat::Text { width: 6 }
        );
        assert_eq!(infer_format(&col("x", &[None, None])), ColumnFormat::Text { width: 1 });
    }

    #[test]
    fn declared_float_column_is_never_integer() {
        let extent = col("ext", &[Some("30"), None, Some("12")]).with_kind(ColumnKind::Float);
        assert_eq!(infer_format(&extent), ColumnFormat::Float { width: 4, decimals: 1 });
        assert_eq!(infer_format(&extent).render(Some("30")), "30.0");

        let text = col("id", &[Some("1"), Some("22")]).with_kind(ColumnKind::Text);
        assert_eq!(infer_format(&text), ColumnFormat::Text { width: 2 });
    }

    #[test]
    fn renders_fixed_width_cells() {
        let f = ColumnFormat::Float { width: 6, decimals: 2 };
        assert_eq!(f.render(Some("3.5")), "  3.50");
        assert_eq!(f.render(None), "      ");
        assert_eq!(ColumnFormat::Text { width: 5 }.render(Some("ab")), "ab   ");
        assert_eq!(fortran_exp(1.5e-7, 2), "1.50e-07");
        assert_eq!(fortran_exp(3.0e12, 1), "3.0e+12");
    }

    #[test]
    fn layout_assigns_byte_ranges_and_null_marks() {
        let mut t = Table { name: "t".into(), columns: vec![
            col("ID", &[Some("A1"), Some("B22")]),
            col("flag", &[Some("0"), Some("1")]),
            col("ext", &[Some("31.5"), None]),
        ] };
        t.columns[2].description = "extent".into();

        let l = layout(&t);
        assert_eq!((l[0].start, l[0].end), (1, 3));
        assert_eq!((l[1].start, l[1].end), (5, 5));
        assert_eq!((l[2].start, l[2].end), (7, 10));
        assert_eq!(l[2].explanation, "? extent");

        let lines = data_lines(&t, &l);
        assert_eq!(lines, vec!["A1  0 31.5".to_string(), "B22 1".to_string()]);

        let desc = byte_description("t.mrt", &l);
        assert!(desc.contains("       5 I1 "));
        assert!(desc.contains("   7- 10 F4.1"));
    }

    #[test]
    fn long_explanations_wrap_within_line_width() {
        let lines = wrap(&"word ".repeat(40), 50, "    ");
        assert!(lines.len() > 1);
        assert!(lines[0].len() <= 50);
        assert!(lines.iter().skip(1).all(|l| l.starts_with("    ") && l.len() <= LINE_WIDTH));
    }

    #[test]
    fn mrt_text_has_header_description_and_rows() {
        let t = Table { name: "table9".into(), columns: vec![col("ID", &[Some("X"), Some("Y")])] };
        let (file, text) = format_mrt(&t, &CatalogMeta::default(), "machine-readable table");
        assert_eq!(file.file_name, "table9.mrt");
        assert_eq!(file.records, 2);
        assert_eq!(file.lrecl, 1);
        assert!(text.starts_with("Title: The Nearby Evolved Stars Survey II"));
        assert!(text.contains("Byte-by-byte Description of file: table9.mrt"));
        assert!(text.ends_with("X\nY\n"));
    }
}
