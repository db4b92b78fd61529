//! CDS-style `ReadMe` describing the exported tables.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::catalog::meta::CatalogMeta;
use crate::catalog::mrt::{LINE_WIDTH, MrtFile, rule, wrap};
use crate::error::AppError;

fn short_title(title: &str) -> &str {
    title.split(':').next().unwrap_or(title).trim()
}

fn file_summary_line(name: &str, lrecl: &str, records: &str, explanation: &str) -> String {
    format!("{name:<13} {lrecl:>6} {records:>8}  {explanation}")
}

pub fn format_readme(meta: &CatalogMeta, files: &[MrtFile]) -> String {
    let year = meta.year();
    let designation = if meta.catalogue.is_empty() { "J/???/???" } else { meta.catalogue.as_str() };
    let mut out = String::new();

    out.push_str(&format!(
        "{designation}  {}  ({}, {year})\n",
        short_title(&meta.title),
        meta.short_author
    ));
    out.push_str(&rule('='));
    out.push('\n');
    for line in wrap(&meta.title, LINE_WIDTH, "") {
        out.push_str(&line);
        out.push('\n');
    }
    for line in wrap(&meta.authors, LINE_WIDTH - 4, "    ") {
        if line.starts_with("    ") {
            out.push_str(&line);
        } else {
            out.push_str(&format!("    {line}"));
        }
        out.push('\n');
    }
    out.push_str(&rule('='));
    out.push('\n');

    let keywords = wrap(&meta.keywords, LINE_WIDTH - 10, "          ");
    out.push_str(&format!("Keywords: {}\n\n", keywords.join("\n")));

    out.push_str("Abstract:\n");
    for line in wrap(&meta.abstract_text, LINE_WIDTH - 2, "  ") {
        if line.starts_with("  ") {
            out.push_str(&line);
        } else {
            out.push_str(&format!("  {line}"));
        }
        out.push('\n');
    }
    out.push('\n');

    out.push_str("File Summary:\n");
    out.push_str(&rule('-'));
    out.push('\n');
    out.push_str(&file_summary_line(" FileName", "Lrecl", "Records", "Explanations"));
    out.push('\n');
    out.push_str(&rule('-'));
    out.push('\n');
    out.push_str(&file_summary_line("ReadMe", &LINE_WIDTH.to_string(), ".", "This file"));
    out.push('\n');
    for f in files {
        out.push_str(&file_summary_line(
            &f.file_name,
            &f.lrecl.to_string(),
            &f.records.to_string(),
            &f.explanation,
        ));
        out.push('\n');
    }
    out.push_str(&rule('-'));
    out.push('\n');

    if !meta.references.is_empty() {
        out.push_str("\nSee also:\n");
        for r in &meta.references {
            let line = format!("  {} : {}", r.url, r.description);
            if line.len() <= LINE_WIDTH {
                out.push_str(&line);
            } else {
                out.push_str(&format!("  {} :\n      {}", r.url, r.description));
            }
            out.push('\n');
        }
    }

    for f in files {
        out.push('\n');
        out.push_str(&f.byte_description);
    }

    out.push('\n');
    out.push_str(&rule('='));
    out.push('\n');
    let tail = format!("{} [{year}]", meta.short_author);
    out.push_str(&format!("(End){tail:>width$}\n", width = LINE_WIDTH - 5));

    out
}

pub fn write_readme(dir: &Path, meta: &CatalogMeta, files: &[MrtFile]) -> Result<(), AppError> {
    let path = dir.join("ReadMe");
    fs::write(&path, format_readme(meta, files))
        .map_err(|e| AppError::output(format!("Failed to write ReadMe '{}': {e}", path.display())))?;
    info!(path = %path.display(), tables = files.len(), "wrote ReadMe");
    Ok(())
}
