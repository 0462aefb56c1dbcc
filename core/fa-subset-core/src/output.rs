//! Rendering of the unresolved-icon report.

use std::io::{self, Write};

use serde_json::json;

use crate::plan::ErrorReport;

/// Aligned two-column table of unresolved icons plus advisory footer.
pub fn write_error_table(report: &ErrorReport, writer: &mut impl Write) -> io::Result<()> {
    if report.is_empty() {
        return Ok(());
    }

    writeln!(
        writer,
        "One or more icons were not found in the icon metadata. Check that you are using \
         the correct style and icon names."
    )?;

    let style_width = report
        .rows()
        .map(|row| row.style.to_string().len())
        .max()
        .unwrap_or(0)
        .max("style".len());

    writeln!(writer, "{:style_width$}  missing icons", "style")?;
    for row in report.rows() {
        writeln!(
            writer,
            "{:style_width$}  {}",
            row.style.to_string(),
            row.missing_icons.join(", ")
        )?;
    }
    writeln!(
        writer,
        "See https://fontawesome.com/icons/ for icons, styles, and version availability."
    )
}

/// The same report as a JSON array of `{style, missing_icons}` objects.
pub fn write_error_json(report: &ErrorReport, writer: &mut impl Write) -> io::Result<()> {
    let rows: Vec<serde_json::Value> = report
        .rows()
        .map(|row| {
            json!({
                "style": row.style,
                "missing_icons": row.missing_icons,
            })
        })
        .collect();
    serde_json::to_writer_pretty(&mut *writer, &rows)?;
    writeln!(writer)
}
