// src/export.rs
// Spreadsheet export plus the column width/alignment formatting pass.

use std::path::Path;

use csv::ReaderBuilder;
use umya_spreadsheet::{reader, writer, HorizontalAlignmentValues};

use crate::errors::{SimError, SimResult};

/// Presentation settings for the three result columns:
/// Statement / Rating / Rationale.
fn column_settings() -> [(&'static str, f64, HorizontalAlignmentValues); 3] {
    [
        ("A", 86.0, HorizontalAlignmentValues::Left),
        ("B", 13.0, HorizontalAlignmentValues::Center),
        ("C", 225.0, HorizontalAlignmentValues::Left),
    ]
}

fn column_index(column: &str) -> u32 {
    match column {
        "A" => 1,
        "B" => 2,
        _ => 3,
    }
}

/// Reads a pipe-delimited archive back and writes it as a three-column
/// workbook: header row, then one row per rating. The rating column is
/// stored numerically so spreadsheet tooling can aggregate it.
pub fn archive_to_workbook(archive: &Path, destination: &Path) -> SimResult<()> {
    let mut table = ReaderBuilder::new()
        .delimiter(b'|')
        .quoting(false)
        .has_headers(true)
        .from_path(archive)?;

    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut("Sheet1")
        .ok_or_else(|| SimError::Spreadsheet("default sheet missing".to_string()))?;

    let headers = table.headers()?.clone();
    for (col, name) in headers.iter().enumerate() {
        sheet.get_cell_mut((col as u32 + 1, 1)).set_value(name);
    }

    let mut row = 2u32;
    for record in table.records() {
        let record = record?;
        for (col, field) in record.iter().enumerate() {
            let cell = sheet.get_cell_mut((col as u32 + 1, row));
            match field.parse::<f64>() {
                Ok(number) if col == 1 => {
                    cell.set_value_number(number);
                }
                _ => {
                    cell.set_value(field);
                }
            }
        }
        row += 1;
    }

    writer::xlsx::write(&book, destination).map_err(|e| SimError::Spreadsheet(e.to_string()))?;
    log::info!("Exported workbook to {}", destination.display());
    Ok(())
}

/// Applies fixed column widths and horizontal alignment to every sheet of
/// every workbook in `input_folder`, saving the styled copies under
/// `output_folder` with the same filenames.
pub fn format_workbooks_in_folder(input_folder: &Path, output_folder: &Path) -> SimResult<()> {
    std::fs::create_dir_all(output_folder)?;
    let mut processed = 0usize;

    for entry in std::fs::read_dir(input_folder)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("xlsx") {
            continue;
        }

        let mut book = reader::xlsx::read(&path)
            .map_err(|e| SimError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

        for sheet in book.get_sheet_collection_mut() {
            let highest_row = sheet.get_highest_row();
            for (column, width, alignment) in column_settings() {
                sheet.get_column_dimension_mut(column).set_width(width);
                let col = column_index(column);
                for row in 1..=highest_row {
                    sheet
                        .get_cell_mut((col, row))
                        .get_style_mut()
                        .get_alignment_mut()
                        .set_horizontal(alignment.clone());
                }
            }
        }

        let out_path = output_folder.join(entry.file_name());
        writer::xlsx::write(&book, &out_path)
            .map_err(|e| SimError::Spreadsheet(e.to_string()))?;
        println!("Processed {} and saved to {}", path.display(), out_path.display());
        log::info!("Processed {} and saved to {}", path.display(), out_path.display());
        processed += 1;
    }

    log::info!(
        "Formatted {} workbooks from {}",
        processed,
        input_folder.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "personapoll_export_{}_{}",
            std::process::id(),
            tag
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn archive_round_trips_into_a_workbook() {
        let dir = temp_dir("roundtrip");
        let archive = dir.join("run.txt");
        fs::write(
            &archive,
            "Statement|Rating|Rationale\nChange is good.|35|Fits the persona\nRules matter.|-100|Hard conflict",
        )
        .unwrap();

        let workbook_path = dir.join("run.xlsx");
        archive_to_workbook(&archive, &workbook_path).unwrap();

        let book = reader::xlsx::read(&workbook_path).unwrap();
        let sheet = book.get_sheet_by_name("Sheet1").unwrap();
        assert_eq!(sheet.get_value((1, 1)), "Statement");
        assert_eq!(sheet.get_value((3, 1)), "Rationale");
        assert_eq!(sheet.get_value((1, 2)), "Change is good.");
        assert_eq!(sheet.get_value((2, 3)), "-100");
        assert_eq!(sheet.get_value((3, 3)), "Hard conflict");
    }

    #[test]
    fn formatting_pass_sets_widths_on_every_workbook() {
        let input = temp_dir("format_in");
        let output = temp_dir("format_out");

        let archive = input.join("run.txt");
        fs::write(&archive, "Statement|Rating|Rationale\nS1|10|ok").unwrap();
        archive_to_workbook(&archive, &input.join("run.xlsx")).unwrap();

        format_workbooks_in_folder(&input, &output).unwrap();

        let styled = output.join("run.xlsx");
        assert!(styled.exists());
        let book = reader::xlsx::read(&styled).unwrap();
        let sheet = book.get_sheet_by_name("Sheet1").unwrap();
        let width = *sheet.get_column_dimension("A").unwrap().get_width();
        assert_eq!(width, 86.0);
        // Content survives the styling pass untouched.
        assert_eq!(sheet.get_value((1, 2)), "S1");
    }

    #[test]
    fn non_xlsx_files_are_ignored_by_the_formatting_pass() {
        let input = temp_dir("ignore_in");
        let output = temp_dir("ignore_out");
        fs::write(input.join("notes.txt"), "not a workbook").unwrap();

        format_workbooks_in_folder(&input, &output).unwrap();
        assert!(!output.join("notes.txt").exists());
    }
}
