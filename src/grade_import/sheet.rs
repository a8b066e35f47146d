// src/grade_import/sheet.rs

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use thiserror::Error;

use super::PreviewRow;

/// Column positions of the grade template.
mod cols {
    pub const SNO: usize = 0;
    pub const NAME: usize = 1;
    pub const SCORE: usize = 2;
    pub const EXAM_DATE: usize = 3;
    pub const COMMENT: usize = 4;
}

/// The upload is not a readable workbook.
#[derive(Debug, Error)]
#[error("could not read spreadsheet: {0}")]
pub struct ParseError(#[from] calamine::Error);

/// Decodes the first sheet of an `.xlsx`/`.xls` workbook into rows.
///
/// Row 1 is the header and is skipped. Rows whose cells are all blank are
/// dropped. A workbook without a first sheet yields no rows.
pub fn parse_sheet(bytes: &[u8]) -> Result<Vec<PreviewRow>, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(Vec::new()),
    };

    Ok(range
        .rows()
        .skip(1)
        .filter(|row| !is_blank_row(row))
        .map(to_preview_row)
        .collect())
}

fn is_blank_row(row: &[Data]) -> bool {
    row.iter().all(|cell| cell_text(cell).trim().is_empty())
}

fn to_preview_row(row: &[Data]) -> PreviewRow {
    let text = |idx: usize| row.get(idx).map(cell_text).unwrap_or_default();
    let optional = |idx: usize| Some(text(idx)).filter(|s| !s.trim().is_empty());

    PreviewRow {
        sno: text(cols::SNO).trim().to_string(),
        name: text(cols::NAME).trim().to_string(),
        score: row.get(cols::SCORE).map(cell_score).unwrap_or(0.0),
        exam_date: optional(cols::EXAM_DATE),
        comment: optional(cols::COMMENT),
    }
}

/// Cell rendered as display text.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| format_number(dt.as_f64())),
    }
}

/// Integral values print without a trailing `.0`.
fn format_number(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

fn cell_score(cell: &Data) -> f64 {
    let value = match cell {
        Data::Int(i) => *i as f64,
        Data::Float(f) => *f,
        Data::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    fn workbook(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    const HEADER: &[&str] = &["工号", "姓名", "分数", "考试日期", "备注"];

    #[test]
    fn header_only_sheet_has_no_rows() {
        let bytes = workbook(&[HEADER]);
        assert!(parse_sheet(&bytes).unwrap().is_empty());
    }

    #[test]
    fn empty_sheet_has_no_rows() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        let bytes = workbook.save_to_buffer().unwrap();
        assert!(parse_sheet(&bytes).unwrap().is_empty());
    }

    #[test]
    fn blank_rows_are_dropped() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (c, h) in HEADER.iter().enumerate() {
            sheet.write_string(0, c as u16, *h).unwrap();
        }
        sheet.write_string(1, 0, "E001").unwrap();
        sheet.write_string(1, 1, "张三").unwrap();
        sheet.write_number(1, 2, 85).unwrap();
        // Row 2 only holds whitespace.
        sheet.write_string(2, 1, "   ").unwrap();
        sheet.write_string(3, 0, "E002").unwrap();
        sheet.write_string(3, 1, "李四").unwrap();
        sheet.write_number(3, 2, 72.5).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = parse_sheet(&bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sno, "E001");
        assert_eq!(rows[0].score, 85.0);
        assert_eq!(rows[1].sno, "E002");
        assert_eq!(rows[1].score, 72.5);
    }

    #[test]
    fn columns_map_by_position() {
        let bytes = workbook(&[
            HEADER,
            &["E001", "张三", "85", "2024-06-01 09:00:00", ""],
            &["E002", "李四", "72", "2024-06-01 09:00:00", "补考名单"],
        ]);

        let rows = parse_sheet(&bytes).unwrap();
        assert_eq!(
            rows,
            vec![
                PreviewRow {
                    sno: "E001".to_string(),
                    name: "张三".to_string(),
                    score: 85.0,
                    exam_date: Some("2024-06-01 09:00:00".to_string()),
                    comment: None,
                },
                PreviewRow {
                    sno: "E002".to_string(),
                    name: "李四".to_string(),
                    score: 72.0,
                    exam_date: Some("2024-06-01 09:00:00".to_string()),
                    comment: Some("补考名单".to_string()),
                },
            ]
        );
    }

    #[test]
    fn non_numeric_or_missing_score_reads_as_zero() {
        let bytes = workbook(&[HEADER, &["E001", "张三", "absent"], &["E002", "李四"]]);

        let rows = parse_sheet(&bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].score, 0.0);
        assert_eq!(rows[1].score, 0.0);
        assert_eq!(rows[1].exam_date, None);
    }

    #[test]
    fn numeric_sno_prints_without_decimals() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "工号").unwrap();
        sheet.write_number(1, 0, 10086).unwrap();
        sheet.write_string(1, 1, "王五").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = parse_sheet(&bytes).unwrap();
        assert_eq!(rows[0].sno, "10086");
    }

    #[test]
    fn date_cells_render_as_timestamps() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        let date = ExcelDateTime::parse_from_str("2024-06-01 09:00:00").unwrap();
        sheet.write_string(0, 0, "工号").unwrap();
        sheet.write_string(1, 0, "E001").unwrap();
        sheet.write_number(1, 2, 90).unwrap();
        sheet.write_datetime_with_format(1, 3, &date, &format).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = parse_sheet(&bytes).unwrap();
        assert_eq!(rows[0].exam_date.as_deref(), Some("2024-06-01 09:00:00"));
    }

    #[test]
    fn malformed_binary_is_a_parse_error() {
        assert!(parse_sheet(b"definitely not a workbook").is_err());
    }
}
