// src/grade_import/template.rs

use rust_xlsxwriter::{Workbook, XlsxError};

/// Base file name (and sheet name) of the downloadable template.
pub const TEMPLATE_BASE_NAME: &str = "成绩导入模板";

pub const TEMPLATE_HEADER: [&str; 5] = ["工号", "姓名", "分数", "考试日期", "备注"];

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Example rows: sno, name, score, exam date, comment.
const EXAMPLE_ROWS: [(&str, &str, f64, &str, &str); 2] = [
    ("E001", "张三", 85.0, "2024-06-01 09:00:00", ""),
    ("E002", "李四", 72.0, "2024-06-01 09:00:00", "补考名单"),
];

/// Replaces characters that are not allowed in file names with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.replace(
        |c: char| matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|'),
        "_",
    )
}

/// `成绩导入模板.xlsx`, or `成绩导入模板-<title>.xlsx` when a quiz title is given.
pub fn template_file_name(quiz_title: Option<&str>) -> String {
    match quiz_title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => format!("{}-{}.xlsx", TEMPLATE_BASE_NAME, sanitize_file_name(title)),
        None => format!("{}.xlsx", TEMPLATE_BASE_NAME),
    }
}

/// Builds the template workbook: header row plus two example rows.
pub fn build_template() -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(TEMPLATE_BASE_NAME)?;

    for (col, title) in TEMPLATE_HEADER.iter().enumerate() {
        sheet.write_string(0, col as u16, *title)?;
    }

    for (idx, (sno, name, score, exam_date, comment)) in EXAMPLE_ROWS.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, *sno)?;
        sheet.write_string(row, 1, *name)?;
        sheet.write_number(row, 2, *score)?;
        sheet.write_string(row, 3, *exam_date)?;
        if !comment.is_empty() {
            sheet.write_string(row, 4, *comment)?;
        }
    }

    sheet.set_column_width(3, 22)?;
    sheet.set_column_width(4, 18)?;

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grade_import::parse_sheet;

    #[test]
    fn file_name_without_title() {
        assert_eq!(template_file_name(None), "成绩导入模板.xlsx");
        assert_eq!(template_file_name(Some("  ")), "成绩导入模板.xlsx");
    }

    #[test]
    fn file_name_sanitizes_title() {
        assert_eq!(
            template_file_name(Some(r#"Q1: a/b\c*d?"e"<f>|g"#)),
            "成绩导入模板-Q1_ a_b_c_d__e__f__g.xlsx"
        );
    }

    #[test]
    fn template_reads_back_as_two_rows() {
        let bytes = build_template().unwrap();
        let rows = parse_sheet(&bytes).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sno, "E001");
        assert_eq!(rows[0].name, "张三");
        assert_eq!(rows[0].score, 85.0);
        assert_eq!(rows[0].comment, None);
        assert_eq!(rows[1].comment.as_deref(), Some("补考名单"));
        assert_eq!(rows[1].exam_date.as_deref(), Some("2024-06-01 09:00:00"));
    }
}
