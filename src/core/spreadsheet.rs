// src/core/spreadsheet.rs
//! Spreadsheet adapter: the only place that touches calamine, csv and the xlsx container

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use quick_xml::escape::escape;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::app_log;
use crate::error::CvError;
use crate::types::cv_data::RawRow;
use crate::utils::get_file_extension;

pub const TEMPLATE_FILE_NAME: &str = "cv_template.xlsx";
pub const TEMPLATE_SHEET_NAME: &str = "CV Template";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const TEMPLATE_ROWS: [[&str; 2]; 7] = [
    ["section", "details"],
    ["المعلومات الشخصية", "الإســــــــــــــــــم : اكتب الاسم هنا"],
    ["المعلومات الشخصية", "الوظيفة الحــاليــة : اكتب المنصب هنا"],
    ["المعلومات الشخصية", "رقـــــم التليــــفون : اكتب الرقم هنا"],
    ["المعلومات الشخصية", "البريد الإلكترونـى : اكتب البريد هنا"],
    ["المؤهلات العلمية", "اكتب المؤهل الأول هنا"],
    ["التدرج الوظيفى", "اكتب الخبرة الأولى هنا"],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    /// xlsx, xlsm, xlsb, xls or ods; the container is sniffed by calamine
    Workbook,
    Csv,
}

impl SpreadsheetFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self, CvError> {
        match get_file_extension(file_name).as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(SpreadsheetFormat::Workbook),
            Some("csv") => Ok(SpreadsheetFormat::Csv),
            Some(ext) => Err(CvError::UnsupportedFormat(format!(
                "{} (.{})",
                file_name, ext
            ))),
            None => Err(CvError::UnsupportedFormat(format!(
                "{} has no extension",
                file_name
            ))),
        }
    }
}

/// Rows of the first sheet, header included, columns A and B only
pub fn read_rows(bytes: &[u8], format: SpreadsheetFormat) -> Result<Vec<RawRow>, CvError> {
    let rows = match format {
        SpreadsheetFormat::Workbook => read_workbook_rows(bytes)?,
        SpreadsheetFormat::Csv => read_csv_rows(bytes)?,
    };

    app_log!(debug, "Decoded {} rows ({:?})", rows.len(), format);
    Ok(rows)
}

fn read_workbook_rows(bytes: &[u8]) -> Result<Vec<RawRow>, CvError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| CvError::FileRead(format!("Not a readable workbook: {}", e)))?;

    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(rows_from_range(&range)),
        Some(Err(e)) => Err(CvError::FileRead(format!(
            "Failed to read first sheet: {}",
            e
        ))),
        None => Ok(Vec::new()),
    }
}

/// Columns are addressed absolutely so a sheet whose used area starts after
/// column A still maps A to the section label and B to the detail.
fn rows_from_range(range: &Range<Data>) -> Vec<RawRow> {
    let (Some((start_row, _)), Some((end_row, _))) = (range.start(), range.end()) else {
        return Vec::new();
    };

    (start_row..=end_row)
        .map(|row| {
            RawRow::new(
                cell_text(range.get_value((row, 0))),
                cell_text(range.get_value((row, 1))),
            )
        })
        .collect()
}

fn cell_text(cell: Option<&Data>) -> Option<String> {
    match cell? {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn read_csv_rows(bytes: &[u8]) -> Result<Vec<RawRow>, CvError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    reader
        .records()
        .map(|record| {
            let record =
                record.map_err(|e| CvError::FileRead(format!("Invalid CSV data: {}", e)))?;
            let cell = |idx: usize| {
                record
                    .get(idx)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            };
            Ok(RawRow::new(cell(0), cell(1)))
        })
        .collect()
}

// ===== Template workbook =====

/// The downloadable two-column template as xlsx bytes
pub fn write_template() -> Result<Vec<u8>, CvError> {
    write_workbook(TEMPLATE_SHEET_NAME, &TEMPLATE_ROWS)
}

fn write_workbook(sheet_name: &str, rows: &[[&str; 2]]) -> Result<Vec<u8>, CvError> {
    let strings = SharedStrings::from_rows(rows);

    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", ROOT_RELS_XML.to_string()),
        ("xl/workbook.xml", workbook_xml(sheet_name)),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.to_string()),
        ("xl/sharedStrings.xml", strings.to_xml()),
        ("xl/worksheets/sheet1.xml", sheet_xml(rows, &strings)),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, content) in parts {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name, options)
            .map_err(|e| CvError::Export(format!("Failed to add {}: {}", name, e)))?;
        zip.write_all(content.as_bytes())
            .map_err(|e| CvError::Export(format!("Failed to write {}: {}", name, e)))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| CvError::Export(format!("Failed to finish workbook: {}", e)))?;

    Ok(cursor.into_inner())
}

/// Deduplicated string table, indices in first-use order
struct SharedStrings<'a> {
    values: Vec<&'a str>,
    index: HashMap<&'a str, usize>,
    references: usize,
}

impl<'a> SharedStrings<'a> {
    fn from_rows(rows: &[[&'a str; 2]]) -> Self {
        let mut strings = Self {
            values: Vec::new(),
            index: HashMap::new(),
            references: 0,
        };
        for &value in rows.iter().flatten() {
            strings.intern(value);
        }
        strings
    }

    fn intern(&mut self, value: &'a str) -> usize {
        self.references += 1;
        if let Some(&idx) = self.index.get(value) {
            return idx;
        }
        let idx = self.values.len();
        self.values.push(value);
        self.index.insert(value, idx);
        idx
    }

    fn position(&self, value: &str) -> usize {
        self.index.get(value).copied().unwrap_or_default()
    }

    fn to_xml(&self) -> String {
        let items: String = self
            .values
            .iter()
            .map(|value| format!("<si><t>{}</t></si>", escape(*value)))
            .collect();

        format!(
            r#"{XML_DECL}<sst xmlns="{SPREADSHEET_NS}" count="{}" uniqueCount="{}">{}</sst>"#,
            self.references,
            self.values.len(),
            items
        )
    }
}

fn workbook_xml(sheet_name: &str) -> String {
    format!(
        r#"{XML_DECL}<workbook xmlns="{SPREADSHEET_NS}" xmlns:r="{RELATIONSHIP_NS}"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        escape(sheet_name)
    )
}

fn sheet_xml(rows: &[[&str; 2]], strings: &SharedStrings<'_>) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(idx, [section, detail])| {
            let r = idx + 1;
            format!(
                r#"<row r="{r}"><c r="A{r}" t="s"><v>{}</v></c><c r="B{r}" t="s"><v>{}</v></c></row>"#,
                strings.position(section),
                strings.position(detail)
            )
        })
        .collect();

    format!(
        r#"{XML_DECL}<worksheet xmlns="{SPREADSHEET_NS}"><dimension ref="A1:B{}"/><sheetData>{}</sheetData></worksheet>"#,
        rows.len().max(1),
        body
    )
}

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELATIONSHIP_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            SpreadsheetFormat::from_file_name("cv.XLSX").unwrap(),
            SpreadsheetFormat::Workbook
        );
        assert_eq!(
            SpreadsheetFormat::from_file_name("old.xls").unwrap(),
            SpreadsheetFormat::Workbook
        );
        assert_eq!(
            SpreadsheetFormat::from_file_name("cv.csv").unwrap(),
            SpreadsheetFormat::Csv
        );
        assert!(matches!(
            SpreadsheetFormat::from_file_name("cv.pdf"),
            Err(CvError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            SpreadsheetFormat::from_file_name("cv"),
            Err(CvError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_template_reads_back() {
        let bytes = write_template().unwrap();
        let rows = read_rows(&bytes, SpreadsheetFormat::Workbook).unwrap();

        assert_eq!(rows.len(), TEMPLATE_ROWS.len());
        assert_eq!(rows[0], RawRow::cells("section", "details"));

        let sections = parse(&rows);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].title, "المعلومات الشخصية");
        assert_eq!(sections[0].items.len(), 4);
        assert_eq!(sections[1].title, "المؤهلات العلمية");
        assert_eq!(sections[2].title, "التدرج الوظيفى");
        assert_eq!(sections[2].items, vec!["اكتب الخبرة الأولى هنا".to_string()]);
    }

    #[test]
    fn test_template_shares_repeated_strings() {
        let strings = SharedStrings::from_rows(&TEMPLATE_ROWS);
        assert_eq!(strings.references, 14);
        assert_eq!(strings.values.len(), 11);
        assert_eq!(strings.position("المعلومات الشخصية"), 2);
    }

    #[test]
    fn test_workbook_and_csv_parse_alike() {
        let cells: [[&str; 2]; 5] = [
            ["section", "details"],
            ["المعلومات الشخصية", "الإسم : جين"],
            ["", "رقم : 555"],
            ["المهارات", "Rust"],
            ["المعلومات الشخصية", "البريد : jane@example.com"],
        ];
        let xlsx = write_workbook("Sheet1", &cells).unwrap();
        let csv: String = cells
            .iter()
            .map(|[section, detail]| format!("{},{}\n", section, detail))
            .collect();

        let from_xlsx = parse(&read_rows(&xlsx, SpreadsheetFormat::Workbook).unwrap());
        let from_csv = parse(&read_rows(csv.as_bytes(), SpreadsheetFormat::Csv).unwrap());

        assert_eq!(from_xlsx, from_csv);
        assert_eq!(from_xlsx.len(), 2);
        assert_eq!(from_xlsx[0].items.len(), 3);
        assert_eq!(from_xlsx[0].items[2], "البريد : jane@example.com");
    }

    #[test]
    fn test_range_columns_are_absolute() {
        // used area B1:C2, so column A is empty on every row
        let mut range: Range<Data> = Range::new((0, 1), (1, 2));
        range.set_value((0, 1), Data::String("details".to_string()));
        range.set_value((0, 2), Data::String("ignored".to_string()));
        range.set_value((1, 1), Data::String("Name: Jane".to_string()));

        let rows = rows_from_range(&range);
        assert_eq!(
            rows,
            vec![
                RawRow::cells("", "details"),
                RawRow::cells("", "Name: Jane"),
            ]
        );
        assert!(rows_from_range(&Range::<Data>::empty()).is_empty());
    }

    #[test]
    fn test_csv_rows() {
        let csv = "\u{feff}section,details\nPersonal Info,Name: Jane\n,Phone: 555\nEducation\n";
        let rows = read_rows(csv.as_bytes(), SpreadsheetFormat::Csv).unwrap();

        assert_eq!(
            rows,
            vec![
                RawRow::cells("section", "details"),
                RawRow::cells("Personal Info", "Name: Jane"),
                RawRow::cells("", "Phone: 555"),
                RawRow::cells("Education", ""),
            ]
        );
    }

    #[test]
    fn test_csv_quoted_cells_keep_commas() {
        let csv = "section,details\n\"Skills, Tools\",\"Rust, SQL\"\n";
        let rows = read_rows(csv.as_bytes(), SpreadsheetFormat::Csv).unwrap();
        assert_eq!(rows[1], RawRow::cells("Skills, Tools", "Rust, SQL"));
    }

    #[test]
    fn test_corrupt_workbook_is_read_error() {
        let result = read_rows(b"definitely not a workbook", SpreadsheetFormat::Workbook);
        assert!(matches!(result, Err(CvError::FileRead(_))));
    }

    #[test]
    fn test_invalid_utf8_csv_is_read_error() {
        let result = read_rows(&[b'a', b',', 0xff, 0xfe, b'\n'], SpreadsheetFormat::Csv);
        assert!(matches!(result, Err(CvError::FileRead(_))));
    }

    #[test]
    fn test_numeric_cells_render_as_text() {
        assert_eq!(cell_text(Some(&Data::Float(1.0))), Some("1".to_string()));
        assert_eq!(cell_text(Some(&Data::Int(42))), Some("42".to_string()));
        assert_eq!(cell_text(Some(&Data::Empty)), None);
        assert_eq!(cell_text(None), None);
    }
}
