//! PDF patient report
//!
//! A4 portrait, Helvetica. The patient table continues across as many pages
//! as needed and every page carries a `Page i of n` footer.

use crate::domain::{MedicodeError, PatientRecord, Result};
use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::io::BufWriter;
use std::ops::Range;

pub const REPORT_TITLE: &str = "MediCode Validator - Patient Report";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_X: f32 = 14.0;
const ROW_HEIGHT: f32 = 7.0;
/// Lowest baseline a table row may use
const TABLE_BOTTOM: f32 = 24.0;
/// Header row baseline on the first page, below title and date
const FIRST_TABLE_TOP: f32 = PAGE_HEIGHT - 40.0;
const NEXT_TABLE_TOP: f32 = PAGE_HEIGHT - 20.0;
const NAME_MAX_CHARS: usize = 32;

const COLUMNS: [(&str, f32); 5] = [
    ("Patient ID", MARGIN_X),
    ("Name", 44.0),
    ("Age", 112.0),
    ("Gender", 130.0),
    ("Last Visit", 158.0),
];

fn rows_fitting(top: f32) -> usize {
    // one slot is taken by the header row
    (((top - TABLE_BOTTOM) / ROW_HEIGHT) as usize).saturating_sub(1).max(1)
}

/// Row ranges per page; an empty table still gets one page
pub fn paginate(row_count: usize) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut start = 0;
    let mut capacity = rows_fitting(FIRST_TABLE_TOP);
    loop {
        let end = (start + capacity).min(row_count);
        pages.push(start..end);
        if end >= row_count {
            return pages;
        }
        start = end;
        capacity = rows_fitting(NEXT_TABLE_TOP);
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}

fn patient_row(record: &PatientRecord) -> [String; 5] {
    [
        record.patient_id.clone(),
        truncate(&record.name, NAME_MAX_CHARS),
        record.age.to_string(),
        record.gender.as_str().to_string(),
        record.last_visit.format("%Y-%m-%d").to_string(),
    ]
}

fn font_error(e: impl std::fmt::Display) -> MedicodeError {
    MedicodeError::Export(format!("PDF font error: {e}"))
}

fn draw_table(
    layer: &PdfLayerReference,
    rows: &[[String; 5]],
    top: f32,
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    for (title, x) in COLUMNS {
        layer.use_text(title, 10.0, Mm(x), Mm(top), bold);
    }
    let mut y = top - ROW_HEIGHT;
    for row in rows {
        for (cell, (_, x)) in row.iter().zip(COLUMNS) {
            layer.use_text(cell.as_str(), 9.0, Mm(x), Mm(y), font);
        }
        y -= ROW_HEIGHT;
    }
}

/// Renders the patient report and returns the PDF bytes
///
/// # Errors
///
/// Returns `Export` if a font cannot be embedded or the document cannot be
/// serialized.
pub fn patient_report_pdf(records: &[PatientRecord], generated_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let rows: Vec<[String; 5]> = records.iter().map(patient_row).collect();
    let pages = paginate(rows.len());
    let page_count = pages.len();

    let (doc, first_page, first_layer) =
        PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(font_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(font_error)?;

    for (index, range) in pages.into_iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(
                Mm(PAGE_WIDTH),
                Mm(PAGE_HEIGHT),
                format!("Layer {}", index + 1),
            );
            doc.get_page(page).get_layer(layer)
        };

        let top = if index == 0 {
            layer.use_text(REPORT_TITLE, 18.0, Mm(MARGIN_X), Mm(PAGE_HEIGHT - 22.0), &bold);
            layer.use_text(
                format!("Report generated on: {}", generated_at.format("%B %d, %Y")),
                11.0,
                Mm(MARGIN_X),
                Mm(PAGE_HEIGHT - 30.0),
                &font,
            );
            FIRST_TABLE_TOP
        } else {
            NEXT_TABLE_TOP
        };

        draw_table(&layer, &rows[range], top, &font, &bold);

        layer.use_text(
            format!("Page {} of {}", index + 1, page_count),
            9.0,
            Mm(PAGE_WIDTH - 34.0),
            Mm(10.0),
            &font,
        );
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| MedicodeError::Export(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| MedicodeError::Export(format!("PDF buffer error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;
    use chrono::TimeZone;

    fn record(i: usize) -> PatientRecord {
        PatientRecord::builder()
            .id(format!("p{i}"))
            .unwrap()
            .name(format!("Patient {i}"))
            .age(30)
            .gender(Gender::Other)
            .patient_id(format!("PT-{i}"))
            .last_visit(Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_paginate_empty_is_one_page() {
        assert_eq!(paginate(0), vec![0..0]);
    }

    #[test]
    fn test_paginate_covers_every_row_once() {
        let pages = paginate(100);
        assert!(pages.len() > 1);
        assert_eq!(pages[0].start, 0);
        assert_eq!(pages.last().unwrap().end, 100);
        for pair in pages.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long patient name", 10), "a very ...");
    }

    #[test]
    fn test_pdf_bytes() {
        let records: Vec<PatientRecord> = (0..60).map(record).collect();
        let bytes = patient_report_pdf(&records, Utc::now()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
