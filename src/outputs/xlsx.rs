//! Styled spreadsheet export.
//!
//! One sheet, one row per headline, columns in the order of [`COLUMNS`]. The
//! importance cell is tinted per tier and non-empty links are written as
//! hyperlinks.

use crate::error::ExportError;
use crate::models::{Headline, ImportanceTier};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatUnderline, Workbook, Worksheet, XlsxError};
use std::path::Path;
use crate::utils::truncate_for_log;
use tracing::{debug, info, instrument};

pub const DEFAULT_FILENAME: &str = "news_headlines_styled.xlsx";
pub const SHEET_NAME: &str = "News Headlines";
pub const COLUMNS: [&str; 5] = ["Source", "Headline", "Link", "Importance", "Emoji"];
const COLUMN_WIDTHS: [f64; 5] = [20.0, 80.0, 50.0, 15.0, 8.0];

const TEXT_GREY: u32 = 0x444444;
const BORDER_GREY: u32 = 0xDDDDDD;
const LINK_BLUE: u32 = 0x0563C1;

/// Cell values of one spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow<'a> {
    pub source: &'a str,
    pub headline: &'a str,
    pub link: &'a str,
    pub importance: ImportanceTier,
    pub emoji: &'a str,
}

/// Rows to write, in the order given.
pub fn sheet_rows(headlines: &[Headline]) -> Vec<SheetRow<'_>> {
    headlines
        .iter()
        .map(|h| SheetRow {
            source: &h.source,
            headline: &h.text,
            link: &h.link,
            importance: h.importance,
            emoji: &h.emoji,
        })
        .collect()
}

/// Write `headlines` to a workbook at `path`.
///
/// The workbook holds a single sheet named [`SHEET_NAME`] with a styled
/// header row followed by one row per headline, in the order given. Links
/// Excel cannot turn into hyperlinks (unknown schemes such as `javascript:`,
/// or overlong URLs) are written as plain text so the row is still exported.
///
/// # Arguments
///
/// * `headlines` - Rows to export
/// * `path` - Destination file; an existing file is overwritten
///
/// # Errors
///
/// Returns [`ExportError::Empty`] without touching the filesystem when
/// `headlines` is empty, or [`ExportError::Xlsx`] when the workbook cannot
/// be built or saved.
#[instrument(level = "info", skip(headlines), fields(count = headlines.len()))]
pub fn write_workbook(headlines: &[Headline], path: &Path) -> Result<(), ExportError> {
    if headlines.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    write_sheet(sheet, &sheet_rows(headlines))?;
    workbook.save(path)?;

    info!(path = %path.display(), rows = headlines.len(), "Wrote spreadsheet");
    Ok(())
}

fn bordered() -> Format {
    Format::new()
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(BORDER_GREY))
}

fn write_sheet(sheet: &mut Worksheet, rows: &[SheetRow<'_>]) -> Result<(), XlsxError> {
    let header = bordered()
        .set_bold()
        .set_font_size(18)
        .set_font_color(Color::RGB(TEXT_GREY))
        .set_background_color(Color::RGB(0xF9F9F9))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let centered = bordered()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let source = centered.clone().set_font_color(Color::RGB(TEXT_GREY));
    let headline = bordered()
        .set_bold()
        .set_italic()
        .set_font_size(14)
        .set_font_color(Color::RGB(TEXT_GREY))
        .set_text_wrap()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::Top);
    let plain_link = bordered()
        .set_text_wrap()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::Top);
    let hyperlink = plain_link
        .clone()
        .set_underline(FormatUnderline::Single)
        .set_font_color(Color::RGB(LINK_BLUE));

    for (col, (name, width)) in COLUMNS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *name, &header)?;
        sheet.set_column_width(col, width)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        let importance = centered
            .clone()
            .set_bold()
            .set_background_color(Color::RGB(row.importance.cell_fill()))
            .set_font_color(Color::RGB(row.importance.cell_font()));

        sheet.write_string_with_format(r, 0, row.source, &source)?;
        sheet.write_string_with_format(r, 1, row.headline, &headline)?;
        if row.link.is_empty() {
            sheet.write_blank(r, 2, &plain_link)?;
        } else {
            match sheet.write_url_with_format(r, 2, row.link, &hyperlink) {
                Ok(_) => {}
                // Excel only links known schemes up to 2080 chars; keep the text
                Err(XlsxError::UnknownUrlType(_) | XlsxError::MaxUrlLengthExceeded) => {
                    debug!(link = %truncate_for_log(row.link, 120), "Link kept as plain text");
                    sheet.write_string_with_format(r, 2, row.link, &plain_link)?;
                }
                Err(e) => return Err(e),
            }
        }
        sheet.write_string_with_format(r, 3, row.importance.label(), &importance)?;
        sheet.write_string_with_format(r, 4, row.emoji, &centered)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractedHeadline, LinkScope, SiteDescriptor};
    use calamine::{Reader, Xlsx, open_workbook};

    fn headlines() -> Vec<Headline> {
        let site = SiteDescriptor {
            name: "Example".to_string(),
            url: "https://example.com/news".to_string(),
            tag: "h3".to_string(),
            class_name: String::new(),
            link_tag: "a".to_string(),
            link_class: String::new(),
            base_url: "https://example.com".to_string(),
            site_url: "https://example.com".to_string(),
            link_scope: LinkScope::SelfThenParent,
        };
        [
            ("Quake emergency declared", "https://example.com/a", ImportanceTier::High),
            ("Policy paper published", "", ImportanceTier::Medium),
            ("Museum reopens", "https://example.com/c", ImportanceTier::Low),
        ]
        .into_iter()
        .map(|(text, link, tier)| {
            Headline::new(
                &site,
                ExtractedHeadline {
                    text: text.to_string(),
                    link: link.to_string(),
                },
                tier,
            )
        })
        .collect()
    }

    fn read_back(path: &Path) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    fn with_links(links: &[&str]) -> Vec<Headline> {
        let template = headlines().remove(0);
        links
            .iter()
            .enumerate()
            .map(|(i, link)| Headline {
                text: format!("Story {i}"),
                link: link.to_string(),
                ..template.clone()
            })
            .collect()
    }

    #[test]
    fn test_every_headline_becomes_one_row() {
        let headlines = headlines();
        let rows = sheet_rows(&headlines);
        assert_eq!(rows.len(), headlines.len());
        for (row, h) in rows.iter().zip(&headlines) {
            assert_eq!(row.source, h.source);
            assert_eq!(row.headline, h.text);
            assert_eq!(row.link, h.link);
            assert_eq!(row.importance, h.importance);
            assert_eq!(row.emoji, h.importance.glyph());
        }
    }

    #[test]
    fn test_empty_export_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_FILENAME);
        let err = write_workbook(&[], &path).unwrap_err();
        assert!(matches!(err, ExportError::Empty));
        assert!(!path.exists());
    }

    #[test]
    fn test_workbook_round_trips_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_FILENAME);
        let headlines = headlines();
        write_workbook(&headlines, &path).unwrap();

        let rows = read_back(&path);
        assert_eq!(rows.len(), headlines.len() + 1);
        assert_eq!(rows[0], COLUMNS.map(String::from).to_vec());
        for (row, h) in rows[1..].iter().zip(&headlines) {
            assert_eq!(row[0], h.source);
            assert_eq!(row[1], h.text);
            assert_eq!(row[2], h.link);
            assert_eq!(row[3], h.importance.label());
            assert_eq!(row[4], h.emoji);
        }
        // blank link cell
        assert_eq!(rows[2][2], "");
    }

    #[test]
    fn test_unlinkable_urls_are_kept_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_FILENAME);
        let long = format!("https://example.com/{}", "a".repeat(2100));
        let headlines = with_links(&["https://example.com/a", "javascript:void(0)", "tel:+123", &long]);
        write_workbook(&headlines, &path).unwrap();

        let rows = read_back(&path);
        assert_eq!(rows.len(), 5);
        let links: Vec<_> = rows[1..].iter().map(|r| r[2].as_str()).collect();
        assert_eq!(links, vec!["https://example.com/a", "javascript:void(0)", "tel:+123", long.as_str()]);
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.xlsx");
        assert!(write_workbook(&headlines(), &path).is_err());
    }
}
