//! CSV 导出 - 业务能力层

use crate::models::BookRecord;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

pub const CSV_HEADER: &str = "image,title,author,publisher";

/// 导出图书记录到 CSV 文件
pub fn export_csv(path: &Path, books: &[BookRecord]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(fs::File::create(path)?);
    write_csv(&mut writer, books)?;
    writer.flush()?;
    info!("✓ 已导出 {} 条记录到 {}", books.len(), path.display());
    Ok(())
}

pub fn write_csv<W: Write>(writer: &mut W, books: &[BookRecord]) -> std::io::Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for book in books {
        writeln!(
            writer,
            "{},{},{},{}",
            quote(&book.image),
            quote(&book.title),
            quote(&book.author),
            quote(&book.publisher)
        )?;
    }
    Ok(())
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_quoting() {
        let books = vec![BookRecord {
            image: "https://demoqa.com/images/bookimage0.jpg".into(),
            title: "Learning JavaScript Design Patterns".into(),
            author: "Addy Osmani".into(),
            publisher: "O'Reilly Media, Inc.".into(),
        }];
        let mut out = Vec::new();
        write_csv(&mut out, &books).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "image,title,author,publisher\n\
             https://demoqa.com/images/bookimage0.jpg,Learning JavaScript Design Patterns,Addy Osmani,\"O'Reilly Media, Inc.\"\n"
        );
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_empty_export_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("books.csv");
        export_csv(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), format!("{}\n", CSV_HEADER));
    }
}
