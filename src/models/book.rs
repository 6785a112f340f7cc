use serde::{Deserialize, Serialize};

use crate::error::RowExtractionError;

/// 图书记录，四个字段都必须非空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub image: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
}

/// 从页面读取的原始行
///
/// `cells` 为行内全部网格单元格文本，作者和出版社分别位于第 3、4 列。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub cells: Vec<String>,
    #[serde(default)]
    pub html: String,
}

const AUTHOR_CELL: usize = 2;
const PUBLISHER_CELL: usize = 3;

impl RawRow {
    /// 表格填充行：没有图片、没有标题、单元格全部为空
    pub fn is_blank(&self) -> bool {
        non_empty(self.image.as_deref()).is_none()
            && non_empty(self.title.as_deref()).is_none()
            && self.cells.iter().all(|c| c.trim().is_empty())
    }

    /// 提取图书记录；任何必填字段缺失都返回错误
    pub fn extract(&self, page: usize, row: usize) -> Result<BookRecord, RowExtractionError> {
        let image = non_empty(self.image.as_deref());
        let title = non_empty(self.title.as_deref());
        let author = non_empty(self.cells.get(AUTHOR_CELL).map(String::as_str));
        let publisher = non_empty(self.cells.get(PUBLISHER_CELL).map(String::as_str));

        match (image, title, author, publisher) {
            (Some(image), Some(title), Some(author), Some(publisher)) => Ok(BookRecord {
                image: image.to_string(),
                title: title.to_string(),
                author: author.to_string(),
                publisher: publisher.to_string(),
            }),
            (image, title, author, publisher) => {
                let missing = [
                    ("image", image.is_none()),
                    ("title", title.is_none()),
                    ("author", author.is_none()),
                    ("publisher", publisher.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(RowExtractionError {
                    page,
                    row,
                    missing,
                    html: self.html.clone(),
                })
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> RawRow {
        RawRow {
            image: Some("https://demoqa.com/images/bookimage0.jpg".into()),
            title: Some("Git Pocket Guide".into()),
            cells: cells.iter().map(|c| c.to_string()).collect(),
            html: "<div class=\"rt-tr-group\"></div>".into(),
        }
    }

    #[test]
    fn test_extract_complete_row() {
        let record = row(&["", "Git Pocket Guide", "Richard E. Silverman", "O'Reilly Media"])
            .extract(1, 1)
            .unwrap();
        assert_eq!(record.author, "Richard E. Silverman");
        assert_eq!(record.publisher, "O'Reilly Media");
    }

    #[test]
    fn test_missing_publisher_is_reported() {
        let err = row(&["", "Git Pocket Guide", "Richard E. Silverman"])
            .extract(2, 4)
            .unwrap_err();
        assert_eq!(err.missing, vec!["publisher"]);
        assert_eq!((err.page, err.row), (2, 4));
        assert!(err.html.contains("rt-tr-group"));
    }

    #[test]
    fn test_whitespace_only_cell_counts_as_missing() {
        let err = row(&["", "t", "  ", "p"]).extract(1, 1).unwrap_err();
        assert_eq!(err.missing, vec!["author"]);
    }

    #[test]
    fn test_padding_row_is_blank() {
        let padding = RawRow {
            cells: vec![String::new(), " ".into()],
            ..RawRow::default()
        };
        assert!(padding.is_blank());
        assert!(!row(&[]).is_blank());
    }
}
