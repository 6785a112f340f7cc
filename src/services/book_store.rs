//! 图书存储 - 业务能力层
//!
//! SQLite 中的 `Books` 表；建表是幂等的。

use crate::error::AppResult;
use crate::models::BookRecord;
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::{debug, info};

const CREATE_BOOKS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS Books (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        image     TEXT NOT NULL,
        title     TEXT NOT NULL,
        author    TEXT NOT NULL,
        publisher TEXT NOT NULL
    )";

pub struct BookStore {
    conn: Connection,
}

impl BookStore {
    /// 打开数据库并确保表存在
    pub fn open(db_path: &Path) -> AppResult<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    /// 内存数据库
    #[cfg(test)]
    pub fn in_memory() -> AppResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> AppResult<Self> {
        conn.execute_batch(CREATE_BOOKS_TABLE)?;
        debug!("Books 表已就绪");
        Ok(Self { conn })
    }

    /// 在一个事务中写入全部记录，返回写入条数
    pub fn insert_all(&mut self, books: &[BookRecord]) -> AppResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO Books (image, title, author, publisher) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for book in books {
                stmt.execute(params![book.image, book.title, book.author, book.publisher])?;
            }
        }
        tx.commit()?;
        info!("✓ 已写入 {} 条图书记录", books.len());
        Ok(books.len())
    }

    /// 读取全部记录（按 id 顺序）
    #[cfg(test)]
    pub fn all(&self) -> AppResult<Vec<BookRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT image, title, author, publisher FROM Books ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(BookRecord {
                image: row.get(0)?,
                title: row.get(1)?,
                author: row.get(2)?,
                publisher: row.get(3)?,
            })
        })?;
        let books = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str) -> BookRecord {
        BookRecord {
            image: format!("https://demoqa.com/images/{}.jpg", title),
            title: title.to_string(),
            author: "Addy Osmani".to_string(),
            publisher: "O'Reilly Media".to_string(),
        }
    }

    #[test]
    fn test_insert_and_read_back_in_order() {
        let mut store = BookStore::in_memory().unwrap();
        let inserted = store.insert_all(&[book("a"), book("b")]).unwrap();
        assert_eq!(inserted, 2);
        let titles: Vec<_> = store.all().unwrap().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("demoqa.db");
        BookStore::open(&path).unwrap().insert_all(&[book("a")]).unwrap();

        let store = BookStore::open(&path).unwrap();
        assert_eq!(store.all().unwrap().len(), 1);
    }
}
