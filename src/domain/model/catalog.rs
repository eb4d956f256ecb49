use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::book::{AddBookRequest, Book};
use super::id::BookId;
use super::report::Statistics;
use crate::domain::error::DomainError;

/// 検索対象のフィールド。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Genre,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Genre => "genre",
        }
    }

    fn value_of<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            SearchField::Title => book.title(),
            SearchField::Author => book.author(),
            SearchField::Genre => book.genre(),
        }
    }
}

impl FromStr for SearchField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // 旧UIの仏語名も受け付ける
        match s.trim().to_lowercase().as_str() {
            "title" | "titre" => Ok(SearchField::Title),
            "author" | "auteur" => Ok(SearchField::Author),
            "genre" => Ok(SearchField::Genre),
            other => Err(DomainError::Validation(format!(
                "unknown search field: '{other}'. Use: title, author, genre"
            ))),
        }
    }
}

/// 削除の結果。確認が取れなければ何も変更しない。
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(Book),
    Cancelled,
}

/// Catalog — 集約ルート。挿入順を保った書籍の列で、全操作はここを経由する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id() == id)
    }

    /// 次に採番されるID。既存の最大値 + 1、空なら1。
    /// 最大IDの書籍を削除した後は同じIDが再利用される。
    /// 最大IDが u32 の上限に達していれば採番できない。
    pub fn next_id(&self) -> Result<BookId, DomainError> {
        match self.books.iter().map(Book::id).max() {
            None => Ok(BookId::FIRST),
            Some(max) => max.checked_next().ok_or_else(|| {
                DomainError::Range(format!("no book id left after {max}"))
            }),
        }
    }

    /// 書籍を追加する。上限年はローカル時刻の暦年。
    pub fn add_book(&mut self, req: AddBookRequest) -> Result<Book, DomainError> {
        self.add_book_in(req, chrono::Local::now().year())
    }

    /// 書籍を追加する。検証に失敗した場合カタログは変化しない。
    pub fn add_book_in(
        &mut self,
        req: AddBookRequest,
        current_year: i32,
    ) -> Result<Book, DomainError> {
        req.validate(current_year)?;
        let book = Book::new(self.next_id()?, req);
        self.books.push(book.clone());
        Ok(book)
    }

    /// 全書籍を格納順で返す。
    pub fn list_books(&self) -> &[Book] {
        &self.books
    }

    /// 指定フィールドの部分一致検索（大文字小文字を区別しない）
    pub fn search(&self, field: SearchField, query: &str) -> Vec<&Book> {
        let query = query.to_lowercase();
        self.books
            .iter()
            .filter(|b| field.value_of(b).to_lowercase().contains(&query))
            .collect()
    }

    /// ジャンルの完全一致（大文字小文字を区別しない）
    pub fn filter_by_genre(&self, genre: &str) -> Vec<&Book> {
        let genre = genre.to_lowercase();
        self.books
            .iter()
            .filter(|b| b.genre().to_lowercase() == genre)
            .collect()
    }

    /// 貸出: Available → Loaned
    pub fn loan(&mut self, id: BookId) -> Result<&Book, DomainError> {
        let book = self.get_mut(id)?;
        if !book.is_available() {
            return Err(DomainError::AlreadyLoaned(id));
        }
        book.set_available(false);
        Ok(book)
    }

    /// 返却: Loaned → Available
    pub fn return_book(&mut self, id: BookId) -> Result<&Book, DomainError> {
        let book = self.get_mut(id)?;
        if book.is_available() {
            return Err(DomainError::AlreadyAvailable(id));
        }
        book.set_available(true);
        Ok(book)
    }

    /// 書籍を削除する。確認は呼び出し側で済ませ、結果だけを受け取る。
    pub fn delete_book(
        &mut self,
        id: BookId,
        confirmed: bool,
    ) -> Result<DeleteOutcome, DomainError> {
        let index = self
            .books
            .iter()
            .position(|b| b.id() == id)
            .ok_or(DomainError::NotFound(id))?;

        if !confirmed {
            return Ok(DeleteOutcome::Cancelled);
        }

        // Vec::remove は残りの順序を保つ
        Ok(DeleteOutcome::Deleted(self.books.remove(index)))
    }

    /// 統計レポートを作る。
    pub fn report(&self) -> Result<Statistics, DomainError> {
        let first = self.books.first().ok_or(DomainError::NoData)?;

        let total = self.books.len();
        let available = self.books.iter().filter(|b| b.is_available()).count();
        let total_value = self.books.iter().map(Book::price).sum();

        let mut most_expensive = first;
        let mut cheapest = first;
        for book in &self.books[1..] {
            if book.price() > most_expensive.price() {
                most_expensive = book;
            }
            if book.price() < cheapest.price() {
                cheapest = book;
            }
        }

        Ok(Statistics {
            total,
            available,
            loaned: total - available,
            total_value,
            most_expensive: most_expensive.clone(),
            cheapest: cheapest.clone(),
            top_genre: self.top_genre(),
        })
    }

    // --- Private helpers ---

    fn get_mut(&mut self, id: BookId) -> Result<&mut Book, DomainError> {
        self.books
            .iter_mut()
            .find(|b| b.id() == id)
            .ok_or(DomainError::NotFound(id))
    }

    /// 出現順を保ったジャンル別件数から、最初に最大件数へ達したものを選ぶ。
    fn top_genre(&self) -> String {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for book in &self.books {
            match counts.iter_mut().find(|(g, _)| *g == book.genre()) {
                Some((_, n)) => *n += 1,
                None => counts.push((book.genre(), 1)),
            }
        }

        let mut top: Option<(&str, usize)> = None;
        for (genre, n) in counts {
            if top.map_or(true, |(_, best)| n > best) {
                top = Some((genre, n));
            }
        }
        top.map(|(g, _)| g.to_string()).unwrap_or_default()
    }
}
