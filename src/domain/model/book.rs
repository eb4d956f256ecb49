use serde::{Deserialize, Serialize};

use super::id::BookId;
use crate::domain::error::DomainError;

/// 出版年の下限。上限は現在の暦年。
pub const MIN_PUBLICATION_YEAR: i32 = 1000;

/// 書籍追加リクエスト（採番前・検証前）
#[derive(Debug, Clone, PartialEq)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
    pub price: f64,
}

impl AddBookRequest {
    /// 入力テキストからリクエストを組み立てる。
    /// 空のテキスト項目、数値として読めない年・価格は `Validation`。
    /// 範囲チェックは `validate` で行う。
    pub fn parse(
        title: &str,
        author: &str,
        genre: &str,
        year: &str,
        price: &str,
    ) -> Result<Self, DomainError> {
        check_required(title, author, genre)?;

        let year = year.trim().parse::<i32>().map_err(|_| {
            DomainError::Validation(format!("publication year must be an integer, got '{year}'"))
        })?;
        let price = price.trim().parse::<f64>().map_err(|_| {
            DomainError::Validation(format!("price must be a number, got '{price}'"))
        })?;

        Ok(Self {
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            year,
            price,
        })
    }

    /// 必須項目と値域を検証する。
    pub fn validate(&self, current_year: i32) -> Result<(), DomainError> {
        check_required(&self.title, &self.author, &self.genre)?;

        if !self.price.is_finite() {
            return Err(DomainError::Validation(format!(
                "price must be a finite number, got {}",
                self.price
            )));
        }
        if !(MIN_PUBLICATION_YEAR..=current_year).contains(&self.year) {
            return Err(DomainError::Range(format!(
                "publication year must be between {MIN_PUBLICATION_YEAR} and {current_year}, got {}",
                self.year
            )));
        }
        if self.price <= 0.0 {
            return Err(DomainError::Range(format!(
                "price must be strictly positive, got {}",
                self.price
            )));
        }
        Ok(())
    }
}

fn check_required(title: &str, author: &str, genre: &str) -> Result<(), DomainError> {
    for (name, value) in [("title", title), ("author", author), ("genre", genre)] {
        if value.trim().is_empty() {
            return Err(DomainError::Validation(format!("{name} must not be empty")));
        }
    }
    Ok(())
}

/// カタログ上の1冊。Catalogが所有し、Catalogを通じて操作する。
///
/// 旧フォーマット（フランス語キー）の文書もそのまま読み込める。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    #[serde(alias = "titre")]
    title: String,
    #[serde(alias = "auteur")]
    author: String,
    genre: String,
    #[serde(alias = "année_publication")]
    publication_year: i32,
    #[serde(alias = "prix")]
    price: f64,
    #[serde(alias = "disponible", default = "available_by_default")]
    available: bool,
}

fn available_by_default() -> bool {
    true
}

impl Book {
    /// 検証済みリクエストから生成する。貸出状態は常に「貸出可」で始まる。
    pub(crate) fn new(id: BookId, req: AddBookRequest) -> Self {
        Self {
            id,
            title: req.title,
            author: req.author,
            genre: req.genre,
            publication_year: req.year,
            price: req.price,
            available: true,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn publication_year(&self) -> i32 {
        self.publication_year
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    // --- 内部操作（Catalog経由でのみ呼ばれる） ---

    pub(crate) fn set_available(&mut self, available: bool) {
        self.available = available;
    }
}
