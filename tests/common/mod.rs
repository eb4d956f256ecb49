//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use catalog_mcp::application::service::CatalogService;
use catalog_mcp::domain::model::book::AddBookRequest;
use catalog_mcp::domain::model::catalog::Catalog;
use catalog_mcp::domain::model::id::BookId;
use catalog_mcp::domain::repository::CatalogRepository;

/// テスト中の「現在の年」
pub const THIS_YEAR: i32 = 2026;

// =============================================================================
// InMemoryRepo — テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("in-memory store error: {0}")]
pub struct InMemoryError(pub String);

/// ファイルI/O不要のインメモリリポジトリ。JSON文書をそのまま保持する。
/// `fail_saves` で書き込み失敗を、壊れた文書で読み込み失敗を再現できる。
pub struct InMemoryRepo {
    document: RefCell<Option<String>>,
    fail_saves: Cell<bool>,
    pub saves: Cell<usize>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            document: RefCell::new(None),
            fail_saves: Cell::new(false),
            saves: Cell::new(0),
        }
    }

    pub fn with_document(json: &str) -> Self {
        let repo = Self::new();
        *repo.document.borrow_mut() = Some(json.to_string());
        repo
    }

    pub fn with_catalog(catalog: &Catalog) -> Self {
        Self::with_document(&serde_json::to_string(catalog).unwrap())
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    pub fn document(&self) -> Option<String> {
        self.document.borrow().clone()
    }
}

impl CatalogRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Option<Catalog>, Self::Error> {
        match self.document.borrow().as_deref() {
            Some(json) => serde_json::from_str(json)
                .map(Some)
                .map_err(|e| InMemoryError(e.to_string())),
            None => Ok(None),
        }
    }

    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error> {
        if self.fail_saves.get() {
            return Err(InMemoryError("disk full".into()));
        }
        let json = serde_json::to_string(catalog).unwrap();
        *self.document.borrow_mut() = Some(json);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

// =============================================================================
// TestCatalog — 構造化済みテスト用Catalog作成ヘルパー
// =============================================================================

pub fn request(title: &str, author: &str, genre: &str, year: i32, price: f64) -> AddBookRequest {
    AddBookRequest {
        title: title.into(),
        author: author.into(),
        genre: genre.into(),
        year,
        price,
    }
}

pub struct TestCatalog;

impl TestCatalog {
    /// 標準的なテスト用Catalog:
    /// ```text
    /// 1. Dune                    Herbert   Science-Fiction  1965  12.50
    /// 2. Foundation              Asimov    Science-Fiction  1951   9.90
    /// 3. Hamlet                  Shakespeare Drama          1603   5.00
    /// 4. The Name of the Rose    Eco       Fiction          1980  15.00  (on loan)
    /// ```
    pub fn standard() -> Catalog {
        let mut catalog = Catalog::new();
        for req in [
            request("Dune", "Herbert", "Science-Fiction", 1965, 12.5),
            request("Foundation", "Asimov", "Science-Fiction", 1951, 9.9),
            request("Hamlet", "Shakespeare", "Drama", 1603, 5.0),
            request("The Name of the Rose", "Eco", "Fiction", 1980, 15.0),
        ] {
            catalog.add_book_in(req, THIS_YEAR).unwrap();
        }
        catalog.loan(BookId::new(4)).unwrap();
        catalog
    }

    /// InMemoryRepoにCatalogを保存してCatalogServiceを返す。
    pub fn service_with(catalog: &Catalog) -> CatalogService<InMemoryRepo> {
        let (svc, _) = CatalogService::open(InMemoryRepo::with_catalog(catalog));
        svc
    }
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
