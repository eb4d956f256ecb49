use crate::domain::model::book::{AddBookRequest, Book};
use crate::domain::model::catalog::{Catalog, DeleteOutcome};
use crate::domain::model::id::BookId;
use crate::domain::repository::CatalogRepository;

use super::error::AppError;

/// 起動時ロードの結果。壊れた文書は空のカタログで置き換えて続行する。
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// 文書が存在しない
    Missing,
    Loaded { count: usize },
    /// 読み込み・解析に失敗し、空のカタログで開始した
    Recovered { reason: String },
}

/// Catalogに対するユースケース。
/// 起動時に一度だけ load し、以後はメモリ上の Catalog を mutate → save する。
pub struct CatalogService<R: CatalogRepository> {
    repo: R,
    catalog: Catalog,
}

impl<R: CatalogRepository> CatalogService<R> {
    /// リポジトリからカタログを読み込んでServiceを作る。失敗しない。
    /// 復旧したかどうかは `LoadOutcome` で呼び出し側に伝え、報告は呼び出し側が行う。
    pub fn open(repo: R) -> (Self, LoadOutcome) {
        let (catalog, outcome) = match repo.load() {
            Ok(Some(catalog)) => {
                let count = catalog.len();
                (catalog, LoadOutcome::Loaded { count })
            }
            Ok(None) => (Catalog::new(), LoadOutcome::Missing),
            Err(e) => (
                Catalog::new(),
                LoadOutcome::Recovered {
                    reason: e.to_string(),
                },
            ),
        };
        tracing::debug!(?outcome, "catalog opened");

        (Self { repo, catalog }, outcome)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// 書籍を追加して永続化する。
    pub fn add_book(&mut self, req: AddBookRequest) -> Result<Book, AppError> {
        let book = self.catalog.add_book(req)?;
        tracing::info!(id = %book.id(), title = book.title(), "book added");
        self.persist()?;
        Ok(book)
    }

    /// 貸出して永続化する。
    pub fn loan(&mut self, id: BookId) -> Result<Book, AppError> {
        let book = self.catalog.loan(id)?.clone();
        tracing::info!(%id, "book loaned");
        self.persist()?;
        Ok(book)
    }

    /// 返却して永続化する。
    pub fn return_book(&mut self, id: BookId) -> Result<Book, AppError> {
        let book = self.catalog.return_book(id)?.clone();
        tracing::info!(%id, "book returned");
        self.persist()?;
        Ok(book)
    }

    /// 削除して永続化する。キャンセル時は書き込まない。
    pub fn delete_book(
        &mut self,
        id: BookId,
        confirmed: bool,
    ) -> Result<DeleteOutcome, AppError> {
        let outcome = self.catalog.delete_book(id, confirmed)?;
        match outcome {
            DeleteOutcome::Deleted(_) => {
                tracing::info!(%id, "book deleted");
                self.persist()?;
            }
            DeleteOutcome::Cancelled => tracing::debug!(%id, "deletion cancelled"),
        }
        Ok(outcome)
    }

    /// カタログ全体を書き出す（終了時など）。
    pub fn save(&self) -> Result<(), AppError> {
        self.persist()
    }

    // --- private ---

    /// 失敗してもメモリ上の変更は巻き戻さない。
    fn persist(&self) -> Result<(), AppError> {
        self.repo.save(&self.catalog).map_err(|e| {
            tracing::error!("failed to save catalog: {}", e);
            AppError::StorageWrite(Box::new(e))
        })
    }
}
