use super::model::catalog::Catalog;

/// 永続化の抽象。Infra層が実装する。
///
/// `load` は文書が無ければ `Ok(None)` を返す。壊れた文書からの復旧は
/// Application層（`CatalogService::open`）の責務。
pub trait CatalogRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self) -> Result<Option<Catalog>, Self::Error>;
    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error>;
}
