use serde::{Deserialize, Serialize};
use std::fmt;

/// カタログ内で一意な書籍ID。利用者ではなくCatalogが採番する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(u32);

impl BookId {
    pub const FIRST: BookId = BookId(1);

    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// 次のID（max + 1）。u32 の上限では None。
    pub fn checked_next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 幅指定（表の桁揃え）をそのまま効かせる
        fmt::Display::fmt(&self.0, f)
    }
}
