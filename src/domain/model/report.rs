use serde::Serialize;

use super::book::Book;

/// カタログ全体の統計。空のカタログからは作られない。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub available: usize,
    pub loaned: usize,
    pub total_value: f64,
    /// 最高価格の1冊（同額なら格納順で先のもの）
    pub most_expensive: Book,
    /// 最低価格の1冊（同額なら格納順で先のもの）
    pub cheapest: Book,
    /// 最頻ジャンル（同数なら先に出現したもの）
    pub top_genre: String,
}
