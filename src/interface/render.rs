//! 表示用テキストの整形。Domainはデータだけを返し、見た目はここで決める。

use crate::domain::model::book::Book;
use crate::domain::model::report::Statistics;

const TITLE_WIDTH: usize = 30;
/// これを超えるタイトルは切り詰めて `..` を付ける
const TITLE_MAX_CHARS: usize = 27;

/// 書籍一覧を固定幅の表にする。
pub fn format_table<'a>(books: impl IntoIterator<Item = &'a Book>) -> String {
    let mut output = format!(
        "{:<5} | {:<width$} | {:<20} | {:<15} | {:<8} | {}\n",
        "ID",
        "Title",
        "Author",
        "Genre",
        "Price",
        "Status",
        width = TITLE_WIDTH
    );
    output.push_str(&"-".repeat(95));
    output.push('\n');

    for book in books {
        let price = format!("{:.2}", book.price());
        output.push_str(&format!(
            "{:<5} | {:<width$} | {:<20} | {:<15} | {:<8} | {}\n",
            book.id(),
            shorten_title(book.title()),
            book.author(),
            book.genre(),
            price,
            status_label(book),
            width = TITLE_WIDTH
        ));
    }
    output
}

/// 統計レポートを複数行のテキストにする。
pub fn format_report(stats: &Statistics) -> String {
    format!(
        "=== Catalog statistics ===\n\
         Total books    : {}\n\
         Available      : {}\n\
         On loan        : {}\n\
         Total value    : {:.2}\n\
         Most expensive : {} ({:.2})\n\
         Cheapest       : {} ({:.2})\n\
         Top genre      : {}\n",
        stats.total,
        stats.available,
        stats.loaned,
        stats.total_value,
        stats.most_expensive.title(),
        stats.most_expensive.price(),
        stats.cheapest.title(),
        stats.cheapest.price(),
        stats.top_genre,
    )
}

/// 1冊分の短い説明（`#3 "Dune" by Herbert`）
pub fn describe(book: &Book) -> String {
    format!("#{} \"{}\" by {}", book.id(), book.title(), book.author())
}

fn status_label(book: &Book) -> &'static str {
    if book.is_available() {
        "Available"
    } else {
        "On loan"
    }
}

fn shorten_title(title: &str) -> String {
    if title.chars().count() > TITLE_MAX_CHARS {
        let head: String = title.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}..")
    } else {
        title.to_string()
    }
}
