//! Suffix table for substring search over book titles and authors.
//!
//! Every suffix of a field is stored alongside the book id. A pattern occurs
//! in the text exactly when it is a prefix of one of the text's suffixes, so
//! "title contains P" becomes `title_suffix LIKE 'P%'`, which a btree index
//! with `text_pattern_ops` answers as a range scan.
//!
//! Indexing a field of n characters writes n rows holding O(n²) characters in
//! total, so rows are always inserted in bulk.

use crate::models::Book;

/// Indexed text field; each has its own suffix table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixField {
    Title,
    Author,
}

impl SuffixField {
    pub fn table(self) -> &'static str {
        match self {
            SuffixField::Title => "book_title_suffix",
            SuffixField::Author => "book_author_suffix",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SuffixField::Title => "title_suffix",
            SuffixField::Author => "author_suffix",
        }
    }

    fn source(self, book: &Book) -> &str {
        match self {
            SuffixField::Title => &book.title,
            SuffixField::Author => &book.author,
        }
    }
}

/// A (book, suffix) row borrowed from the owning book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixRow<'a> {
    pub book_id: &'a str,
    pub suffix: &'a str,
}

/// All suffixes of `text`, longest first, split on code-point boundaries.
///
/// A text of n characters yields exactly n suffixes; the empty string yields none.
pub fn suffixes(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.char_indices().map(move |(offset, _)| &text[offset..])
}

/// Suffix rows of one field for a batch of books
pub fn suffix_rows(books: &[Book], field: SuffixField) -> Vec<SuffixRow<'_>> {
    let capacity = books.iter().map(|b| field.source(b).chars().count()).sum();
    let mut rows = Vec::with_capacity(capacity);
    for book in books {
        rows.extend(suffixes(field.source(book)).map(|suffix| SuffixRow {
            book_id: &book.id,
            suffix,
        }));
    }
    rows
}

/// `LIKE` pattern matching values that start with `prefix` literally.
///
/// Postgres uses `\` as the default LIKE escape character.
pub fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
