use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Column limits of the `books` table, in characters.
pub const TITLE_MAX_LEN: usize = 200;
pub const AUTHORS_MAX_LEN: usize = 255;
pub const ORIGINAL_LANGUAGE_MAX_LEN: usize = 50;
pub const GENRE_MAX_LEN: usize = 100;

/// Decimal columns hold two fractional digits within a total digit budget.
pub const DECIMAL_PLACES: u32 = 2;
pub const SALES_MAX_DIGITS: u32 = 10;
pub const PRICE_MAX_DIGITS: u32 = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{field} value {value} does not fit {max_digits} digits with 2 decimal places")]
pub struct DecimalOverflow {
    pub field: &'static str,
    pub value: Decimal,
    pub max_digits: u32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid shelf {0:?}, expected one of A, B, C, D, E, F, G, H")]
pub struct ShelfParseError(pub String);

/// Physical shelf a book is stocked on, `A` through `H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shelf {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Shelf {
    pub const ALL: [Shelf; 8] = [
        Shelf::A,
        Shelf::B,
        Shelf::C,
        Shelf::D,
        Shelf::E,
        Shelf::F,
        Shelf::G,
        Shelf::H,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Shelf::A => "A",
            Shelf::B => "B",
            Shelf::C => "C",
            Shelf::D => "D",
            Shelf::E => "E",
            Shelf::F => "F",
            Shelf::G => "G",
            Shelf::H => "H",
        }
    }
}

impl FromStr for Shelf {
    type Err = ShelfParseError;

    /// Accepts exactly one upper-case letter `A`..=`H`; no trimming, no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shelf::ALL
            .into_iter()
            .find(|shelf| shelf.as_str() == s)
            .ok_or_else(|| ShelfParseError(s.to_owned()))
    }
}

impl fmt::Display for Shelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-assigned identifier of a [`BookRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookId(pub i64);

impl BookId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for BookId {
    fn from(id: i64) -> Self {
        BookId(id)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The writable fields of a stocked title.
///
/// A `Book` is what validation produces and what the store persists; the
/// store hands it back wrapped in a [`BookRecord`] together with its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub authors: String,
    pub original_language: String,
    pub first_published: i32,
    pub sales_millions: Decimal,
    pub genre: String,
    pub shelves: Shelf,
    pub number_of_books: i64,
    pub price: Decimal,
}

impl Book {
    /// Returns a copy whose text fields fit their column limits.
    ///
    /// Cuts on character boundaries, never inside a multi-byte code point.
    pub fn truncated(&self) -> Book {
        Book {
            title: truncate_chars(&self.title, TITLE_MAX_LEN),
            authors: truncate_chars(&self.authors, AUTHORS_MAX_LEN),
            original_language: truncate_chars(&self.original_language, ORIGINAL_LANGUAGE_MAX_LEN),
            genre: truncate_chars(&self.genre, GENRE_MAX_LEN),
            ..self.clone()
        }
    }

    /// Returns a copy with `sales_millions` and `price` rounded (half to even)
    /// to two places and padded to exactly two.
    ///
    /// Fails when a value still has more digits than its column allows.
    pub fn quantized(&self) -> Result<Book, DecimalOverflow> {
        Ok(Book {
            sales_millions: quantize("sales_millions", self.sales_millions, SALES_MAX_DIGITS)?,
            price: quantize("price", self.price, PRICE_MAX_DIGITS)?,
            ..self.clone()
        })
    }
}

/// True when the integer part of `value` leaves room for two fractional
/// digits within `max_digits`.
pub fn fits_digits(value: Decimal, max_digits: u32) -> bool {
    let limit = Decimal::from(10_i64.pow(max_digits - DECIMAL_PLACES));
    value.abs().trunc() < limit
}

/// Rounds `value` to two places and pads it to a scale of exactly two.
pub fn quantize(
    field: &'static str,
    value: Decimal,
    max_digits: u32,
) -> Result<Decimal, DecimalOverflow> {
    let mut rounded =
        value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven);
    if !fits_digits(rounded, max_digits) {
        return Err(DecimalOverflow {
            field,
            value,
            max_digits,
        });
    }
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.rescale(DECIMAL_PLACES);
    Ok(rounded)
}

/// A persisted book row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub id: BookId,
    pub book: Book,
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let book = &self.book;
        write!(
            f,
            "#{} {} by {} ({}, {}) [shelf {}] copies: {} price: {} sales: {}M",
            self.id,
            book.title,
            book.authors,
            book.original_language,
            book.first_published,
            book.shelves,
            book.number_of_books,
            book.price,
            book.sales_millions,
        )
    }
}

fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((byte_idx, _)) => value[..byte_idx].to_owned(),
        None => value.to_owned(),
    }
}
