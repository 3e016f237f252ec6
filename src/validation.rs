//! Field-level acceptance checks applied before a book is written.
//!
//! [`validate`] is pure: the current year is passed in rather than read from
//! the wall clock, so every rule can be exercised directly. Services obtain
//! the year from a [`Clock`].

use crate::domain::{
    Book, DECIMAL_PLACES, PRICE_MAX_DIGITS, SALES_MAX_DIGITS, Shelf, fits_digits,
};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

pub const FUTURE_YEAR_MESSAGE: &str =
    "The first published year must be less than or equal to the current year.";
pub const NEGATIVE_SALES_MESSAGE: &str = "Sales in millions must be greater than or equal to 0.";
pub const NEGATIVE_PRICE_MESSAGE: &str = "Price must be greater than or equal to 0.";
pub const NEGATIVE_COUNT_MESSAGE: &str = "Number of books must be greater than or equal to 0.";
pub const INVALID_SHELF_MESSAGE: &str = "Shelves must be one of A, B, C, D, E, F, G, H.";
pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const SALES_DIGITS_MESSAGE: &str = "Ensure that there are no more than 10 digits in total.";
pub const PRICE_DIGITS_MESSAGE: &str = "Ensure that there are no more than 6 digits in total.";
pub const SALES_DECIMAL_PLACES_MESSAGE: &str =
    "Ensure that there are no more than 2 decimal places.";
pub const PRICE_DECIMAL_PLACES_MESSAGE: &str =
    "Ensure that there are no more than 2 decimal places.";

/// Source of the year that `first_published` is checked against.
pub trait Clock: Send + Sync {
    fn current_year(&self) -> i32;
}

/// Reads the year from the system clock, in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        Utc::now().year()
    }
}

/// Always reports the same year.
#[derive(Debug, Clone, Copy)]
pub struct FixedYear(pub i32);

impl Clock for FixedYear {
    fn current_year(&self) -> i32 {
        self.0
    }
}

/// Fields that carry a rule, used as keys of [`ValidationErrors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    FirstPublished,
    SalesMillions,
    Shelves,
    NumberOfBooks,
    Price,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::FirstPublished => "first_published",
            Field::SalesMillions => "sales_millions",
            Field::Shelves => "shelves",
            Field::NumberOfBooks => "number_of_books",
            Field::Price => "price",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-empty mapping of field to the message explaining why it was rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.errors.insert(field, message.to_owned());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation failed")?;
        for (i, (field, message)) in self.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Candidate field values as submitted for a create or edit.
///
/// Numbers arrive already parsed; `shelves` stays textual so that an unknown
/// shelf is reported like any other rule failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInput {
    pub title: String,
    pub authors: String,
    pub original_language: String,
    pub first_published: i32,
    pub sales_millions: Decimal,
    pub genre: String,
    pub shelves: String,
    pub number_of_books: i64,
    pub price: Decimal,
}

impl From<&Book> for BookInput {
    fn from(book: &Book) -> Self {
        BookInput {
            title: book.title.clone(),
            authors: book.authors.clone(),
            original_language: book.original_language.clone(),
            first_published: book.first_published,
            sales_millions: book.sales_millions,
            genre: book.genre.clone(),
            shelves: book.shelves.as_str().to_owned(),
            number_of_books: book.number_of_books,
            price: book.price,
        }
    }
}

/// Checks `input` against every rule and returns the normalized [`Book`].
///
/// All rules run; a failing input reports every offending field at once.
/// Text is trimmed and decimals are padded to two places; more than two
/// fractional digits is an error, not a rounding. Text length is left to the
/// store, which truncates on write.
pub fn validate(input: &BookInput, current_year: i32) -> Result<Book, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = input.title.trim();
    if title.is_empty() {
        errors.insert(Field::Title, REQUIRED_MESSAGE);
    }

    if input.first_published > current_year {
        errors.insert(Field::FirstPublished, FUTURE_YEAR_MESSAGE);
    }

    check_decimal(
        &mut errors,
        Field::SalesMillions,
        input.sales_millions,
        SALES_MAX_DIGITS,
        [
            NEGATIVE_SALES_MESSAGE,
            SALES_DECIMAL_PLACES_MESSAGE,
            SALES_DIGITS_MESSAGE,
        ],
    );
    check_decimal(
        &mut errors,
        Field::Price,
        input.price,
        PRICE_MAX_DIGITS,
        [
            NEGATIVE_PRICE_MESSAGE,
            PRICE_DECIMAL_PLACES_MESSAGE,
            PRICE_DIGITS_MESSAGE,
        ],
    );

    if input.number_of_books < 0 {
        errors.insert(Field::NumberOfBooks, NEGATIVE_COUNT_MESSAGE);
    }

    let shelves = input.shelves.parse::<Shelf>().ok();
    if shelves.is_none() {
        errors.insert(Field::Shelves, INVALID_SHELF_MESSAGE);
    }

    let shelves = match shelves {
        Some(shelves) if errors.is_empty() => shelves,
        _ => return Err(errors),
    };

    Ok(Book {
        title: title.to_owned(),
        authors: input.authors.trim().to_owned(),
        original_language: input.original_language.trim().to_owned(),
        first_published: input.first_published,
        sales_millions: pad_decimal(input.sales_millions),
        genre: input.genre.trim().to_owned(),
        shelves,
        number_of_books: input.number_of_books,
        price: pad_decimal(input.price),
    })
}

/// Checks sign, then fractional digits, then total width, reporting the
/// first failure. `messages` are in that order.
fn check_decimal(
    errors: &mut ValidationErrors,
    field: Field,
    value: Decimal,
    max_digits: u32,
    messages: [&str; 3],
) {
    let [negative, places, digits] = messages;
    if value < Decimal::ZERO {
        errors.insert(field, negative);
    } else if value.normalize().scale() > DECIMAL_PLACES {
        errors.insert(field, places);
    } else if !fits_digits(value, max_digits) {
        errors.insert(field, digits);
    }
}

/// Sets the scale of an accepted value (at most two significant fractional
/// digits) to exactly two, without changing it.
fn pad_decimal(value: Decimal) -> Decimal {
    let mut value = value;
    if value.is_zero() {
        value.set_sign_positive(true);
    }
    value.rescale(DECIMAL_PLACES);
    value
}
