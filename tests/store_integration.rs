use bookstore_core::domain::{Book, BookId, Shelf, TITLE_MAX_LEN};
use bookstore_core::error::BookstoreError;
use bookstore_core::store::BookStore;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use tempfile::TempDir;

/// Helper: an on-disk store in a fresh temp dir; keep the `TempDir` alive
async fn temp_store() -> Result<(TempDir, BookStore), BookstoreError> {
    let tmpdir = TempDir::new()?;
    let store = BookStore::open(&tmpdir.path().join("books.db")).await?;
    Ok((tmpdir, store))
}

fn book(title: &str, authors: &str, shelf: Shelf, copies: i64) -> Book {
    Book {
        title: title.into(),
        authors: authors.into(),
        original_language: "English".into(),
        first_published: 1965,
        sales_millions: Decimal::new(2000, 2),
        genre: "Science fiction".into(),
        shelves: shelf,
        number_of_books: copies,
        price: Decimal::new(1499, 2),
    }
}

#[tokio::test]
async fn create_then_get_returns_equal_record() -> Result<(), BookstoreError> {
    let (_tmpdir, store) = temp_store().await?;

    let dune = book("Dune", "Frank Herbert", Shelf::A, 3);
    let id = store.create(&dune).await?;

    let fetched = store.get(id).await?;
    assert_eq!(fetched.id, id);
    assert_eq!(fetched.book, dune);
    assert_eq!(fetched.book.price.to_string(), "14.99");

    Ok(())
}

#[tokio::test]
async fn ids_are_unique() -> Result<(), BookstoreError> {
    let (_tmpdir, store) = temp_store().await?;

    let first = store.create(&book("Dune", "Frank Herbert", Shelf::A, 1)).await?;
    let second = store.create(&book("Dune", "Frank Herbert", Shelf::A, 1)).await?;
    assert_ne!(first, second);
    assert_eq!(store.count().await?, 2);

    Ok(())
}

#[tokio::test]
async fn get_unknown_id_is_not_found() -> Result<(), BookstoreError> {
    let (_tmpdir, store) = temp_store().await?;

    let result = store.get(BookId(42)).await;
    assert!(matches!(result, Err(BookstoreError::NotFound(BookId(42)))));

    Ok(())
}

#[tokio::test]
async fn update_replaces_every_field() -> Result<(), BookstoreError> {
    let (_tmpdir, store) = temp_store().await?;

    let id = store.create(&book("Dune", "Frank Herbert", Shelf::A, 3)).await?;
    let replacement = Book {
        original_language: "French".into(),
        first_published: 1943,
        price: Decimal::new(899, 2),
        ..book("Le Petit Prince", "Antoine de Saint-Exupéry", Shelf::C, 7)
    };

    let updated = store.update(id, &replacement).await?;
    assert_eq!(updated.book, replacement);

    let fetched = store.get(id).await?;
    assert_eq!(fetched.book, replacement);
    assert_ne!(fetched.book.title, "Dune");

    Ok(())
}

#[tokio::test]
async fn update_unknown_id_is_not_found() -> Result<(), BookstoreError> {
    let (_tmpdir, store) = temp_store().await?;

    let result = store.update(BookId(7), &book("Dune", "Frank Herbert", Shelf::A, 1)).await;
    assert!(matches!(result, Err(BookstoreError::NotFound(BookId(7)))));
    assert_eq!(store.count().await?, 0);

    Ok(())
}

#[tokio::test]
async fn delete_then_get_is_not_found() -> Result<(), BookstoreError> {
    let (_tmpdir, store) = temp_store().await?;

    let id = store.create(&book("Dune", "Frank Herbert", Shelf::A, 3)).await?;
    store.delete(id).await?;

    assert!(matches!(store.get(id).await, Err(BookstoreError::NotFound(_))));
    assert!(matches!(store.delete(id).await, Err(BookstoreError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn list_all_returns_books_in_id_order() -> Result<(), BookstoreError> {
    let (_tmpdir, store) = temp_store().await?;

    assert!(store.list_all().await?.is_empty());

    let a = store.create(&book("Dune", "Frank Herbert", Shelf::A, 3)).await?;
    let b = store.create(&book("Hobbit", "J.R.R. Tolkien", Shelf::B, 1)).await?;

    let ids: Vec<_> = store.list_all().await?.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![a, b]);

    Ok(())
}

#[tokio::test]
async fn overlong_text_is_truncated_on_write() -> Result<(), BookstoreError> {
    let (_tmpdir, store) = temp_store().await?;

    let long_title = "é".repeat(TITLE_MAX_LEN + 20);
    let id = store.create(&book(&long_title, "Anon", Shelf::D, 1)).await?;

    let fetched = store.get(id).await?;
    assert_eq!(fetched.book.title.chars().count(), TITLE_MAX_LEN);

    Ok(())
}

#[tokio::test]
async fn reopening_keeps_data() -> Result<(), BookstoreError> {
    let tmpdir = TempDir::new()?;
    let db_path = tmpdir.path().join("books.db");

    let id = {
        let store = BookStore::open(&db_path).await?;
        store.create(&book("Dune", "Frank Herbert", Shelf::A, 3)).await?
    };

    let store = BookStore::open(&db_path).await?;
    assert_eq!(store.get(id).await?.book.title, "Dune");

    Ok(())
}

#[tokio::test]
async fn in_memory_store_round_trips() -> Result<(), BookstoreError> {
    let store = BookStore::in_memory().await?;

    let id = store.create(&book("Dune", "Frank Herbert", Shelf::A, 3)).await?;
    assert_eq!(store.get(id).await?.book.number_of_books, 3);

    Ok(())
}

#[tokio::test]
async fn writes_quantize_decimals() -> Result<(), BookstoreError> {
    let (_tmpdir, store) = temp_store().await?;

    let unrounded = Book {
        price: Decimal::new(12345, 3), // 12.345
        sales_millions: Decimal::new(20, 0), // 20
        ..book("Dune", "Frank Herbert", Shelf::A, 3)
    };
    let id = store.create(&unrounded).await?;

    let fetched = store.get(id).await?;
    assert_eq!(fetched.book.price.to_string(), "12.34");
    assert_eq!(fetched.book.sales_millions.to_string(), "20.00");

    Ok(())
}

#[tokio::test]
async fn decimal_wider_than_its_column_is_refused() -> Result<(), BookstoreError> {
    let (_tmpdir, store) = temp_store().await?;

    let too_wide = Book {
        price: Decimal::new(12345678999, 2), // 123456789.99
        ..book("Dune", "Frank Herbert", Shelf::A, 3)
    };
    let result = store.create(&too_wide).await;
    match result {
        Err(BookstoreError::DecimalOverflow(overflow)) => assert_eq!(overflow.field, "price"),
        other => panic!("expected overflow, got {other:?}"),
    }
    assert_eq!(store.count().await?, 0);

    let id = store.create(&book("Dune", "Frank Herbert", Shelf::A, 3)).await?;
    assert!(matches!(
        store.update(id, &too_wide).await,
        Err(BookstoreError::DecimalOverflow(_))
    ));

    Ok(())
}

#[tokio::test]
async fn open_accepts_paths_with_url_characters() -> Result<(), BookstoreError> {
    let tmpdir = TempDir::new()?;
    let db_path = tmpdir.path().join("shop?#1.db");

    let store = BookStore::open(&db_path).await?;
    let id = store.create(&book("Dune", "Frank Herbert", Shelf::A, 3)).await?;

    assert!(db_path.exists());
    assert_eq!(store.get(id).await?.book.title, "Dune");

    Ok(())
}

#[tokio::test]
async fn corrupt_shelf_reports_the_row_id() -> Result<(), BookstoreError> {
    let tmpdir = TempDir::new()?;
    let db_path = tmpdir.path().join("books.db");

    let store = BookStore::open(&db_path).await?;
    store.create(&book("Dune", "Frank Herbert", Shelf::A, 3)).await?;
    let id = store.create(&book("Emma", "Jane Austen", Shelf::B, 1)).await?;

    let raw = SqlitePool::connect_with(SqliteConnectOptions::new().filename(&db_path)).await?;
    sqlx::query("UPDATE books SET shelves = 'Z' WHERE id = ?")
        .bind(id.get())
        .execute(&raw)
        .await?;

    let query = bookstore_core::search::Query::new(&store);
    match query.distinct_shelves().await {
        Err(BookstoreError::CorruptRecord { id: reported, .. }) => assert_eq!(reported, id.get()),
        other => panic!("expected corrupt record, got {other:?}"),
    }

    Ok(())
}
