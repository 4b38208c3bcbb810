//! The Bible being keyboarded and its list of books
//!
//! There is one [`Bible`] per kdb.sqlite. Opening it for the first time
//! creates the Books records from the [`BooksSpec`]; after that the list of
//! books is read back from the database. Selecting a book instantiates a
//! [`Book`], which in turn restores its recorded current chapter.

use crate::book::Book;
use crate::books::BooksSpec;
use crate::error::{coded, ErrorCode, KitError, Result};
use crate::store::{BibleRec, BookRec, Kdb};
use crate::types::{book_offset, BookId};

#[derive(Debug, Clone)]
pub struct Bible {
    rec: BibleRec,
    books: Vec<BookRec>,
    current: Option<Book>,
}

impl Bible {
    /// Open the Bible, creating the Books records on first launch
    pub fn open(kdb: &Kdb, spec: &BooksSpec) -> Result<Self> {
        let rec = kdb
            .bible_get_rec()
            .map_err(coded(ErrorCode::ReadBibleRec))?
            .ok_or_else(|| KitError::NotFound("Bibles record".to_string()))?;

        let mut bible = Self {
            rec,
            books: Vec::new(),
            current: None,
        };
        if !bible.rec.books_created {
            bible.create_books(kdb, spec)?;
        }
        bible.books = kdb
            .read_books_recs()
            .map_err(coded(ErrorCode::ReadBookRecs))?;
        Ok(bible)
    }

    fn create_books(&mut self, kdb: &Kdb, spec: &BooksSpec) -> Result<()> {
        let bible_id = self.rec.id;
        kdb.in_transaction(|db| {
            for book in spec.iter() {
                let rec = BookRec {
                    id: book.id,
                    bible_id,
                    code: book.code.clone(),
                    name: book.name.clone(),
                    chapters_created: false,
                    num_chapters: book.chapters.len() as i64,
                    current_chapter_id: 0,
                    current_chapter_num: 0,
                };
                db.books_insert_rec(&rec)
                    .map_err(coded(ErrorCode::CreateBookRec))?;
            }
            db.bible_update_recs_created()
                .map_err(coded(ErrorCode::UpdateBibleRecsCreated))
        })?;

        self.rec.books_created = true;
        log::info!("Created {} Books records for {}", spec.len(), self.rec.name);
        Ok(())
    }

    /// Change the name of the Bible
    pub fn rename(&mut self, kdb: &Kdb, name: &str) -> Result<()> {
        kdb.bible_update_name(name)
            .map_err(coded(ErrorCode::UpdateBibleName))?;
        self.rec.name = name.to_string();
        Ok(())
    }

    /// Instantiate the recorded current Book (and its current chapter), if any
    pub fn go_current_book(&mut self, kdb: &Kdb, spec: &BooksSpec) -> Result<Option<&Book>> {
        if self.rec.current_book == 0 {
            return Ok(None);
        }
        self.setup_current_book(kdb, spec, self.rec.current_book)?;
        Ok(self.current.as_ref())
    }

    /// Make `book_id` the current Book
    pub fn setup_current_book(&mut self, kdb: &Kdb, spec: &BooksSpec, book_id: BookId) -> Result<()> {
        if self.current.as_ref().is_some_and(|b| b.id() == book_id) {
            return Ok(());
        }
        let offset = self
            .offset_of(book_id)
            .ok_or_else(|| KitError::NotFound(format!("book {}", book_id)))?;

        let mut book = Book::open(kdb, spec, self.books[offset].clone())?;
        book.go_current_chapter(kdb)?;

        kdb.bible_update_curr_book(book_id)
            .map_err(coded(ErrorCode::UpdateBibleCurrBook))?;
        self.rec.current_book = book_id;
        self.books[offset] = book.rec().clone();
        log::debug!("Current book is {}", book.name());
        self.current = Some(book);
        Ok(())
    }

    /// Make a chapter of the current Book current
    pub fn setup_current_chapter(&mut self, kdb: &Kdb, offset: usize) -> Result<()> {
        self.current_book_mut()?.setup_current_chapter(kdb, offset)?;
        self.sync_current_book();
        Ok(())
    }

    fn sync_current_book(&mut self) {
        if let Some(book) = &self.current {
            if let Some(offset) = self.offset_of(book.id()) {
                self.books[offset] = book.rec().clone();
            }
        }
    }

    /// Offset of a book in the book list; book number 40 is not used
    fn offset_of(&self, book_id: BookId) -> Option<usize> {
        let guess = book_offset(book_id);
        match self.books.get(guess) {
            Some(b) if b.id == book_id => Some(guess),
            _ => self.books.iter().position(|b| b.id == book_id),
        }
    }

    /// Look a book up by number or by (case-insensitive) USFM code
    pub fn find_book(&self, key: &str) -> Option<&BookRec> {
        match key.parse::<BookId>() {
            Ok(id) => self.offset_of(id).map(|i| &self.books[i]),
            Err(_) => self.books.iter().find(|b| b.code.eq_ignore_ascii_case(key)),
        }
    }

    /// Generate the USFM of the current chapter and store it
    pub fn export_current_chapter(&self, kdb: &Kdb) -> Result<String> {
        let book = self.current_book()?;
        book.current_chapter()?
            .export_usfm(kdb, book.code(), &self.rec.name)
    }

    pub fn current_book(&self) -> Result<&Book> {
        self.current.as_ref().ok_or(KitError::NoCurrentBook)
    }

    pub fn current_book_mut(&mut self) -> Result<&mut Book> {
        self.current.as_mut().ok_or(KitError::NoCurrentBook)
    }

    pub fn books(&self) -> &[BookRec] {
        &self.books
    }

    pub fn name(&self) -> &str {
        &self.rec.name
    }

    pub fn rec(&self) -> &BibleRec {
        &self.rec
    }
}
