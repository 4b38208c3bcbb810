//! Book specification tables
//!
//! Two text tables describe the 66 books. `KIT_BooksSpec.txt` has one line
//! per book: `bookID, CODE, n1, n2, ...` where each `n` is the number of
//! verses in a chapter, prefixed with `A` for a Psalm with an ascription.
//! `KIT_BooksNames.txt` has `bookID, Name` lines. Blank lines and lines
//! starting with `#` are ignored.

use crate::error::{KitError, Result};
use crate::types::BookId;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const EMBEDDED_SPEC: &str = include_str!("../data/KIT_BooksSpec.txt");
const EMBEDDED_NAMES: &str = include_str!("../data/KIT_BooksNames.txt");

/// One chapter of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterSpec {
    pub verses: i64,
    /// Psalm ascription before verse 1
    pub ascription: bool,
}

impl ChapterSpec {
    /// Number of VerseItems created for the chapter initially
    pub fn initial_items(&self) -> i64 {
        self.verses + i64::from(self.ascription)
    }
}

/// One book of the Bible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSpec {
    pub id: BookId,
    pub code: String,
    pub name: String,
    pub chapters: Vec<ChapterSpec>,
}

/// All books, in ascending book number
#[derive(Debug, Clone)]
pub struct BooksSpec {
    books: Vec<BookSpec>,
}

impl BooksSpec {
    /// The tables compiled into the crate
    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED_SPEC, EMBEDDED_NAMES)
    }

    /// Load replacement tables from disk
    pub fn from_files(spec_path: &Path, names_path: &Path) -> Result<Self> {
        let spec = fs::read_to_string(spec_path)?;
        let names = fs::read_to_string(names_path)?;
        Self::parse(&spec, &names)
    }

    pub fn parse(spec: &str, names: &str) -> Result<Self> {
        let names = parse_names(names)?;

        let mut books = Vec::new();
        for (line_no, line) in content_lines(spec) {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() < 3 {
                return Err(KitError::BookSpec(format!(
                    "line {}: expected book number, code and verse counts",
                    line_no
                )));
            }

            let id = parse_book_id(fields[0], line_no)?;
            let code = fields[1].to_string();
            let chapters = fields[2..]
                .iter()
                .map(|f| parse_chapter(f, line_no))
                .collect::<Result<Vec<_>>>()?;
            let name = names.get(&id).cloned().ok_or_else(|| {
                KitError::BookSpec(format!("no name for book {} ({})", id, code))
            })?;

            books.push(BookSpec { id, code, name, chapters });
        }

        if books.is_empty() {
            return Err(KitError::BookSpec("no books specified".to_string()));
        }
        books.sort_by_key(|b| b.id);
        Ok(Self { books })
    }

    pub fn get(&self, book_id: BookId) -> Option<&BookSpec> {
        self.books.iter().find(|b| b.id == book_id)
    }

    /// Find a book by its USFM code, ignoring case
    pub fn by_code(&self, code: &str) -> Option<&BookSpec> {
        self.books.iter().find(|b| b.code.eq_ignore_ascii_case(code))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BookSpec> {
        self.books.iter()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
}

fn parse_book_id(field: &str, line_no: usize) -> Result<BookId> {
    field
        .parse()
        .map_err(|_| KitError::BookSpec(format!("line {}: bad book number '{}'", line_no, field)))
}

fn parse_chapter(field: &str, line_no: usize) -> Result<ChapterSpec> {
    let (ascription, count) = match field.strip_prefix('A') {
        Some(rest) => (true, rest),
        None => (false, field),
    };
    let verses: i64 = count
        .parse()
        .map_err(|_| KitError::BookSpec(format!("line {}: bad verse count '{}'", line_no, field)))?;
    if verses < 1 {
        return Err(KitError::BookSpec(format!(
            "line {}: chapter with no verses",
            line_no
        )));
    }
    Ok(ChapterSpec { verses, ascription })
}

fn parse_names(text: &str) -> Result<HashMap<BookId, String>> {
    let mut names = HashMap::new();
    for (line_no, line) in content_lines(text) {
        let (id, name) = line.split_once(", ").ok_or_else(|| {
            KitError::BookSpec(format!("names line {}: expected 'bookID, Name'", line_no))
        })?;
        names.insert(parse_book_id(id.trim(), line_no)?, name.trim().to_string());
    }
    Ok(names)
}
