//! # KeyIt
//!
//! Data model for keyboarding a Bible translation one chapter at a time.
//!
//! A Bible holds 66 books, each book its chapters, and each chapter an
//! ordered list of VerseItems: verses plus the publication items that
//! surround them (paragraph breaks, headings, titles, introductory matter,
//! Psalm ascriptions). Everything is kept in one SQLite database,
//! kdb.sqlite, and records are created lazily the first time the Bible,
//! a book or a chapter is used.
//!
//! ## Example
//!
//! ```rust,no_run
//! use keyit::prelude::*;
//!
//! # fn main() -> keyit::Result<()> {
//! let kdb = Kdb::open_in_memory()?;
//! let spec = BooksSpec::embedded()?;
//! let mut bible = Bible::open(&kdb, &spec)?;
//!
//! bible.setup_current_book(&kdb, &spec, 41)?;
//! bible.setup_current_chapter(&kdb, 0)?;
//!
//! let book = bible.current_book_mut()?;
//! book.save_item_text(&kdb, 0, "The beginning of the gospel")?;
//! book.apply_action(&kdb, MenuAction::CreateParaBefore, None)?;
//!
//! let usfm = bible.export_current_chapter(&kdb)?;
//! println!("{}", usfm);
//! # Ok(())
//! # }
//! ```

pub mod asset_names;
pub mod bible;
pub mod book;
pub mod books;
pub mod chapter;
pub mod error;
pub mod menu;
pub mod store;
pub mod types;
pub mod usfm;

pub use error::{KitError, Result};

pub mod prelude {
    //! Commonly used types
    pub use crate::asset_names::ImageAsset;
    pub use crate::bible::Bible;
    pub use crate::book::Book;
    pub use crate::books::{BookSpec, BooksSpec};
    pub use crate::chapter::Chapter;
    pub use crate::error::{ErrorCode, KitError, Result};
    pub use crate::menu::{MenuAction, MenuIcon, MenuItem, VIMenu};
    pub use crate::store::{Kdb, VerseItemRec};
    pub use crate::types::*;
}
