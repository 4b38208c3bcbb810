//! Row types for the five kdb.sqlite tables

use crate::types::{BibleId, BookId, BridgeId, ChapterId, ItemId, ItemType};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

/// The Bibles record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BibleRec {
    pub id: BibleId,
    pub name: String,
    /// True once the 66 Books records exist
    pub books_created: bool,
    /// Book number of the current Book, 0 if none chosen yet
    pub current_book: BookId,
}

/// A Books record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookRec {
    pub id: BookId,
    pub bible_id: BibleId,
    /// Three letter USFM book code
    pub code: String,
    pub name: String,
    pub chapters_created: bool,
    pub num_chapters: i64,
    /// Chapters rowid of the current Chapter, 0 if none
    pub current_chapter_id: ChapterId,
    pub current_chapter_num: i64,
}

/// A Chapters record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterRec {
    pub id: ChapterId,
    pub bible_id: BibleId,
    pub book_id: BookId,
    pub number: i64,
    pub items_created: bool,
    pub num_verses: i64,
    pub num_items: i64,
    /// VerseItems rowid of the current item, 0 if none
    pub current_item: ItemId,
    pub current_verse: i64,
}

/// A VerseItems record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseItemRec {
    pub id: ItemId,
    pub chapter_id: ChapterId,
    pub verse: i64,
    pub item_type: ItemType,
    pub order: i64,
    pub text: String,
    /// Sequence number of introductory matter items, 0 otherwise
    pub int_seq: i64,
    pub is_bridge: bool,
    /// Last verse of a bridge headed by this item, 0 if not a bridge
    pub last_verse_bridge: i64,
}

impl VerseItemRec {
    /// New (not yet inserted) item with the standard order for its type
    pub fn new(chapter_id: ChapterId, verse: i64, item_type: ItemType, text: impl Into<String>) -> Self {
        Self {
            id: 0,
            chapter_id,
            verse,
            item_type,
            order: item_type.item_order(verse, 0),
            text: text.into(),
            int_seq: 0,
            is_bridge: false,
            last_verse_bridge: 0,
        }
    }

    /// Set the introductory matter sequence number (and the order derived from it)
    pub fn with_int_seq(mut self, int_seq: i64) -> Self {
        self.int_seq = int_seq;
        self.order = self.item_type.item_order(self.verse, int_seq);
        self
    }

    /// Verse label as shown to users and written to USFM ("3" or "3-5")
    pub fn verse_label(&self) -> String {
        if self.is_bridge {
            format!("{}-{}", self.verse, self.last_verse_bridge)
        } else {
            self.verse.to_string()
        }
    }

    /// Last verse covered by this item
    pub fn last_verse(&self) -> i64 {
        if self.is_bridge {
            self.last_verse_bridge
        } else {
            self.verse
        }
    }
}

/// A BridgeItems record, kept so that a bridge step can be undone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeRec {
    pub id: BridgeId,
    pub item_id: ItemId,
    /// Text of the bridge head before the extra verse was appended
    pub text_curr_bridge: String,
    /// Text of the verse that was appended
    pub text_extra_verse: String,
}

impl ToSql for ItemType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ItemType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}
