//! Core types and constants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a Bible record (always 1 for now)
pub type BibleId = i64;

/// Bible Societies book number: 1 to 39 Old Testament, 41 to 67 New Testament
pub type BookId = i64;

/// SQLite rowid of a Chapters record
pub type ChapterId = i64;

/// SQLite rowid of a VerseItems record
pub type ItemId = i64;

/// SQLite rowid of a BridgeItems record
pub type BridgeId = i64;

/// The only Bible KIT keyboards
pub const BIBLE_ID: BibleId = 1;

/// Book number of Psalms, whose chapters may carry ascriptions
pub const PSALMS_BOOK_ID: BookId = 19;

/// Offset of a book in the list of 66 books (book number 40 is not used)
pub fn book_offset(book_id: BookId) -> usize {
    if book_id > 39 {
        (book_id - 2) as usize
    } else {
        (book_id - 1).max(0) as usize
    }
}

/// Kind of VerseItem, stored in the itemType column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// Verse text (possibly the head of a verse bridge)
    Verse,
    /// Continuation of a verse after a paragraph break inside it
    VerseCont,
    /// Paragraph break before a verse
    Para,
    /// Paragraph break inside a verse
    ParaCont,
    /// Subject heading
    Heading,
    /// Parallel reference
    ParlRef,
    /// Book title
    Title,
    /// Title in introductory matter
    InTitle,
    /// Subject heading in introductory matter
    InSubj,
    /// Paragraph in introductory matter
    InPara,
    /// Psalm ascription
    Ascription,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Verse => "Verse",
            ItemType::VerseCont => "VerseCont",
            ItemType::Para => "Para",
            ItemType::ParaCont => "ParaCont",
            ItemType::Heading => "Heading",
            ItemType::ParlRef => "ParlRef",
            ItemType::Title => "Title",
            ItemType::InTitle => "InTitle",
            ItemType::InSubj => "InSubj",
            ItemType::InPara => "InPara",
            ItemType::Ascription => "Ascription",
        }
    }

    /// Sort key of an item of this type attached to verse `verse`
    ///
    /// Introductory matter items are ordered by their sequence number.
    pub fn item_order(self, verse: i64, int_seq: i64) -> i64 {
        match self {
            ItemType::InTitle => 10,
            ItemType::InSubj | ItemType::InPara => 10 + int_seq,
            ItemType::Title => 70,
            ItemType::Ascription => 75,
            ItemType::Heading => verse * 100 - 20,
            ItemType::ParlRef => verse * 100 - 15,
            ItemType::Para => verse * 100 - 10,
            ItemType::Verse => verse * 100,
            ItemType::ParaCont => verse * 100 + 10,
            ItemType::VerseCont => verse * 100 + 20,
        }
    }

    /// True for items that hold keyboarded text
    pub fn has_text(self) -> bool {
        !matches!(self, ItemType::Para | ItemType::ParaCont)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Verse" => Ok(ItemType::Verse),
            "VerseCont" => Ok(ItemType::VerseCont),
            "Para" => Ok(ItemType::Para),
            "ParaCont" => Ok(ItemType::ParaCont),
            "Heading" => Ok(ItemType::Heading),
            "ParlRef" => Ok(ItemType::ParlRef),
            "Title" => Ok(ItemType::Title),
            "InTitle" => Ok(ItemType::InTitle),
            "InSubj" => Ok(ItemType::InSubj),
            "InPara" => Ok(ItemType::InPara),
            "Ascription" => Ok(ItemType::Ascription),
            other => Err(format!("unknown item type '{}'", other)),
        }
    }
}
