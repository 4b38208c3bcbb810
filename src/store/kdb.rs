//! KIT Data Access Object over SQLite
//!
//! One connection is opened when the program starts and kept until it
//! exits. Parameters and results use the crate's own types; conversion to
//! and from SQLite column types happens here.

use super::records::{BibleRec, BookRec, BridgeRec, ChapterRec, VerseItemRec};
use super::{StoreError, StoreOp, StoreResult};
use crate::error::{ErrorCode, KitError, Result};
use crate::types::{BibleId, BookId, BridgeId, ChapterId, ItemId, BIBLE_ID};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::path::Path;

fn op_err(op: StoreOp) -> impl Fn(rusqlite::Error) -> StoreError {
    move |e| StoreError::new(op, e)
}

const CREATE_TABLES: [(&str, ErrorCode); 5] = [
    (
        "CREATE TABLE IF NOT EXISTS Bibles(bibleID INTEGER PRIMARY KEY, name TEXT, bookRecsCreated INTEGER, currBook INTEGER)",
        ErrorCode::CreateBiblesTable,
    ),
    (
        "CREATE TABLE IF NOT EXISTS Books(bookID INTEGER, bibleID INTEGER, bookCode TEXT, bookName TEXT, chapRecsCreated INTEGER, numChaps INTEGER, currChID INTEGER, currChNum INTEGER, USFMText TEXT)",
        ErrorCode::CreateBooksTable,
    ),
    (
        "CREATE TABLE IF NOT EXISTS Chapters(chapterID INTEGER PRIMARY KEY, bibleID INTEGER, bookID INTEGER, chapterNumber INTEGER, itemRecsCreated INTEGER, numVerses INTEGER, numItems INTEGER, currItem INTEGER, currVsNum INTEGER, USFMText TEXT)",
        ErrorCode::CreateChaptersTable,
    ),
    (
        "CREATE TABLE IF NOT EXISTS VerseItems(itemID INTEGER PRIMARY KEY, chapterID INTEGER, verseNumber INTEGER, itemType TEXT, itemOrder INTEGER, itemText TEXT, intSeq INTEGER, isBridge INTEGER, lastVsBridge INTEGER)",
        ErrorCode::CreateVerseItemsTable,
    ),
    (
        "CREATE TABLE IF NOT EXISTS BridgeItems(bridgeID INTEGER PRIMARY KEY, itemID INTEGER, textCurrBridge TEXT, textExtraVerse TEXT)",
        ErrorCode::CreateBridgeItemsTable,
    ),
];

/// kdb.sqlite with one open connection
pub struct Kdb {
    conn: Connection,
}

impl Kdb {
    /// File name used inside the data directory
    pub const FILE_NAME: &'static str = "kdb.sqlite";

    /// Open the database at `db_path`, creating and initialising it on first use
    pub fn open(db_path: &Path) -> Result<Self> {
        let existed = db_path.exists();
        let code = if existed {
            ErrorCode::OpenDatabase
        } else {
            ErrorCode::CreateDatabase
        };
        let conn = Connection::open(db_path)
            .map_err(|e| KitError::database(code, StoreError::new(StoreOp::Open, e)))?;
        if !existed {
            log::info!("Creating {}", db_path.display());
        }

        let db = Self { conn };
        db.initialise()?;
        Ok(db)
    }

    /// Create in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            KitError::database(ErrorCode::CreateDatabase, StoreError::new(StoreOp::Open, e))
        })?;

        let db = Self { conn };
        db.initialise()?;
        Ok(db)
    }

    /// Create the tables and the single Bibles record if they are missing
    fn initialise(&self) -> Result<()> {
        for (sql, code) in CREATE_TABLES {
            self.conn
                .execute(sql, [])
                .map_err(|e| KitError::database(code, StoreError::new(StoreOp::CreateTable, e)))?;
        }

        let has_bible = self
            .bible_get_rec()
            .map_err(|e| KitError::database(ErrorCode::ReadBibleRec, e))?
            .is_some();
        if !has_bible {
            self.bible_insert_rec(BIBLE_ID, "Bible", false, 0)
                .map_err(|e| KitError::database(ErrorCode::CreateBibleRec, e))?;
        }
        Ok(())
    }

    /// Run `f` inside one SQLite transaction
    ///
    /// The transaction commits only when `f` returns `Ok`. An error, or a
    /// panic unwinding out of `f`, drops the guard and rolls back.
    pub fn in_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Kdb) -> Result<T>,
    {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(|e| {
                KitError::database(ErrorCode::Unexpected, StoreError::new(StoreOp::Transaction, e))
            })?;

        let value = f(self)?;
        tx.commit().map_err(|e| {
            KitError::database(ErrorCode::Unexpected, StoreError::new(StoreOp::Transaction, e))
        })?;
        Ok(value)
    }

    /// Close kdb.sqlite, reporting any failure to flush it
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| {
            KitError::database(ErrorCode::CloseDatabase, StoreError::new(StoreOp::Close, e))
        })
    }

    // ---------------------------------------------------------------------
    // Bibles

    pub fn bible_insert_rec(
        &self,
        bible_id: BibleId,
        name: &str,
        books_created: bool,
        current_book: BookId,
    ) -> StoreResult<()> {
        self.conn
            .execute(
                "INSERT INTO Bibles(bibleID, name, bookRecsCreated, currBook) VALUES(?1, ?2, ?3, ?4)",
                params![bible_id, name, books_created, current_book],
            )
            .map_err(op_err(StoreOp::CreateRecord))?;
        Ok(())
    }

    /// The Bibles record, `None` before it has been inserted
    pub fn bible_get_rec(&self) -> StoreResult<Option<BibleRec>> {
        self.conn
            .query_row(
                "SELECT bibleID, name, bookRecsCreated, currBook FROM Bibles WHERE bibleID = ?1",
                params![BIBLE_ID],
                |row| {
                    Ok(BibleRec {
                        id: row.get(0)?,
                        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        books_created: row.get::<_, Option<bool>>(2)?.unwrap_or(false),
                        current_book: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                    })
                },
            )
            .optional()
            .map_err(op_err(StoreOp::ReadRecord))
    }

    pub fn bible_update_name(&self, name: &str) -> StoreResult<()> {
        self.conn
            .execute(
                "UPDATE Bibles SET name = ?1 WHERE bibleID = ?2",
                params![name, BIBLE_ID],
            )
            .map_err(op_err(StoreOp::UpdateRecord))?;
        Ok(())
    }

    /// The flag is never cleared once set
    pub fn bible_update_recs_created(&self) -> StoreResult<()> {
        self.conn
            .execute(
                "UPDATE Bibles SET bookRecsCreated = 1 WHERE bibleID = ?1",
                params![BIBLE_ID],
            )
            .map_err(op_err(StoreOp::UpdateRecord))?;
        Ok(())
    }

    pub fn bible_update_curr_book(&self, book_id: BookId) -> StoreResult<()> {
        self.conn
            .execute(
                "UPDATE Bibles SET currBook = ?1 WHERE bibleID = ?2",
                params![book_id, BIBLE_ID],
            )
            .map_err(op_err(StoreOp::UpdateRecord))?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Books

    pub fn books_insert_rec(&self, book: &BookRec) -> StoreResult<()> {
        self.conn
            .execute(
                "INSERT INTO Books(bookID, bibleID, bookCode, bookName, chapRecsCreated, numChaps, currChID, currChNum)
                 VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    book.id,
                    book.bible_id,
                    &book.code,
                    &book.name,
                    book.chapters_created,
                    book.num_chapters,
                    book.current_chapter_id,
                    book.current_chapter_num,
                ],
            )
            .map_err(op_err(StoreOp::CreateRecord))?;
        Ok(())
    }

    /// All Books records in ascending book number
    pub fn read_books_recs(&self) -> StoreResult<Vec<BookRec>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT bookID, bibleID, bookCode, bookName, chapRecsCreated, numChaps, currChID, currChNum
                 FROM Books ORDER BY bookID",
            )
            .map_err(op_err(StoreOp::ReadRecord))?;

        let books = stmt
            .query_map([], |row| {
                Ok(BookRec {
                    id: row.get(0)?,
                    bible_id: row.get(1)?,
                    code: row.get(2)?,
                    name: row.get(3)?,
                    chapters_created: row.get(4)?,
                    num_chapters: row.get(5)?,
                    current_chapter_id: row.get(6)?,
                    current_chapter_num: row.get(7)?,
                })
            })
            .map_err(op_err(StoreOp::ReadRecord))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(op_err(StoreOp::ReadRecord))?;

        Ok(books)
    }

    pub fn books_update_rec(
        &self,
        bible_id: BibleId,
        book_id: BookId,
        chapters_created: bool,
        num_chapters: i64,
        current_chapter_id: ChapterId,
        current_chapter_num: i64,
    ) -> StoreResult<()> {
        self.conn
            .execute(
                "UPDATE Books SET chapRecsCreated = ?3, numChaps = ?4, currChID = ?5, currChNum = ?6
                 WHERE bibleID = ?1 AND bookID = ?2",
                params![
                    bible_id,
                    book_id,
                    chapters_created,
                    num_chapters,
                    current_chapter_id,
                    current_chapter_num,
                ],
            )
            .map_err(op_err(StoreOp::UpdateRecord))?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Chapters

    /// Insert a Chapters record; the chapterID is assigned by SQLite and returned
    pub fn chapters_insert_rec(&self, chapter: &ChapterRec) -> StoreResult<ChapterId> {
        self.conn
            .execute(
                "INSERT INTO Chapters(bibleID, bookID, chapterNumber, itemRecsCreated, numVerses, numItems, currItem, currVsNum)
                 VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    chapter.bible_id,
                    chapter.book_id,
                    chapter.number,
                    chapter.items_created,
                    chapter.num_verses,
                    chapter.num_items,
                    chapter.current_item,
                    chapter.current_verse,
                ],
            )
            .map_err(op_err(StoreOp::CreateRecord))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Chapters records of one Book in ascending chapter number
    pub fn read_chapters_recs(&self, bible_id: BibleId, book_id: BookId) -> StoreResult<Vec<ChapterRec>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT chapterID, bibleID, bookID, chapterNumber, itemRecsCreated, numVerses, numItems, currItem, currVsNum
                 FROM Chapters WHERE bibleID = ?1 AND bookID = ?2 ORDER BY chapterNumber",
            )
            .map_err(op_err(StoreOp::ReadRecord))?;

        let chapters = stmt
            .query_map(params![bible_id, book_id], |row| {
                Ok(ChapterRec {
                    id: row.get(0)?,
                    bible_id: row.get(1)?,
                    book_id: row.get(2)?,
                    number: row.get(3)?,
                    items_created: row.get(4)?,
                    num_verses: row.get(5)?,
                    num_items: row.get(6)?,
                    current_item: row.get(7)?,
                    current_verse: row.get(8)?,
                })
            })
            .map_err(op_err(StoreOp::ReadRecord))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(op_err(StoreOp::ReadRecord))?;

        Ok(chapters)
    }

    pub fn chapters_update_rec(
        &self,
        chapter_id: ChapterId,
        items_created: bool,
        current_item: ItemId,
        current_verse: i64,
    ) -> StoreResult<()> {
        self.conn
            .execute(
                "UPDATE Chapters SET itemRecsCreated = ?2, currItem = ?3, currVsNum = ?4 WHERE chapterID = ?1",
                params![chapter_id, items_created, current_item, current_verse],
            )
            .map_err(op_err(StoreOp::UpdateRecord))?;
        Ok(())
    }

    /// Update after publication items have been inserted or deleted
    pub fn chapters_update_rec_pub(
        &self,
        chapter_id: ChapterId,
        num_items: i64,
        current_item: ItemId,
        current_verse: i64,
    ) -> StoreResult<()> {
        self.conn
            .execute(
                "UPDATE Chapters SET numItems = ?2, currItem = ?3, currVsNum = ?4 WHERE chapterID = ?1",
                params![chapter_id, num_items, current_item, current_verse],
            )
            .map_err(op_err(StoreOp::UpdateRecord))?;
        Ok(())
    }

    pub fn update_usfm_text(&self, chapter_id: ChapterId, text: &str) -> StoreResult<()> {
        self.conn
            .execute(
                "UPDATE Chapters SET USFMText = ?2 WHERE chapterID = ?1",
                params![chapter_id, text],
            )
            .map_err(op_err(StoreOp::UpdateRecord))?;
        Ok(())
    }

    /// USFM text last exported for a Chapter, `None` if never exported
    pub fn get_usfm_text(&self, chapter_id: ChapterId) -> StoreResult<Option<String>> {
        let text = self
            .conn
            .query_row(
                "SELECT USFMText FROM Chapters WHERE chapterID = ?1",
                params![chapter_id],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()
            .map_err(op_err(StoreOp::ReadRecord))?;
        Ok(text.flatten())
    }

    // ---------------------------------------------------------------------
    // VerseItems

    /// Insert a VerseItems record (its `id` is ignored) and return the new itemID
    pub fn verse_items_insert_rec(&self, item: &VerseItemRec) -> StoreResult<ItemId> {
        self.conn
            .execute(
                "INSERT INTO VerseItems(chapterID, verseNumber, itemType, itemOrder, itemText, intSeq, isBridge, lastVsBridge)
                 VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    item.chapter_id,
                    item.verse,
                    item.item_type,
                    item.order,
                    &item.text,
                    item.int_seq,
                    item.is_bridge,
                    item.last_verse_bridge,
                ],
            )
            .map_err(op_err(StoreOp::CreateRecord))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// VerseItems of one Chapter in display order
    pub fn read_verse_items_recs(&self, chapter_id: ChapterId) -> StoreResult<Vec<VerseItemRec>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT itemID, chapterID, verseNumber, itemType, itemOrder, itemText, intSeq, isBridge, lastVsBridge
                 FROM VerseItems WHERE chapterID = ?1 ORDER BY itemOrder, itemID",
            )
            .map_err(op_err(StoreOp::ReadRecord))?;

        let items = stmt
            .query_map(params![chapter_id], Self::verse_item_from_row)
            .map_err(op_err(StoreOp::ReadRecord))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(op_err(StoreOp::ReadRecord))?;

        Ok(items)
    }

    fn verse_item_from_row(row: &Row<'_>) -> rusqlite::Result<VerseItemRec> {
        Ok(VerseItemRec {
            id: row.get(0)?,
            chapter_id: row.get(1)?,
            verse: row.get(2)?,
            item_type: row.get(3)?,
            order: row.get(4)?,
            text: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            int_seq: row.get(6)?,
            is_bridge: row.get(7)?,
            last_verse_bridge: row.get(8)?,
        })
    }

    pub fn items_update_rec_text(&self, item_id: ItemId, text: &str) -> StoreResult<()> {
        self.conn
            .execute(
                "UPDATE VerseItems SET itemText = ?2 WHERE itemID = ?1",
                params![item_id, text],
            )
            .map_err(op_err(StoreOp::UpdateRecord))?;
        Ok(())
    }

    /// Update the head of a verse bridge
    pub fn items_update_for_bridge(
        &self,
        item_id: ItemId,
        text: &str,
        is_bridge: bool,
        last_verse_bridge: i64,
    ) -> StoreResult<()> {
        self.conn
            .execute(
                "UPDATE VerseItems SET itemText = ?2, isBridge = ?3, lastVsBridge = ?4 WHERE itemID = ?1",
                params![item_id, text, is_bridge, last_verse_bridge],
            )
            .map_err(op_err(StoreOp::UpdateRecord))?;
        Ok(())
    }

    pub fn items_delete_rec(&self, item_id: ItemId) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM VerseItems WHERE itemID = ?1", params![item_id])
            .map_err(op_err(StoreOp::DeleteRecord))?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // BridgeItems

    pub fn bridge_insert_rec(
        &self,
        item_id: ItemId,
        text_curr_bridge: &str,
        text_extra_verse: &str,
    ) -> StoreResult<BridgeId> {
        self.conn
            .execute(
                "INSERT INTO BridgeItems(itemID, textCurrBridge, textExtraVerse) VALUES(?1, ?2, ?3)",
                params![item_id, text_curr_bridge, text_extra_verse],
            )
            .map_err(op_err(StoreOp::CreateRecord))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// BridgeItems of a bridge head, oldest first; the last one is the most recent bridge step
    pub fn bridge_get_recs(&self, item_id: ItemId) -> StoreResult<Vec<BridgeRec>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT bridgeID, itemID, textCurrBridge, textExtraVerse
                 FROM BridgeItems WHERE itemID = ?1 ORDER BY bridgeID",
            )
            .map_err(op_err(StoreOp::ReadRecord))?;

        let recs = stmt
            .query_map(params![item_id], |row| {
                Ok(BridgeRec {
                    id: row.get(0)?,
                    item_id: row.get(1)?,
                    text_curr_bridge: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    text_extra_verse: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                })
            })
            .map_err(op_err(StoreOp::ReadRecord))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(op_err(StoreOp::ReadRecord))?;

        Ok(recs)
    }

    pub fn bridge_delete_rec(&self, bridge_id: BridgeId) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM BridgeItems WHERE bridgeID = ?1", params![bridge_id])
            .map_err(op_err(StoreOp::DeleteRecord))?;
        Ok(())
    }
}
