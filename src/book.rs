//! The current Book and its list of chapters

use crate::books::BooksSpec;
use crate::chapter::Chapter;
use crate::error::{coded, ErrorCode, KitError, Result};
use crate::menu::MenuAction;
use crate::store::{BookRec, ChapterRec, Kdb};
use crate::types::{BookId, PSALMS_BOOK_ID};

/// The Book being keyboarded
#[derive(Debug, Clone)]
pub struct Book {
    rec: BookRec,
    chapters: Vec<ChapterRec>,
    current: Option<Chapter>,
}

impl Book {
    /// Instantiate a Book, creating its Chapters records the first time it is selected
    pub fn open(kdb: &Kdb, spec: &BooksSpec, rec: BookRec) -> Result<Self> {
        let mut book = Self {
            rec,
            chapters: Vec::new(),
            current: None,
        };
        if !book.rec.chapters_created {
            book.create_chapters(kdb, spec)?;
        }
        book.chapters = kdb
            .read_chapters_recs(book.rec.bible_id, book.rec.id)
            .map_err(coded(ErrorCode::ReadChapterRecs))?;
        Ok(book)
    }

    fn create_chapters(&mut self, kdb: &Kdb, spec: &BooksSpec) -> Result<()> {
        let book_spec = spec
            .get(self.rec.id)
            .ok_or_else(|| KitError::BookSpec(format!("no chapters specified for book {}", self.rec.id)))?;
        let (bible_id, book_id) = (self.rec.bible_id, self.rec.id);
        let num_chapters = book_spec.chapters.len() as i64;

        kdb.in_transaction(|db| {
            for (i, ch) in book_spec.chapters.iter().enumerate() {
                let rec = ChapterRec {
                    id: 0,
                    bible_id,
                    book_id,
                    number: i as i64 + 1,
                    items_created: false,
                    num_verses: ch.verses,
                    num_items: ch.initial_items(),
                    current_item: 0,
                    current_verse: 0,
                };
                db.chapters_insert_rec(&rec)
                    .map_err(coded(ErrorCode::CreateChapterRec))?;
            }
            db.books_update_rec(bible_id, book_id, true, num_chapters, 0, 0)
                .map_err(coded(ErrorCode::UpdateBookRec))
        })?;

        self.rec.chapters_created = true;
        self.rec.num_chapters = num_chapters;
        self.rec.current_chapter_id = 0;
        self.rec.current_chapter_num = 0;
        log::info!("Created {} chapters for {}", num_chapters, self.rec.name);
        Ok(())
    }

    /// "psalm" for Psalms, otherwise "chapter"
    pub fn chapter_name(&self) -> &'static str {
        if self.rec.id == PSALMS_BOOK_ID {
            "psalm"
        } else {
            "chapter"
        }
    }

    /// Instantiate the recorded current Chapter, if there is one
    pub fn go_current_chapter(&mut self, kdb: &Kdb) -> Result<Option<&Chapter>> {
        if self.rec.current_chapter_num == 0 {
            return Ok(None);
        }
        let offset = (self.rec.current_chapter_num - 1) as usize;
        self.setup_current_chapter(kdb, offset)?;
        Ok(self.current.as_ref())
    }

    /// Make the chapter at `offset` in the chapter list current
    ///
    /// Selecting the chapter that is already current keeps the instance in
    /// memory, including its current item.
    pub fn setup_current_chapter(&mut self, kdb: &Kdb, offset: usize) -> Result<()> {
        let rec = self.chapters.get(offset).cloned().ok_or_else(|| {
            KitError::NotFound(format!("{} {} of {}", self.chapter_name(), offset + 1, self.rec.name))
        })?;

        if self.current.as_ref().is_some_and(|c| c.id() == rec.id) {
            return Ok(());
        }

        let mut chapter = Chapter::open(kdb, rec)?;
        chapter.go_current_item(kdb)?;

        self.rec.current_chapter_id = chapter.id();
        self.rec.current_chapter_num = chapter.number();
        kdb.books_update_rec(
            self.rec.bible_id,
            self.rec.id,
            self.rec.chapters_created,
            self.rec.num_chapters,
            self.rec.current_chapter_id,
            self.rec.current_chapter_num,
        )
        .map_err(coded(ErrorCode::UpdateBookRec))?;

        self.chapters[offset] = chapter.rec().clone();
        self.current = Some(chapter);
        log::debug!("Current chapter is {} {}", self.rec.code, self.rec.current_chapter_num);
        Ok(())
    }

    /// Make an item of the current chapter current
    pub fn select_item(&mut self, kdb: &Kdb, offset: usize) -> Result<()> {
        self.current_chapter_mut()?.select_item(kdb, offset)?;
        self.sync_current_chapter();
        Ok(())
    }

    pub fn save_item_text(&mut self, kdb: &Kdb, offset: usize, text: &str) -> Result<()> {
        self.current_chapter_mut()?.save_item_text(kdb, offset, text)
    }

    /// Apply a popover action in the current chapter
    pub fn apply_action(&mut self, kdb: &Kdb, action: MenuAction, cursor: Option<usize>) -> Result<()> {
        self.current_chapter_mut()?.apply_action(kdb, action, cursor)?;
        self.sync_current_chapter();
        Ok(())
    }

    /// Copy the current chapter's counts and current item into the chapter list
    fn sync_current_chapter(&mut self) {
        if let Some(chapter) = &self.current {
            if let Some(entry) = self.chapters.iter_mut().find(|c| c.id == chapter.id()) {
                *entry = chapter.rec().clone();
            }
        }
    }

    pub fn current_chapter(&self) -> Result<&Chapter> {
        self.current.as_ref().ok_or(KitError::NoCurrentChapter)
    }

    pub fn current_chapter_mut(&mut self) -> Result<&mut Chapter> {
        self.current.as_mut().ok_or(KitError::NoCurrentChapter)
    }

    pub fn chapters(&self) -> &[ChapterRec] {
        &self.chapters
    }

    pub fn rec(&self) -> &BookRec {
        &self.rec
    }

    pub fn id(&self) -> BookId {
        self.rec.id
    }

    pub fn code(&self) -> &str {
        &self.rec.code
    }

    pub fn name(&self) -> &str {
        &self.rec.name
    }
}
