//! The current Chapter and its VerseItems
//!
//! A [`Chapter`] holds the VerseItems of one chapter in display order and
//! knows which of them is current. Every change is written through to
//! kdb.sqlite as it happens, so the in-memory copy can be dropped at any
//! time without losing work.
//!
//! The VerseItems records are created the first time a chapter is
//! selected: an Ascription for Psalms that have one, then one empty Verse
//! per verse. Publication items (paragraphs, headings, titles and so on)
//! are added and removed through [`Chapter::apply_action`], which only
//! accepts actions offered by the current item's [`VIMenu`].

use crate::error::{coded, ErrorCode, KitError, Result};
use crate::menu::{MenuAction, MenuContext, VIMenu};
use crate::store::{ChapterRec, Kdb, VerseItemRec};
use crate::types::{ChapterId, ItemId, ItemType};
use crate::usfm;

/// One chapter of the current Book
#[derive(Debug, Clone)]
pub struct Chapter {
    rec: ChapterRec,
    items: Vec<VerseItemRec>,
    current: usize,
    has_ascription: bool,
    has_title: bool,
    has_in_title: bool,
    next_int_seq: i64,
}

impl Chapter {
    /// Instantiate a chapter, creating its VerseItems records on first use
    ///
    /// The current item is not restored; call [`Chapter::go_current_item`].
    pub fn open(kdb: &Kdb, rec: ChapterRec) -> Result<Self> {
        let mut chapter = Self {
            rec,
            items: Vec::new(),
            current: 0,
            has_ascription: false,
            has_title: false,
            has_in_title: false,
            next_int_seq: 1,
        };
        if !chapter.rec.items_created {
            chapter.create_items(kdb)?;
        }
        chapter.load(kdb)?;
        Ok(chapter)
    }

    fn create_items(&mut self, kdb: &Kdb) -> Result<()> {
        let chapter_id = self.rec.id;
        let num_verses = self.rec.num_verses;
        let ascription = self.rec.num_items > num_verses;

        kdb.in_transaction(|db| {
            if ascription {
                db.verse_items_insert_rec(&VerseItemRec::new(chapter_id, 1, ItemType::Ascription, ""))
                    .map_err(coded(ErrorCode::CreateVerseItemRec))?;
            }
            for verse in 1..=num_verses {
                db.verse_items_insert_rec(&VerseItemRec::new(chapter_id, verse, ItemType::Verse, ""))
                    .map_err(coded(ErrorCode::CreateVerseItemRec))?;
            }
            db.chapters_update_rec(chapter_id, true, 0, 0)
                .map_err(coded(ErrorCode::UpdateChapterItemsCreated))
        })?;

        self.rec.items_created = true;
        log::info!(
            "Created {} VerseItems for chapter {} of book {}",
            num_verses + i64::from(ascription),
            self.rec.number,
            self.rec.book_id
        );
        Ok(())
    }

    /// Read the VerseItems and refresh everything derived from them
    fn load(&mut self, kdb: &Kdb) -> Result<()> {
        self.items = kdb
            .read_verse_items_recs(self.rec.id)
            .map_err(coded(ErrorCode::ReadVerseItemRecs))?;

        self.has_ascription = self.contains(ItemType::Ascription);
        self.has_title = self.contains(ItemType::Title);
        self.has_in_title = self.contains(ItemType::InTitle);
        self.next_int_seq = self.items.iter().map(|i| i.int_seq).max().unwrap_or(0) + 1;

        let num_items = self.items.len() as i64;
        if num_items != self.rec.num_items {
            log::debug!(
                "Chapter {} numItems {} corrected to {}",
                self.rec.id,
                self.rec.num_items,
                num_items
            );
            self.rec.num_items = num_items;
            kdb.chapters_update_rec_pub(
                self.rec.id,
                num_items,
                self.rec.current_item,
                self.rec.current_verse,
            )
            .map_err(coded(ErrorCode::UpdateChapterNumItems))?;
        }
        Ok(())
    }

    fn contains(&self, item_type: ItemType) -> bool {
        self.items.iter().any(|i| i.item_type == item_type)
    }

    fn offset_of(&self, item_id: ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id == item_id)
    }

    /// Go to the recorded current item, or the first item if none is recorded
    pub fn go_current_item(&mut self, kdb: &Kdb) -> Result<usize> {
        let offset = if self.rec.current_item == 0 {
            0
        } else {
            match self.offset_of(self.rec.current_item) {
                Some(offset) => offset,
                None => {
                    log::warn!(
                        "Chapter {} current item {} not found, using first item",
                        self.rec.number,
                        self.rec.current_item
                    );
                    0
                }
            }
        };
        let item = self
            .items
            .get(offset)
            .ok_or_else(|| KitError::NotFound(format!("items of chapter {}", self.rec.number)))?;

        self.current = offset;
        self.rec.current_item = item.id;
        self.rec.current_verse = item.verse;
        kdb.chapters_update_rec(self.rec.id, true, self.rec.current_item, self.rec.current_verse)
            .map_err(coded(ErrorCode::UpdateChapterGoCurrItem))?;
        Ok(offset)
    }

    /// Make the item at `offset` current
    pub fn select_item(&mut self, kdb: &Kdb, offset: usize) -> Result<()> {
        let item = self.item(offset)?;
        let (item_id, verse) = (item.id, item.verse);

        self.current = offset;
        self.rec.current_item = item_id;
        self.rec.current_verse = verse;
        kdb.chapters_update_rec(self.rec.id, true, item_id, verse)
            .map_err(coded(ErrorCode::UpdateChapterSetCurrItem))
    }

    /// Replace the text of the item at `offset`
    pub fn save_item_text(&mut self, kdb: &Kdb, offset: usize, text: &str) -> Result<()> {
        let item_id = self.item(offset)?.id;
        kdb.items_update_rec_text(item_id, text)
            .map_err(coded(ErrorCode::UpdateVerseItemText))?;
        self.items[offset].text = text.to_string();
        Ok(())
    }

    /// Popover menu for the current item
    pub fn menu(&self) -> Option<VIMenu> {
        VIMenu::build(&self.menu_context(), self.current)
    }

    fn menu_context(&self) -> MenuContext<'_> {
        MenuContext {
            book_id: self.rec.book_id,
            chapter_num: self.rec.number,
            num_verses: self.rec.num_verses,
            has_ascription: self.has_ascription,
            has_title: self.has_title,
            has_in_title: self.has_in_title,
            items: &self.items,
        }
    }

    /// Carry out a popover menu action on the current item
    ///
    /// `cursor` is the character offset of the insertion point, used when
    /// splitting a verse with a paragraph break; the end of the text if `None`.
    pub fn apply_action(&mut self, kdb: &Kdb, action: MenuAction, cursor: Option<usize>) -> Result<()> {
        let menu = self
            .menu()
            .ok_or_else(|| KitError::NotFound(format!("current item of chapter {}", self.rec.number)))?;
        if !menu.offers(action) {
            return Err(KitError::InvalidAction {
                action: action.code().to_string(),
                item_type: menu.item_type.to_string(),
            });
        }

        let target = kdb.in_transaction(|db| self.perform(db, action, cursor))?;

        self.load(kdb)?;
        self.current = self.offset_of(target).unwrap_or(0);
        if let Some(item) = self.items.get(self.current) {
            self.rec.current_item = item.id;
            self.rec.current_verse = item.verse;
        }
        kdb.chapters_update_rec_pub(
            self.rec.id,
            self.rec.num_items,
            self.rec.current_item,
            self.rec.current_verse,
        )
        .map_err(coded(pub_update_code(action)))?;

        log::info!(
            "{} applied in chapter {} of book {}, now {} items",
            action,
            self.rec.number,
            self.rec.book_id,
            self.rec.num_items
        );
        Ok(())
    }

    /// Database part of an action; returns the item to make current afterwards
    fn perform(&self, db: &Kdb, action: MenuAction, cursor: Option<usize>) -> Result<ItemId> {
        let item = &self.items[self.current];
        let chapter_id = self.rec.id;

        match action {
            MenuAction::CreateAscription => insert(
                db,
                VerseItemRec::new(chapter_id, 1, ItemType::Ascription, ""),
                ErrorCode::CreateAscription,
            ),
            MenuAction::CreateTitle => insert(
                db,
                VerseItemRec::new(chapter_id, 1, ItemType::Title, ""),
                ErrorCode::CreateTitle,
            ),
            MenuAction::CreateParaBefore => {
                insert(
                    db,
                    VerseItemRec::new(chapter_id, item.verse, ItemType::Para, ""),
                    ErrorCode::CreateParaBefore,
                )?;
                Ok(item.id)
            }
            MenuAction::CreateParaCont => self.split_verse(db, cursor),
            MenuAction::DeleteParaCont => self.join_verse(db, self.current - 1),
            MenuAction::DeleteVerseCont => self.join_verse(db, self.current - 2),
            MenuAction::CreateHeadingBefore | MenuAction::CreateHeadingAfter => insert(
                db,
                VerseItemRec::new(chapter_id, item.verse, ItemType::Heading, ""),
                ErrorCode::CreateSubjHeading,
            ),
            MenuAction::CreateParallelRef => insert(
                db,
                VerseItemRec::new(chapter_id, item.verse, ItemType::ParlRef, ""),
                ErrorCode::CreateParallelRef,
            ),
            MenuAction::Bridge => self.bridge_next_verse(db),
            MenuAction::Unbridge => self.unbridge_last_verse(db),
            MenuAction::CreateIntroTitle => insert(
                db,
                VerseItemRec::new(chapter_id, 1, ItemType::InTitle, ""),
                ErrorCode::CreateIntroTitle,
            ),
            MenuAction::CreateIntroHeading => insert(
                db,
                VerseItemRec::new(chapter_id, 1, ItemType::InSubj, "").with_int_seq(self.next_int_seq),
                ErrorCode::CreateIntroHeading,
            ),
            MenuAction::CreateIntroPara => insert(
                db,
                VerseItemRec::new(chapter_id, 1, ItemType::InPara, "").with_int_seq(self.next_int_seq),
                ErrorCode::CreateIntroPara,
            ),
            MenuAction::DeleteAscription => self.delete_current(db, ErrorCode::DeleteAscription),
            MenuAction::DeleteTitle => self.delete_current(db, ErrorCode::DeleteTitle),
            MenuAction::DeletePara => self.delete_current(db, ErrorCode::DeleteParaBefore),
            MenuAction::DeleteHeading => self.delete_current(db, ErrorCode::DeleteSubjHeading),
            MenuAction::DeleteParallelRef => self.delete_current(db, ErrorCode::DeleteParallelRef),
            MenuAction::DeleteIntroTitle => self.delete_current(db, ErrorCode::DeleteIntroTitle),
            MenuAction::DeleteIntroHeading => self.delete_current(db, ErrorCode::DeleteIntroHeading),
            MenuAction::DeleteIntroPara => self.delete_current(db, ErrorCode::DeleteIntroPara),
        }
    }

    /// Delete the current item; the one after it (or before, at the end) becomes current
    fn delete_current(&self, db: &Kdb, code: ErrorCode) -> Result<ItemId> {
        let item = &self.items[self.current];
        db.items_delete_rec(item.id).map_err(coded(code))?;

        let following = self
            .items
            .get(self.current + 1)
            .or_else(|| self.current.checked_sub(1).and_then(|i| self.items.get(i)));
        Ok(following.map_or(0, |i| i.id))
    }

    /// Break the current verse into Verse, ParaCont and VerseCont at `cursor`
    fn split_verse(&self, db: &Kdb, cursor: Option<usize>) -> Result<ItemId> {
        let item = &self.items[self.current];
        let num_chars = item.text.chars().count();
        let split = cursor.unwrap_or(num_chars).min(num_chars);
        let byte = item
            .text
            .char_indices()
            .nth(split)
            .map_or(item.text.len(), |(i, _)| i);
        let (before, after) = item.text.split_at(byte);

        db.items_update_rec_text(item.id, before)
            .map_err(coded(ErrorCode::UpdateVerseItemText))?;
        insert(
            db,
            VerseItemRec::new(item.chapter_id, item.verse, ItemType::ParaCont, ""),
            ErrorCode::CreateParaCont,
        )?;
        insert(
            db,
            VerseItemRec::new(item.chapter_id, item.verse, ItemType::VerseCont, after),
            ErrorCode::CreateVerseCont,
        )
    }

    /// Rejoin the Verse at `verse_offset` with its continuation
    fn join_verse(&self, db: &Kdb, verse_offset: usize) -> Result<ItemId> {
        let verse = &self.items[verse_offset];
        let para_cont = &self.items[verse_offset + 1];
        let verse_cont = &self.items[verse_offset + 2];

        let joined = format!("{}{}", verse.text, verse_cont.text);
        db.items_update_rec_text(verse.id, &joined)
            .map_err(coded(ErrorCode::UpdateVerseItemText))?;
        db.items_delete_rec(verse_cont.id)
            .map_err(coded(ErrorCode::DeleteVerseCont))?;
        db.items_delete_rec(para_cont.id)
            .map_err(coded(ErrorCode::DeleteParaCont))?;
        Ok(verse.id)
    }

    fn bridge_next_verse(&self, db: &Kdb) -> Result<ItemId> {
        let head = &self.items[self.current];
        let next = &self.items[self.current + 1];

        db.items_delete_rec(next.id)
            .map_err(coded(ErrorCode::DeleteBridgedVerse))?;
        db.bridge_insert_rec(head.id, &head.text, &next.text)
            .map_err(coded(ErrorCode::CreateBridgeRec))?;
        let text = format!("{} {}", head.text, next.text);
        db.items_update_for_bridge(head.id, &text, true, next.verse)
            .map_err(coded(ErrorCode::UpdateBridgeHead))?;
        Ok(head.id)
    }

    fn unbridge_last_verse(&self, db: &Kdb) -> Result<ItemId> {
        let head = &self.items[self.current];
        let recs = db
            .bridge_get_recs(head.id)
            .map_err(coded(ErrorCode::ReadBridgeRecs))?;
        let last = recs
            .last()
            .ok_or_else(|| KitError::NotFound(format!("bridge record for verse {}", head.verse_label())))?;

        insert(
            db,
            VerseItemRec::new(head.chapter_id, head.last_verse_bridge, ItemType::Verse, last.text_extra_verse.as_str()),
            ErrorCode::CreateUnbridgedVerse,
        )?;

        let mut last_verse = head.last_verse_bridge - 1;
        let is_bridge = last_verse != head.verse;
        if !is_bridge {
            last_verse = 0;
        }
        db.items_update_for_bridge(head.id, &last.text_curr_bridge, is_bridge, last_verse)
            .map_err(coded(ErrorCode::UpdateBridgeHead))?;
        db.bridge_delete_rec(last.id)
            .map_err(coded(ErrorCode::DeleteBridgeRec))?;
        Ok(head.id)
    }

    /// USFM text of the chapter
    pub fn usfm(&self, book_code: &str, bible_name: &str) -> String {
        usfm::chapter_usfm(book_code, bible_name, self.rec.number, &self.items)
    }

    /// Generate the USFM text and store it in the Chapters record
    pub fn export_usfm(&self, kdb: &Kdb, book_code: &str, bible_name: &str) -> Result<String> {
        let text = self.usfm(book_code, bible_name);
        kdb.update_usfm_text(self.rec.id, &text)
            .map_err(coded(ErrorCode::UpdateChapterUsfm))?;
        log::info!("Exported USFM for {} {}", book_code, self.rec.number);
        Ok(text)
    }

    pub fn rec(&self) -> &ChapterRec {
        &self.rec
    }

    pub fn id(&self) -> ChapterId {
        self.rec.id
    }

    pub fn number(&self) -> i64 {
        self.rec.number
    }

    pub fn num_verses(&self) -> i64 {
        self.rec.num_verses
    }

    pub fn num_items(&self) -> i64 {
        self.rec.num_items
    }

    pub fn items(&self) -> &[VerseItemRec] {
        &self.items
    }

    pub fn item(&self, offset: usize) -> Result<&VerseItemRec> {
        self.items
            .get(offset)
            .ok_or_else(|| KitError::NotFound(format!("item {} of chapter {}", offset, self.rec.number)))
    }

    pub fn current_offset(&self) -> usize {
        self.current
    }

    pub fn current_item(&self) -> Option<&VerseItemRec> {
        self.items.get(self.current)
    }

    pub fn has_ascription(&self) -> bool {
        self.has_ascription
    }

    pub fn has_title(&self) -> bool {
        self.has_title
    }

    pub fn has_in_title(&self) -> bool {
        self.has_in_title
    }

    /// Sequence number for the next introductory matter item
    pub fn next_int_seq(&self) -> i64 {
        self.next_int_seq
    }
}

fn insert(db: &Kdb, item: VerseItemRec, code: ErrorCode) -> Result<ItemId> {
    db.verse_items_insert_rec(&item).map_err(coded(code))
}

/// Error number reported when the Chapters record cannot be updated after `action`
fn pub_update_code(action: MenuAction) -> ErrorCode {
    match action {
        MenuAction::CreateAscription => ErrorCode::UpdateChapterAscription,
        _ => ErrorCode::UpdateChapterPubItem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BookId, BIBLE_ID, PSALMS_BOOK_ID};
    use proptest::prelude::*;

    fn open_chapter(db: &Kdb, book_id: BookId, number: i64, verses: i64, ascription: bool) -> Chapter {
        let mut rec = ChapterRec {
            id: 0,
            bible_id: BIBLE_ID,
            book_id,
            number,
            items_created: false,
            num_verses: verses,
            num_items: verses + i64::from(ascription),
            current_item: 0,
            current_verse: 0,
        };
        rec.id = db.chapters_insert_rec(&rec).unwrap();
        let mut chapter = Chapter::open(db, rec).unwrap();
        chapter.go_current_item(db).unwrap();
        chapter
    }

    fn types(chapter: &Chapter) -> Vec<ItemType> {
        chapter.items().iter().map(|i| i.item_type).collect()
    }

    fn texts(chapter: &Chapter) -> Vec<String> {
        chapter.items().iter().map(|i| i.text.clone()).collect()
    }

    fn fill_verses(db: &Kdb, chapter: &mut Chapter) {
        for offset in 0..chapter.items().len() {
            let text = format!("v{}", chapter.items()[offset].verse);
            chapter.save_item_text(db, offset, &text).unwrap();
        }
    }

    #[test]
    fn test_items_created_on_first_open() {
        let db = Kdb::open_in_memory().unwrap();
        let chapter = open_chapter(&db, 66, 1, 25, false);
        assert_eq!(chapter.items().len(), 25);
        assert!(chapter.items().iter().all(|i| i.item_type == ItemType::Verse && i.text.is_empty()));
        assert_eq!(chapter.items()[24].verse, 25);
        assert!(db.read_chapters_recs(BIBLE_ID, 66).unwrap()[0].items_created);
    }

    #[test]
    fn test_psalm_ascription_created_first() {
        let db = Kdb::open_in_memory().unwrap();
        let chapter = open_chapter(&db, PSALMS_BOOK_ID, 3, 8, true);
        assert_eq!(chapter.items().len(), 9);
        assert_eq!(chapter.items()[0].item_type, ItemType::Ascription);
        assert_eq!(chapter.items()[0].order, 75);
        assert!(chapter.has_ascription());

        let menu = chapter.menu().unwrap();
        assert_eq!(menu.actions(), vec![MenuAction::DeleteAscription]);
    }

    #[test]
    fn test_reopen_restores_current_item() {
        let db = Kdb::open_in_memory().unwrap();
        let mut chapter = open_chapter(&db, 1, 2, 25, false);
        chapter.select_item(&db, 6).unwrap();
        chapter.save_item_text(&db, 6, "seventh").unwrap();

        let rec = db.read_chapters_recs(BIBLE_ID, 1).unwrap().remove(0);
        assert_eq!(rec.current_verse, 7);
        let mut reopened = Chapter::open(&db, rec).unwrap();
        assert_eq!(reopened.items().len(), 25);
        assert_eq!(reopened.go_current_item(&db).unwrap(), 6);
        assert_eq!(reopened.current_item().unwrap().text, "seventh");
    }

    #[test]
    fn test_missing_current_item_falls_back_to_first() {
        let db = Kdb::open_in_memory().unwrap();
        let mut chapter = open_chapter(&db, 1, 3, 5, false);
        chapter.select_item(&db, 2).unwrap();
        let lost = chapter.current_item().unwrap().id;
        db.items_delete_rec(lost).unwrap();

        let rec = db.read_chapters_recs(BIBLE_ID, 1).unwrap().remove(0);
        assert_eq!(rec.current_item, lost);
        let mut reopened = Chapter::open(&db, rec).unwrap();
        assert_eq!(reopened.go_current_item(&db).unwrap(), 0);
        assert_eq!(reopened.current_item().unwrap().verse, 1);

        let rec = db.read_chapters_recs(BIBLE_ID, 1).unwrap().remove(0);
        assert_eq!(rec.current_item, reopened.items()[0].id);
    }

    #[test]
    fn test_select_out_of_range() {
        let db = Kdb::open_in_memory().unwrap();
        let mut chapter = open_chapter(&db, 1, 2, 3, false);
        assert!(matches!(chapter.select_item(&db, 3), Err(KitError::NotFound(_))));
        assert!(chapter.save_item_text(&db, 9, "x").is_err());
    }

    #[test]
    fn test_paragraph_before_keeps_verse_current() {
        let db = Kdb::open_in_memory().unwrap();
        let mut chapter = open_chapter(&db, 41, 2, 4, false);
        chapter.select_item(&db, 2).unwrap();
        chapter.apply_action(&db, MenuAction::CreateParaBefore, None).unwrap();

        assert_eq!(chapter.num_items(), 5);
        assert_eq!(chapter.items()[2].item_type, ItemType::Para);
        assert_eq!(chapter.current_offset(), 3);
        assert_eq!(chapter.current_item().unwrap().verse, 3);

        chapter.select_item(&db, 2).unwrap();
        chapter.apply_action(&db, MenuAction::DeletePara, None).unwrap();
        assert_eq!(chapter.num_items(), 4);
        assert_eq!(chapter.current_offset(), 2);
        assert_eq!(chapter.current_item().unwrap().item_type, ItemType::Verse);
    }

    #[test]
    fn test_heading_and_parallel_ref_order() {
        let db = Kdb::open_in_memory().unwrap();
        let mut chapter = open_chapter(&db, 41, 2, 4, false);
        chapter.select_item(&db, 1).unwrap();
        chapter.apply_action(&db, MenuAction::CreateParaBefore, None).unwrap();
        chapter.apply_action(&db, MenuAction::CreateHeadingBefore, None).unwrap();
        assert_eq!(chapter.current_item().unwrap().item_type, ItemType::Heading);
        chapter.apply_action(&db, MenuAction::CreateParallelRef, None).unwrap();
        assert_eq!(chapter.current_item().unwrap().item_type, ItemType::ParlRef);

        assert_eq!(
            types(&chapter),
            vec![
                ItemType::Verse,
                ItemType::Heading,
                ItemType::ParlRef,
                ItemType::Para,
                ItemType::Verse,
                ItemType::Verse,
                ItemType::Verse,
            ]
        );
    }

    #[test]
    fn test_paragraph_in_verse_split_and_rejoin() {
        let db = Kdb::open_in_memory().unwrap();
        let mut chapter = open_chapter(&db, 43, 3, 3, false);
        chapter.save_item_text(&db, 1, "For God so loved").unwrap();
        chapter.select_item(&db, 1).unwrap();

        chapter.apply_action(&db, MenuAction::CreateParaCont, Some(7)).unwrap();
        assert_eq!(
            types(&chapter),
            vec![
                ItemType::Verse,
                ItemType::Verse,
                ItemType::ParaCont,
                ItemType::VerseCont,
                ItemType::Verse,
            ]
        );
        assert_eq!(chapter.items()[1].text, "For God");
        assert_eq!(chapter.items()[3].text, " so loved");
        assert_eq!(chapter.current_offset(), 3);

        chapter.apply_action(&db, MenuAction::DeleteVerseCont, None).unwrap();
        assert_eq!(chapter.items().len(), 3);
        assert_eq!(chapter.items()[1].text, "For God so loved");
        assert_eq!(chapter.current_offset(), 1);

        chapter.apply_action(&db, MenuAction::CreateParaCont, Some(3)).unwrap();
        chapter.select_item(&db, 2).unwrap();
        chapter.apply_action(&db, MenuAction::DeleteParaCont, None).unwrap();
        assert_eq!(chapter.items().len(), 3);
        assert_eq!(chapter.items()[1].text, "For God so loved");
        assert_eq!(chapter.current_offset(), 1);
    }

    #[test]
    fn test_split_counts_characters_not_bytes() {
        let db = Kdb::open_in_memory().unwrap();
        let mut chapter = open_chapter(&db, 43, 1, 2, false);
        chapter.save_item_text(&db, 1, "ñandú ära").unwrap();
        chapter.select_item(&db, 1).unwrap();
        chapter.apply_action(&db, MenuAction::CreateParaCont, Some(5)).unwrap();
        assert_eq!(chapter.items()[1].text, "ñandú");
        assert_eq!(chapter.items()[3].text, " ära");
    }

    #[test]
    fn test_bridge_then_unbridge() {
        let db = Kdb::open_in_memory().unwrap();
        let mut chapter = open_chapter(&db, 41, 5, 4, false);
        fill_verses(&db, &mut chapter);

        chapter.apply_action(&db, MenuAction::Bridge, None).unwrap();
        chapter.apply_action(&db, MenuAction::Bridge, None).unwrap();
        let head = chapter.current_item().unwrap();
        assert_eq!(head.verse_label(), "1-3");
        assert_eq!(head.text, "v1 v2 v3");
        assert_eq!(chapter.items().len(), 2);
        assert_eq!(db.bridge_get_recs(head.id).unwrap().len(), 2);

        chapter.apply_action(&db, MenuAction::Unbridge, None).unwrap();
        assert_eq!(chapter.current_item().unwrap().verse_label(), "1-2");
        assert_eq!(texts(&chapter), vec!["v1 v2", "v3", "v4"]);

        chapter.apply_action(&db, MenuAction::Unbridge, None).unwrap();
        let head = chapter.current_item().unwrap();
        assert!(!head.is_bridge);
        assert_eq!(head.last_verse_bridge, 0);
        assert_eq!(texts(&chapter), vec!["v1", "v2", "v3", "v4"]);
        assert!(db.bridge_get_recs(head.id).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_action_rejected_without_change() {
        let db = Kdb::open_in_memory().unwrap();
        let mut chapter = open_chapter(&db, 41, 5, 2, false);
        chapter.select_item(&db, 1).unwrap();

        let err = chapter.apply_action(&db, MenuAction::Bridge, None).unwrap_err();
        assert!(matches!(err, KitError::InvalidAction { .. }));
        let err = chapter.apply_action(&db, MenuAction::CreateTitle, None).unwrap_err();
        assert!(matches!(err, KitError::InvalidAction { .. }));
        assert_eq!(chapter.items().len(), 2);
    }

    #[test]
    fn test_title_and_intro_matter() {
        let db = Kdb::open_in_memory().unwrap();
        let mut chapter = open_chapter(&db, 41, 1, 3, false);

        chapter.apply_action(&db, MenuAction::CreateTitle, None).unwrap();
        assert!(chapter.has_title());
        assert_eq!(chapter.current_item().unwrap().item_type, ItemType::Title);

        chapter.apply_action(&db, MenuAction::CreateIntroTitle, None).unwrap();
        assert!(chapter.has_in_title());
        assert_eq!(chapter.current_offset(), 0);

        chapter.apply_action(&db, MenuAction::CreateIntroHeading, None).unwrap();
        assert_eq!(chapter.current_item().unwrap().int_seq, 1);
        chapter.apply_action(&db, MenuAction::CreateIntroPara, None).unwrap();
        assert_eq!(chapter.current_item().unwrap().int_seq, 2);
        assert_eq!(chapter.next_int_seq(), 3);

        assert_eq!(
            types(&chapter),
            vec![
                ItemType::InTitle,
                ItemType::InSubj,
                ItemType::InPara,
                ItemType::Title,
                ItemType::Verse,
                ItemType::Verse,
                ItemType::Verse,
            ]
        );

        chapter.select_item(&db, 0).unwrap();
        chapter.apply_action(&db, MenuAction::DeleteIntroTitle, None).unwrap();
        assert!(!chapter.has_in_title());
        assert_eq!(chapter.current_item().unwrap().item_type, ItemType::InSubj);
    }

    #[test]
    fn test_ascription_create_and_delete() {
        let db = Kdb::open_in_memory().unwrap();
        let mut chapter = open_chapter(&db, PSALMS_BOOK_ID, 1, 6, false);
        chapter.apply_action(&db, MenuAction::CreateAscription, None).unwrap();
        assert_eq!(chapter.num_items(), 7);
        assert_eq!(chapter.current_offset(), 0);

        chapter.apply_action(&db, MenuAction::DeleteAscription, None).unwrap();
        assert_eq!(chapter.num_items(), 6);
        assert_eq!(chapter.current_item().unwrap().verse, 1);

        let rec = db.read_chapters_recs(BIBLE_ID, PSALMS_BOOK_ID).unwrap().remove(0);
        assert_eq!(rec.num_items, 6);
    }

    #[test]
    fn test_ascription_update_has_own_error_number() {
        assert_eq!(pub_update_code(MenuAction::CreateAscription).number(), 124);
        assert_eq!(pub_update_code(MenuAction::DeleteAscription).number(), 129);
        assert_eq!(pub_update_code(MenuAction::Bridge).number(), 129);
    }

    #[test]
    fn test_export_stores_usfm() {
        let db = Kdb::open_in_memory().unwrap();
        let mut chapter = open_chapter(&db, 66, 1, 2, false);
        chapter.save_item_text(&db, 0, "Jude, a servant").unwrap();
        chapter.save_item_text(&db, 1, "Mercy").unwrap();

        let usfm = chapter.export_usfm(&db, "JUD", "Bible").unwrap();
        assert_eq!(usfm, "\\id JUD Bible\n\\c 1\n\\v 1 Jude, a servant\n\\v 2 Mercy");
        assert_eq!(db.get_usfm_text(chapter.id()).unwrap(), Some(usfm));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_unbridge_reverses_bridge(
            texts in proptest::collection::vec("[a-z]{0,6}", 2..8),
            steps in 1usize..7,
        ) {
            let db = Kdb::open_in_memory().unwrap();
            let mut chapter = open_chapter(&db, 1, 1, texts.len() as i64, false);
            for (offset, text) in texts.iter().enumerate() {
                chapter.save_item_text(&db, offset, text).unwrap();
            }
            let steps = steps.min(texts.len() - 1);

            for _ in 0..steps {
                chapter.apply_action(&db, MenuAction::Bridge, None).unwrap();
            }
            prop_assert_eq!(chapter.items().len(), texts.len() - steps);
            prop_assert_eq!(chapter.current_item().unwrap().last_verse(), steps as i64 + 1);

            for _ in 0..steps {
                chapter.apply_action(&db, MenuAction::Unbridge, None).unwrap();
            }
            let restored: Vec<String> = chapter.items().iter().map(|i| i.text.clone()).collect();
            prop_assert_eq!(restored, texts);
            prop_assert!(!chapter.current_item().unwrap().is_bridge);
        }
    }
}
