//! Integration tests for keyit

use keyit::prelude::*;
use tempfile::tempdir;

fn open(path: &std::path::Path) -> (Kdb, BooksSpec, Bible) {
    let kdb = Kdb::open(path).unwrap();
    let spec = BooksSpec::embedded().unwrap();
    let mut bible = Bible::open(&kdb, &spec).unwrap();
    bible.go_current_book(&kdb, &spec).unwrap();
    (kdb, spec, bible)
}

#[test]
fn test_keyboard_mark_one_across_sessions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(Kdb::FILE_NAME);

    // First session: set up, choose Mark 1, keyboard and structure verses 1 to 3
    {
        let (kdb, spec, mut bible) = open(&path);
        assert!(bible.current_book().is_err());
        bible.rename(&kdb, "Test Bible").unwrap();
        bible.setup_current_book(&kdb, &spec, 42).unwrap();
        bible.setup_current_chapter(&kdb, 0).unwrap();

        let book = bible.current_book_mut().unwrap();
        assert_eq!(book.code(), "MRK");
        book.save_item_text(&kdb, 0, "The beginning of the gospel.").unwrap();
        book.save_item_text(&kdb, 1, "As it is written,").unwrap();
        book.save_item_text(&kdb, 2, "The voice of one crying.").unwrap();

        book.apply_action(&kdb, MenuAction::CreateTitle, None).unwrap();
        book.save_item_text(&kdb, 0, "Mark").unwrap();

        book.select_item(&kdb, 1).unwrap();
        book.apply_action(&kdb, MenuAction::CreateHeadingBefore, None).unwrap();
        let offset = book.current_chapter().unwrap().current_offset();
        book.save_item_text(&kdb, offset, "John the Baptist").unwrap();

        book.select_item(&kdb, 3).unwrap();
        assert_eq!(book.current_chapter().unwrap().current_item().unwrap().verse, 2);
        book.apply_action(&kdb, MenuAction::Bridge, None).unwrap();
    }

    // Second session: everything is restored from kdb.sqlite
    let (kdb, _spec, bible) = open(&path);
    assert_eq!(bible.name(), "Test Bible");
    let book = bible.current_book().unwrap();
    assert_eq!(book.code(), "MRK");

    let chapter = book.current_chapter().unwrap();
    assert_eq!(chapter.number(), 1);
    assert_eq!(chapter.num_items(), 45 + 2 - 1);
    let current = chapter.current_item().unwrap();
    assert_eq!(current.verse_label(), "2-3");
    assert_eq!(current.text, "As it is written, The voice of one crying.");

    let usfm = bible.export_current_chapter(&kdb).unwrap();
    assert!(usfm.starts_with(
        "\\id MRK Test Bible\n\\c 1\n\\mt Mark\n\\s John the Baptist\n\\v 1 The beginning of the gospel.\n\\v 2-3 As it is written, The voice of one crying.\n\\v 4 "
    ));
    assert_eq!(kdb.get_usfm_text(chapter.id()).unwrap(), Some(usfm));
}

#[test]
fn test_books_created_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(Kdb::FILE_NAME);
    {
        let (_kdb, _spec, bible) = open(&path);
        assert_eq!(bible.books().len(), 66);
    }
    let (kdb, _spec, bible) = open(&path);
    assert_eq!(bible.books().len(), 66);
    assert_eq!(kdb.read_books_recs().unwrap().len(), 66);
}

#[test]
fn test_switching_books_keeps_each_books_place() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(Kdb::FILE_NAME);
    let (kdb, spec, mut bible) = open(&path);

    bible.setup_current_book(&kdb, &spec, 1).unwrap();
    bible.setup_current_chapter(&kdb, 2).unwrap();
    bible.setup_current_book(&kdb, &spec, PSALMS_BOOK_ID).unwrap();
    assert!(bible.current_book().unwrap().current_chapter().is_err());
    bible.setup_current_chapter(&kdb, 50).unwrap();
    assert_eq!(bible.current_book().unwrap().chapter_name(), "psalm");

    bible.setup_current_book(&kdb, &spec, 1).unwrap();
    let chapter = bible.current_book().unwrap().current_chapter().unwrap();
    assert_eq!(chapter.number(), 3);
    assert_eq!(bible.books()[0].current_chapter_num, 3);
    assert_eq!(bible.books()[18].current_chapter_num, 51);
}

#[test]
fn test_psalm_ascription_flow() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(Kdb::FILE_NAME);
    let (kdb, spec, mut bible) = open(&path);

    bible.setup_current_book(&kdb, &spec, PSALMS_BOOK_ID).unwrap();
    bible.setup_current_chapter(&kdb, 2).unwrap();
    let book = bible.current_book_mut().unwrap();
    let chapter = book.current_chapter().unwrap();
    assert_eq!(chapter.items()[0].item_type, ItemType::Ascription);
    assert_eq!(chapter.menu().unwrap().actions(), vec![MenuAction::DeleteAscription]);

    book.apply_action(&kdb, MenuAction::DeleteAscription, None).unwrap();
    let menu = book.current_chapter().unwrap().menu().unwrap();
    assert!(menu.offers(MenuAction::CreateAscription));
    assert_eq!(menu.items[0].icon.asset(), ImageAsset::CreatePubItem);

    book.apply_action(&kdb, MenuAction::CreateAscription, None).unwrap();
    book.save_item_text(&kdb, 0, "A Psalm of David.").unwrap();
    let usfm = bible.export_current_chapter(&kdb).unwrap();
    assert!(usfm.starts_with("\\id PSA Bible\n\\c 3\n\\d A Psalm of David.\n\\v 1 "));
}

#[test]
fn test_paragraph_in_verse_flow() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(Kdb::FILE_NAME);
    let (kdb, spec, mut bible) = open(&path);

    bible.setup_current_book(&kdb, &spec, 58).unwrap();
    bible.setup_current_chapter(&kdb, 0).unwrap();
    let book = bible.current_book_mut().unwrap();
    book.select_item(&kdb, 4).unwrap();
    book.save_item_text(&kdb, 4, "Hearing of thy love and faith").unwrap();
    book.apply_action(&kdb, MenuAction::CreateParaCont, Some(10)).unwrap();

    let chapter = book.current_chapter().unwrap();
    assert_eq!(chapter.current_item().unwrap().item_type, ItemType::VerseCont);
    let menu = chapter.menu().unwrap();
    assert_eq!(menu.actions(), vec![MenuAction::DeleteVerseCont]);

    let usfm = bible.export_current_chapter(&kdb).unwrap();
    assert!(usfm.contains("\n\\v 5 Hearing of\n\\p\n thy love and faith\n\\v 6 "));
}
