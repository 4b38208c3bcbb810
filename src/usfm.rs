//! USFM generation for one Chapter

use crate::store::VerseItemRec;
use crate::types::ItemType;

/// USFM text of a chapter whose items are in display order
pub fn chapter_usfm(book_code: &str, bible_name: &str, chapter_num: i64, items: &[VerseItemRec]) -> String {
    let mut usfm = format!("\\id {} {}\n\\c {}", book_code, bible_name, chapter_num);
    for item in items {
        usfm.push('\n');
        push_item(&mut usfm, item);
    }
    usfm
}

fn push_item(usfm: &mut String, item: &VerseItemRec) {
    let marker = match item.item_type {
        ItemType::Verse => {
            usfm.push_str("\\v ");
            usfm.push_str(&item.verse_label());
            usfm.push(' ');
            usfm.push_str(&item.text);
            return;
        }
        ItemType::VerseCont => {
            usfm.push_str(&item.text);
            return;
        }
        ItemType::Para | ItemType::ParaCont => {
            usfm.push_str("\\p");
            return;
        }
        ItemType::Heading => "\\s",
        ItemType::ParlRef => "\\r",
        ItemType::Title => "\\mt",
        ItemType::InTitle => "\\imt",
        ItemType::InSubj => "\\ims",
        ItemType::InPara => "\\ip",
        ItemType::Ascription => "\\d",
    };
    usfm.push_str(marker);
    usfm.push(' ');
    usfm.push_str(&item.text);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(verse: i64, item_type: ItemType, text: &str) -> VerseItemRec {
        VerseItemRec::new(1, verse, item_type, text)
    }

    #[test]
    fn test_header_only_for_empty_chapter() {
        assert_eq!(chapter_usfm("JUD", "Bible", 1, &[]), "\\id JUD Bible\n\\c 1");
    }

    #[test]
    fn test_psalm_with_ascription_and_heading() {
        let items = vec![
            item(1, ItemType::Ascription, "A psalm of David."),
            item(1, ItemType::Heading, "The Lord my shepherd"),
            item(1, ItemType::Para, ""),
            item(1, ItemType::Verse, "The Lord is my shepherd;"),
            item(2, ItemType::Verse, "He makes me lie down."),
        ];
        let usfm = chapter_usfm("PSA", "Kuna Bible", 23, &items);
        assert_eq!(
            usfm,
            "\\id PSA Kuna Bible\n\\c 23\n\\d A psalm of David.\n\\s The Lord my shepherd\n\\p\n\\v 1 The Lord is my shepherd;\n\\v 2 He makes me lie down."
        );
    }

    #[test]
    fn test_bridge_and_verse_continuation() {
        let mut head = item(1, ItemType::Verse, "one two");
        head.is_bridge = true;
        head.last_verse_bridge = 2;
        let items = vec![
            head,
            item(3, ItemType::Verse, "three a"),
            item(3, ItemType::ParaCont, ""),
            item(3, ItemType::VerseCont, "three b"),
        ];
        let usfm = chapter_usfm("MRK", "Bible", 2, &items);
        assert_eq!(
            usfm,
            "\\id MRK Bible\n\\c 2\n\\v 1-2 one two\n\\v 3 three a\n\\p\nthree b"
        );
    }

    #[test]
    fn test_intro_matter_markers() {
        let items = vec![
            item(1, ItemType::InTitle, "Intro"),
            item(1, ItemType::InSubj, "Author").with_int_seq(1),
            item(1, ItemType::InPara, "Written by Mark.").with_int_seq(2),
            item(1, ItemType::Title, "Mark"),
            item(1, ItemType::ParlRef, "(Mt 3.1)"),
        ];
        let usfm = chapter_usfm("MRK", "Bible", 1, &items);
        assert!(usfm.contains("\n\\imt Intro\n\\ims Author\n\\ip Written by Mark.\n\\mt Mark\n\\r (Mt 3.1)"));
    }
}
