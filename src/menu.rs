//! Popover menus for VerseItems
//!
//! A [`VIMenu`] lists only the publication-item actions that are valid for
//! the current VerseItem, given what already exists in the chapter.

use crate::asset_names::ImageAsset;
use crate::store::VerseItemRec;
use crate::types::{BookId, ItemType, PSALMS_BOOK_ID};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// An action that can be chosen from a popover menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MenuAction {
    CreateAscription,
    DeleteAscription,
    CreateTitle,
    DeleteTitle,
    CreateParaBefore,
    DeletePara,
    CreateParaCont,
    DeleteParaCont,
    DeleteVerseCont,
    CreateHeadingBefore,
    CreateHeadingAfter,
    DeleteHeading,
    CreateParallelRef,
    DeleteParallelRef,
    Bridge,
    Unbridge,
    CreateIntroTitle,
    DeleteIntroTitle,
    CreateIntroHeading,
    DeleteIntroHeading,
    CreateIntroPara,
    DeleteIntroPara,
}

impl MenuAction {
    pub const ALL: [MenuAction; 22] = [
        MenuAction::CreateAscription,
        MenuAction::DeleteAscription,
        MenuAction::CreateTitle,
        MenuAction::DeleteTitle,
        MenuAction::CreateParaBefore,
        MenuAction::DeletePara,
        MenuAction::CreateParaCont,
        MenuAction::DeleteParaCont,
        MenuAction::DeleteVerseCont,
        MenuAction::CreateHeadingBefore,
        MenuAction::CreateHeadingAfter,
        MenuAction::DeleteHeading,
        MenuAction::CreateParallelRef,
        MenuAction::DeleteParallelRef,
        MenuAction::Bridge,
        MenuAction::Unbridge,
        MenuAction::CreateIntroTitle,
        MenuAction::DeleteIntroTitle,
        MenuAction::CreateIntroHeading,
        MenuAction::DeleteIntroHeading,
        MenuAction::CreateIntroPara,
        MenuAction::DeleteIntroPara,
    ];

    /// Short action code
    pub fn code(self) -> &'static str {
        match self {
            MenuAction::CreateAscription => "crAsc",
            MenuAction::DeleteAscription => "delAsc",
            MenuAction::CreateTitle => "crTitle",
            MenuAction::DeleteTitle => "delTitle",
            MenuAction::CreateParaBefore => "crParaBef",
            MenuAction::DeletePara => "delPara",
            MenuAction::CreateParaCont => "crParaCont",
            MenuAction::DeleteParaCont => "delPCon",
            MenuAction::DeleteVerseCont => "delVCon",
            MenuAction::CreateHeadingBefore => "crHdBef",
            MenuAction::CreateHeadingAfter => "crHdAft",
            MenuAction::DeleteHeading => "delHead",
            MenuAction::CreateParallelRef => "crPalRef",
            MenuAction::DeleteParallelRef => "delPalRef",
            MenuAction::Bridge => "brid",
            MenuAction::Unbridge => "unBrid",
            MenuAction::CreateIntroTitle => "crInTit",
            MenuAction::DeleteIntroTitle => "delInTit",
            MenuAction::CreateIntroHeading => "crInHed",
            MenuAction::DeleteIntroHeading => "delInHed",
            MenuAction::CreateIntroPara => "crInPar",
            MenuAction::DeleteIntroPara => "delInPar",
        }
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MenuAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.code() == s)
            .ok_or_else(|| format!("unknown action code '{}'", s))
    }
}

/// Highlight shown beside a menu label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MenuIcon {
    Create,
    Delete,
    Bridge,
    Unbridge,
}

impl MenuIcon {
    pub fn letter(self) -> char {
        match self {
            MenuIcon::Create => 'C',
            MenuIcon::Delete => 'D',
            MenuIcon::Bridge => 'B',
            MenuIcon::Unbridge => 'U',
        }
    }

    /// Bundled image drawn for this icon
    pub fn asset(self) -> ImageAsset {
        match self {
            MenuIcon::Create => ImageAsset::CreatePubItem,
            MenuIcon::Delete => ImageAsset::DeletePubItem,
            MenuIcon::Bridge => ImageAsset::BridgePubItem,
            MenuIcon::Unbridge => ImageAsset::UnbridgePubItem,
        }
    }
}

/// One row of a popover menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub action: MenuAction,
    pub icon: MenuIcon,
}

impl MenuItem {
    fn new(label: &'static str, action: MenuAction, icon: MenuIcon) -> Self {
        Self { label, action, icon }
    }
}

/// What the menu rules need to know about the chapter
#[derive(Debug, Clone, Copy)]
pub struct MenuContext<'a> {
    pub book_id: BookId,
    pub chapter_num: i64,
    pub num_verses: i64,
    pub has_ascription: bool,
    pub has_title: bool,
    pub has_in_title: bool,
    pub items: &'a [VerseItemRec],
}

/// Popover menu for one VerseItem
#[derive(Debug, Clone, Serialize)]
pub struct VIMenu {
    pub item_type: ItemType,
    pub items: Vec<MenuItem>,
}

impl VIMenu {
    /// Build the menu for the item at `offset`, `None` if there is no such item
    pub fn build(ctx: &MenuContext<'_>, offset: usize) -> Option<Self> {
        use MenuAction::*;
        use MenuIcon::{Create, Delete};

        let item = ctx.items.get(offset)?;
        let next = ctx.items.get(offset + 1);
        let first_verse_of_book = item.verse == 1 && ctx.chapter_num == 1;
        let can_intro_title = first_verse_of_book && !ctx.has_in_title;
        let can_title = first_verse_of_book && !ctx.has_title;

        let mut rows = Vec::new();
        match item.item_type {
            ItemType::Ascription => {
                rows.push(MenuItem::new("Ascription", DeleteAscription, Delete));
            }
            ItemType::Title => {
                if can_intro_title {
                    rows.push(MenuItem::new("Intro Title", CreateIntroTitle, Create));
                }
                rows.push(MenuItem::new("Heading After", CreateHeadingAfter, Create));
                rows.push(MenuItem::new("Title", DeleteTitle, Delete));
            }
            ItemType::InTitle => {
                rows.push(MenuItem::new("Intro Heading", CreateIntroHeading, Create));
                rows.push(MenuItem::new("Intro Paragraph", CreateIntroPara, Create));
                rows.push(MenuItem::new("Intro Title", DeleteIntroTitle, Delete));
            }
            ItemType::InSubj => {
                if can_intro_title {
                    rows.push(MenuItem::new("Intro Title", CreateIntroTitle, Create));
                }
                rows.push(MenuItem::new("Intro Paragraph", CreateIntroPara, Create));
                rows.push(MenuItem::new("Intro Subject", DeleteIntroHeading, Delete));
            }
            ItemType::InPara => {
                rows.push(MenuItem::new("Intro Paragraph", CreateIntroPara, Create));
                rows.push(MenuItem::new("Intro Heading", CreateIntroHeading, Create));
                if can_title {
                    rows.push(MenuItem::new("Title", CreateTitle, Create));
                }
                rows.push(MenuItem::new("Intro Paragraph", DeleteIntroPara, Delete));
            }
            ItemType::Heading => {
                if can_title {
                    rows.push(MenuItem::new("Title", CreateTitle, Create));
                }
                rows.push(MenuItem::new("Parallel Ref", CreateParallelRef, Create));
                rows.push(MenuItem::new("Heading", DeleteHeading, Delete));
            }
            ItemType::Para => {
                rows.push(MenuItem::new("Heading", CreateHeadingBefore, Create));
                rows.push(MenuItem::new("Paragraph", DeletePara, Delete));
            }
            ItemType::ParaCont => {
                rows.push(MenuItem::new("Paragraph", DeleteParaCont, Delete));
            }
            ItemType::VerseCont => {
                rows.push(MenuItem::new("Paragraph", DeleteVerseCont, Delete));
            }
            ItemType::ParlRef => {
                rows.push(MenuItem::new("Parallel Ref", DeleteParallelRef, Delete));
            }
            ItemType::Verse => {
                if ctx.book_id == PSALMS_BOOK_ID && item.verse == 1 && !ctx.has_ascription {
                    rows.push(MenuItem::new("Ascription", CreateAscription, Create));
                }
                if can_intro_title {
                    rows.push(MenuItem::new("Intro Title", CreateIntroTitle, Create));
                }
                if can_title {
                    rows.push(MenuItem::new("Title", CreateTitle, Create));
                }
                rows.push(MenuItem::new("Heading Before", CreateHeadingBefore, Create));
                rows.push(MenuItem::new("Paragraph Before", CreateParaBefore, Create));

                // At most one paragraph break inside a verse
                let next_is_para_cont = next.is_some_and(|n| n.item_type == ItemType::ParaCont);
                if !item.is_bridge && !next_is_para_cont {
                    rows.push(MenuItem::new("Paragraph In", CreateParaCont, Create));
                }
                rows.push(MenuItem::new("Parallel Ref", CreateParallelRef, Create));

                // A verse is never bridged with a following bridge
                let next_is_plain_verse =
                    next.is_some_and(|n| n.item_type == ItemType::Verse && !n.is_bridge);
                if item.last_verse() < ctx.num_verses && next_is_plain_verse {
                    rows.push(MenuItem::new("Bridge Next", Bridge, MenuIcon::Bridge));
                }
                if item.is_bridge {
                    rows.push(MenuItem::new("Unbridge", Unbridge, MenuIcon::Unbridge));
                }
            }
        }

        Some(Self {
            item_type: item.item_type,
            items: rows,
        })
    }

    pub fn offers(&self, action: MenuAction) -> bool {
        self.items.iter().any(|i| i.action == action)
    }

    pub fn actions(&self) -> Vec<MenuAction> {
        self.items.iter().map(|i| i.action).collect()
    }
}
