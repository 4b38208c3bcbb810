//! Error types for KeyIt
//!
//! Database failures carry a numbered [`ErrorCode`] so that a user can quote
//! it back to the developers. Numbers 100 to 199 are catastrophic and the
//! front end is expected to stop after reporting one.

use crate::store::StoreError;
use std::fmt;
use thiserror::Error;

/// Numbered catalogue of database failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    /// Cannot create kdb.sqlite
    CreateDatabase = 100,
    /// Cannot open kdb.sqlite
    OpenDatabase = 101,
    /// Cannot close kdb.sqlite
    CloseDatabase = 102,
    CreateBiblesTable = 103,
    CreateBooksTable = 104,
    CreateChaptersTable = 105,
    CreateVerseItemsTable = 106,
    CreateBridgeItemsTable = 107,
    CreateBibleRec = 108,
    ReadBibleRec = 109,
    UpdateBibleName = 110,
    UpdateBibleRecsCreated = 111,
    UpdateBibleCurrBook = 112,
    CreateBookRec = 113,
    ReadBookRecs = 114,
    UpdateBookRec = 115,
    CreateChapterRec = 116,
    ReadChapterRecs = 117,
    CreateVerseItemRec = 118,
    ReadVerseItemRecs = 119,
    UpdateChapterNumItems = 120,
    UpdateChapterItemsCreated = 121,
    UpdateChapterGoCurrItem = 122,
    UpdateChapterSetCurrItem = 123,
    UpdateChapterAscription = 124,
    UpdateVerseItemText = 126,
    CreateAscription = 127,
    DeleteAscription = 128,
    UpdateChapterPubItem = 129,
    CreateTitle = 130,
    DeleteTitle = 131,
    CreateParaBefore = 132,
    DeleteParaBefore = 133,
    CreateParaCont = 134,
    DeleteParaCont = 135,
    CreateVerseCont = 136,
    DeleteVerseCont = 137,
    CreateUnbridgedVerse = 138,
    CreateSubjHeading = 139,
    DeleteSubjHeading = 140,
    CreateParallelRef = 141,
    DeleteParallelRef = 142,
    UpdateBridgeHead = 143,
    DeleteBridgedVerse = 144,
    CreateIntroTitle = 145,
    DeleteIntroTitle = 146,
    CreateIntroHeading = 147,
    DeleteIntroHeading = 148,
    CreateIntroPara = 149,
    DeleteIntroPara = 150,
    CreateBridgeRec = 151,
    ReadBridgeRecs = 152,
    DeleteBridgeRec = 153,
    UpdateChapterUsfm = 154,
    /// Unexpected SQLite database error
    Unexpected = 199,
}

impl ErrorCode {
    /// Number to report to the developers
    pub fn number(self) -> u16 {
        self as u16
    }

    /// Short description of what was being attempted
    pub fn description(self) -> &'static str {
        use ErrorCode::*;
        match self {
            CreateDatabase => "cannot create kdb.sqlite",
            OpenDatabase => "cannot open kdb.sqlite",
            CloseDatabase => "cannot close kdb.sqlite",
            CreateBiblesTable => "error creating Bibles table",
            CreateBooksTable => "error creating Books table",
            CreateChaptersTable => "error creating Chapters table",
            CreateVerseItemsTable => "error creating VerseItems table",
            CreateBridgeItemsTable => "error creating BridgeItems table",
            CreateBibleRec => "error creating Bible record",
            ReadBibleRec => "error reading Bible record",
            UpdateBibleName => "error updating name of Bible",
            UpdateBibleRecsCreated => "error updating records created flag in Bible record",
            UpdateBibleCurrBook => "error updating current Book in Bible record",
            CreateBookRec => "error creating Book record",
            ReadBookRecs => "error reading Book records",
            UpdateBookRec => "error updating Book record",
            CreateChapterRec => "error creating Chapter record",
            ReadChapterRecs => "error reading Chapter records",
            CreateVerseItemRec => "error creating VerseItem record",
            ReadVerseItemRecs => "error reading VerseItem records",
            UpdateChapterNumItems => "error updating numItems in Chapter record",
            UpdateChapterItemsCreated => "error updating items created flag in Chapter record",
            UpdateChapterGoCurrItem => "error updating current item on going to it",
            UpdateChapterSetCurrItem => "error updating current item on selecting it",
            UpdateChapterAscription => "error updating Chapter record for new Ascription",
            UpdateVerseItemText => "error updating text of VerseItem record",
            CreateAscription => "error creating Ascription item",
            DeleteAscription => "error deleting Ascription item",
            UpdateChapterPubItem => "error updating Chapter record for publication item change",
            CreateTitle => "error creating Title item",
            DeleteTitle => "error deleting Title item",
            CreateParaBefore => "error creating Paragraph before item",
            DeleteParaBefore => "error deleting Paragraph before item",
            CreateParaCont => "error creating ParaCont item",
            DeleteParaCont => "error deleting ParaCont item",
            CreateVerseCont => "error creating VerseCont item",
            DeleteVerseCont => "error deleting VerseCont item",
            CreateUnbridgedVerse => "error creating VerseItem during unbridge",
            CreateSubjHeading => "error creating Heading item",
            DeleteSubjHeading => "error deleting Heading item",
            CreateParallelRef => "error creating Parallel Ref item",
            DeleteParallelRef => "error deleting Parallel Ref item",
            UpdateBridgeHead => "error updating VerseItem for bridging or unbridging",
            DeleteBridgedVerse => "error deleting VerseItem for bridging",
            CreateIntroTitle => "error creating Intro Title item",
            DeleteIntroTitle => "error deleting Intro Title item",
            CreateIntroHeading => "error creating Intro Heading item",
            DeleteIntroHeading => "error deleting Intro Heading item",
            CreateIntroPara => "error creating Intro Paragraph item",
            DeleteIntroPara => "error deleting Intro Paragraph item",
            CreateBridgeRec => "error creating BridgeItem record",
            ReadBridgeRecs => "error reading BridgeItem records",
            DeleteBridgeRec => "error deleting BridgeItem record",
            UpdateChapterUsfm => "error updating USFM text in Chapter record",
            Unexpected => "unexpected SQLite database error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.description())
    }
}

/// Main error type for KeyIt
#[derive(Error, Debug)]
pub enum KitError {
    #[error("Database error {code}: {source}")]
    Database {
        code: ErrorCode,
        #[source]
        source: StoreError,
    },

    #[error("Book specification error: {0}")]
    BookSpec(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No current Book has been selected")]
    NoCurrentBook,

    #[error("No current Chapter has been selected")]
    NoCurrentChapter,

    #[error("Action {action} is not available for a {item_type} item")]
    InvalidAction { action: String, item_type: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl KitError {
    /// Wrap a store failure with the number that identifies where it happened
    pub fn database(code: ErrorCode, source: StoreError) -> Self {
        KitError::Database { code, source }
    }

    /// Reportable error number, if this is a numbered database failure
    pub fn code(&self) -> Option<u16> {
        match self {
            KitError::Database { code, .. } => Some(code.number()),
            _ => None,
        }
    }
}

/// `map_err` adapter tagging a store failure with `code`
pub(crate) fn coded(code: ErrorCode) -> impl Fn(StoreError) -> KitError {
    move |e| KitError::database(code, e)
}

/// Result type alias for KeyIt operations
pub type Result<T> = std::result::Result<T, KitError>;
