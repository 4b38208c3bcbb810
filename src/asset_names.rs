//! Names of the image resources bundled with the apps
//!
//! Each constant is the exact name of an asset catalog entry. Front ends
//! look the image up by this name in their own asset store. There are two
//! catalogs, one per app target, and a name is unique within its catalog.

use serde::Serialize;
use std::fmt;

pub const BRIDGE_PUB_ITEM: &str = "BridgePubItem";
pub const CREATE_PUB_ITEM: &str = "CreatePubItem";
pub const DELETE_PUB_ITEM: &str = "DeletePubItem";
pub const KIT_LOGO: &str = "KIT Logo";
pub const UNBRIDGE_PUB_ITEM: &str = "UnbridgePubItem";

pub const APP_LOGO: &str = "AppLogo";
pub const KIT_LOGO_D: &str = "KITLogoD";

/// App target owning an asset catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Target {
    /// Keyboarding app (popover menu icons)
    Kitios,
    /// Setup app
    Kitsui,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Kitios, Target::Kitsui];

    pub fn name(self) -> &'static str {
        match self {
            Target::Kitios => "kitios",
            Target::Kitsui => "kitsui",
        }
    }

    /// Assets declared in this target's catalog
    pub fn manifest(self) -> impl Iterator<Item = ImageAsset> {
        ImageAsset::ALL.into_iter().filter(move |a| a.target() == self)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A bundled image resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImageAsset {
    BridgePubItem,
    CreatePubItem,
    DeletePubItem,
    KitLogo,
    UnbridgePubItem,
    AppLogo,
    KitLogoD,
}

impl ImageAsset {
    /// Both catalogs, kitios first
    pub const ALL: [ImageAsset; 7] = [
        ImageAsset::BridgePubItem,
        ImageAsset::CreatePubItem,
        ImageAsset::DeletePubItem,
        ImageAsset::KitLogo,
        ImageAsset::UnbridgePubItem,
        ImageAsset::AppLogo,
        ImageAsset::KitLogoD,
    ];

    /// Catalog name of the resource
    pub const fn name(self) -> &'static str {
        match self {
            ImageAsset::BridgePubItem => BRIDGE_PUB_ITEM,
            ImageAsset::CreatePubItem => CREATE_PUB_ITEM,
            ImageAsset::DeletePubItem => DELETE_PUB_ITEM,
            ImageAsset::KitLogo => KIT_LOGO,
            ImageAsset::UnbridgePubItem => UNBRIDGE_PUB_ITEM,
            ImageAsset::AppLogo => APP_LOGO,
            ImageAsset::KitLogoD => KIT_LOGO_D,
        }
    }

    pub const fn target(self) -> Target {
        match self {
            ImageAsset::AppLogo | ImageAsset::KitLogoD => Target::Kitsui,
            _ => Target::Kitios,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }
}

impl fmt::Display for ImageAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
