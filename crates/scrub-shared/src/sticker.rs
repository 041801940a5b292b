//! Sticker pack descriptors shared by the network layer and the local cache.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ItemCollectionNamespace {
    CloudStickerPacks,
    CloudMaskPacks,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ItemCollectionId {
    pub namespace: ItemCollectionNamespace,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StickerPackCollectionInfo {
    pub id: ItemCollectionId,
    pub access_hash: i64,
    pub title: String,
    pub short_name: String,
    pub hash: i32,
    pub count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StickerPackReference {
    Id { id: i64, access_hash: i64 },
    Name(String),
}

impl StickerPackReference {
    /// Stable key under which a fetched pack is cached.
    pub fn cache_key(&self) -> String {
        match self {
            Self::Id { id, access_hash } => format!("id:{id}:{access_hash}"),
            // Short names are case-insensitive on the server.
            Self::Name(name) => format!("name:{}", name.to_lowercase()),
        }
    }
}

impl From<&StickerPackCollectionInfo> for StickerPackReference {
    fn from(info: &StickerPackCollectionInfo) -> Self {
        Self::Id {
            id: info.id.id,
            access_hash: info.access_hash,
        }
    }
}

/// A sticker document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StickerFile {
    pub file_id: i64,
    pub access_hash: i64,
    pub mime_type: String,
    pub size: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemCollectionItemIndex {
    pub index: i32,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StickerPackItem {
    pub index: ItemCollectionItemIndex,
    pub file: StickerFile,
    /// Emoticons (UTF-8 bytes) this sticker is listed under.
    pub index_keys: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedStickerPack {
    Fetching,
    None,
    Result {
        info: StickerPackCollectionInfo,
        items: Vec<StickerPackItem>,
        installed: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_from_info_and_keys() {
        let info = StickerPackCollectionInfo {
            id: ItemCollectionId {
                namespace: ItemCollectionNamespace::CloudStickerPacks,
                id: 77,
            },
            access_hash: 1234,
            title: "Cats".into(),
            short_name: "Cats".into(),
            hash: 0,
            count: 3,
        };
        let reference = StickerPackReference::from(&info);
        assert_eq!(
            reference,
            StickerPackReference::Id {
                id: 77,
                access_hash: 1234
            }
        );
        assert_eq!(reference.cache_key(), "id:77:1234");
        assert_eq!(
            StickerPackReference::Name("Cats".into()).cache_key(),
            StickerPackReference::Name("cats".into()).cache_key()
        );
    }
}
