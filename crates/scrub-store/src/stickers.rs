//! Sticker pack cache and the set of installed packs.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use scrub_shared::sticker::{
    ItemCollectionId, ItemCollectionNamespace, StickerPackCollectionInfo, StickerPackItem,
    StickerPackReference,
};

use crate::database::Transaction;
use crate::error::Result;

impl Transaction<'_> {
    pub fn get_cached_sticker_pack(
        &self,
        reference: &StickerPackReference,
    ) -> Result<Option<(StickerPackCollectionInfo, Vec<StickerPackItem>)>> {
        let row: Option<(String, String)> = self
            .conn()
            .query_row(
                "SELECT info, items FROM sticker_pack_cache WHERE reference_key = ?1",
                params![reference.cache_key()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((info, items)) => Ok(Some((
                serde_json::from_str(&info)?,
                serde_json::from_str(&items)?,
            ))),
            None => Ok(None),
        }
    }

    pub fn put_cached_sticker_pack(
        &self,
        reference: &StickerPackReference,
        info: &StickerPackCollectionInfo,
        items: &[StickerPackItem],
    ) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO sticker_pack_cache (reference_key, info, items, cached_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                reference.cache_key(),
                serde_json::to_string(info)?,
                serde_json::to_string(items)?,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn install_sticker_pack(&self, id: ItemCollectionId) -> Result<()> {
        self.conn().execute(
            "INSERT OR IGNORE INTO installed_sticker_packs (collection_namespace, collection_id)
             VALUES (?1, ?2)",
            params![namespace_code(id.namespace), id.id],
        )?;
        Ok(())
    }

    pub fn is_sticker_pack_installed(&self, id: ItemCollectionId) -> Result<bool> {
        let found: Option<i64> = self
            .conn()
            .query_row(
                "SELECT collection_id FROM installed_sticker_packs
                 WHERE collection_namespace = ?1 AND collection_id = ?2",
                params![namespace_code(id.namespace), id.id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

fn namespace_code(namespace: ItemCollectionNamespace) -> i32 {
    match namespace {
        ItemCollectionNamespace::CloudStickerPacks => 0,
        ItemCollectionNamespace::CloudMaskPacks => 1,
    }
}

#[cfg(test)]
mod tests {
    use scrub_shared::sticker::{ItemCollectionItemIndex, StickerFile};

    use super::*;
    use crate::Database;

    fn info(namespace: ItemCollectionNamespace) -> StickerPackCollectionInfo {
        StickerPackCollectionInfo {
            id: ItemCollectionId { namespace, id: 5 },
            access_hash: 6,
            title: "Dogs".into(),
            short_name: "dogs".into(),
            hash: 1,
            count: 1,
        }
    }

    #[test]
    fn cache_by_reference() {
        let mut db = Database::open_in_memory().unwrap();
        let reference = StickerPackReference::Name("Dogs".into());
        let items = vec![StickerPackItem {
            index: ItemCollectionItemIndex { index: 0, id: 900 },
            file: StickerFile {
                file_id: 900,
                access_hash: 1,
                mime_type: "image/webp".into(),
                size: 2048,
            },
            index_keys: vec!["🐶".as_bytes().to_vec()],
        }];
        let pack_info = info(ItemCollectionNamespace::CloudStickerPacks);

        db.transaction(|tx| tx.put_cached_sticker_pack(&reference, &pack_info, &items))
            .unwrap();

        let lookup = StickerPackReference::Name("dogs".into());
        let cached = db
            .transaction(|tx| tx.get_cached_sticker_pack(&lookup))
            .unwrap();
        assert_eq!(cached, Some((pack_info, items)));
    }

    #[test]
    fn installed_is_per_namespace() {
        let mut db = Database::open_in_memory().unwrap();
        let stickers = info(ItemCollectionNamespace::CloudStickerPacks).id;
        let masks = info(ItemCollectionNamespace::CloudMaskPacks).id;

        db.transaction(|tx| tx.install_sticker_pack(stickers)).unwrap();

        assert!(db.transaction(|tx| tx.is_sticker_pack_installed(stickers)).unwrap());
        assert!(!db.transaction(|tx| tx.is_sticker_pack_installed(masks)).unwrap());
    }
}
