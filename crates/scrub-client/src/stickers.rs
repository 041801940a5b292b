//! Read-through loading of sticker packs.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use scrub_net::api::ApiStickerSet;
use scrub_net::{ApiRequest, ApiResponse, InputStickerSet, Network};
use scrub_shared::sticker::{
    ItemCollectionId, ItemCollectionItemIndex, ItemCollectionNamespace, LoadedStickerPack,
    StickerFile, StickerPackCollectionInfo, StickerPackItem, StickerPackReference,
};
use tracing::{debug, warn};

use crate::client::SharedDatabase;

enum LoadStep {
    Lookup,
    Fetch,
    Finished,
}

/// Stream the state of a sticker pack.
///
/// A cached pack yields a single `Result`.  Otherwise the stream yields
/// `Fetching`, then either `Result` (after caching the pack) or `None` if the
/// server could not provide it.
pub fn loaded_sticker_pack(
    db: SharedDatabase,
    network: Arc<dyn Network>,
    reference: StickerPackReference,
) -> BoxStream<'static, LoadedStickerPack> {
    stream::unfold(LoadStep::Lookup, move |step| {
        let db = db.clone();
        let network = network.clone();
        let reference = reference.clone();
        async move {
            match step {
                LoadStep::Lookup => match cached_sticker_pack(&db, &reference).await {
                    Some(pack) => Some((pack, LoadStep::Finished)),
                    None => Some((LoadedStickerPack::Fetching, LoadStep::Fetch)),
                },
                LoadStep::Fetch => {
                    let pack = fetch_sticker_pack(&db, network.as_ref(), &reference).await;
                    Some((pack, LoadStep::Finished))
                }
                LoadStep::Finished => None,
            }
        }
    })
    .boxed()
}

async fn cached_sticker_pack(
    db: &SharedDatabase,
    reference: &StickerPackReference,
) -> Option<LoadedStickerPack> {
    let mut guard = db.lock().await;
    let cached = guard.transaction(|tx| {
        let Some((info, items)) = tx.get_cached_sticker_pack(reference)? else {
            return Ok(None);
        };
        let installed = tx.is_sticker_pack_installed(info.id)?;
        Ok::<_, scrub_store::StoreError>(Some(LoadedStickerPack::Result {
            info,
            items,
            installed,
        }))
    });

    match cached {
        Ok(pack) => pack,
        Err(e) => {
            warn!(reference = %reference.cache_key(), error = %e, "Sticker cache lookup failed");
            None
        }
    }
}

async fn fetch_sticker_pack(
    db: &SharedDatabase,
    network: &dyn Network,
    reference: &StickerPackReference,
) -> LoadedStickerPack {
    let request = ApiRequest::GetStickerSet {
        stickerset: InputStickerSet::from(reference),
    };
    let set = match network.request(request).await {
        Ok(Some(ApiResponse::StickerSet(set))) => set,
        Ok(_) => {
            debug!(reference = %reference.cache_key(), "Sticker set not available");
            return LoadedStickerPack::None;
        }
        Err(e) => {
            warn!(reference = %reference.cache_key(), error = %e, "Failed to fetch sticker set");
            return LoadedStickerPack::None;
        }
    };

    let (info, items) = sticker_pack_from_api(set);

    let mut guard = db.lock().await;
    let installed = guard.transaction(|tx| {
        tx.put_cached_sticker_pack(reference, &info, &items)?;
        tx.is_sticker_pack_installed(info.id)
    });
    let installed = match installed {
        Ok(installed) => installed,
        Err(e) => {
            warn!(reference = %reference.cache_key(), error = %e, "Failed to cache sticker pack");
            false
        }
    };

    LoadedStickerPack::Result {
        info,
        items,
        installed,
    }
}

fn sticker_pack_from_api(set: ApiStickerSet) -> (StickerPackCollectionInfo, Vec<StickerPackItem>) {
    let namespace = if set.set.is_masks() {
        ItemCollectionNamespace::CloudMaskPacks
    } else {
        ItemCollectionNamespace::CloudStickerPacks
    };
    let info = StickerPackCollectionInfo {
        id: ItemCollectionId {
            namespace,
            id: set.set.id,
        },
        access_hash: set.set.access_hash,
        title: set.set.title,
        short_name: set.set.short_name,
        hash: set.set.hash,
        count: set.set.count,
    };

    let mut index_keys_by_file: HashMap<i64, Vec<Vec<u8>>> = HashMap::new();
    for pack in &set.packs {
        let key = pack.emoticon.as_bytes().to_vec();
        for file_id in &pack.documents {
            index_keys_by_file
                .entry(*file_id)
                .or_default()
                .push(key.clone());
        }
    }

    let mut items = Vec::with_capacity(set.documents.len());
    for document in set.documents {
        let index_keys = index_keys_by_file
            .get(&document.id)
            .cloned()
            .unwrap_or_default();
        items.push(StickerPackItem {
            index: ItemCollectionItemIndex {
                index: items.len() as i32,
                id: document.id,
            },
            file: StickerFile {
                file_id: document.id,
                access_hash: document.access_hash,
                mime_type: document.mime_type,
                size: document.size,
            },
            index_keys,
        });
    }

    (info, items)
}

#[cfg(test)]
mod tests {
    use scrub_net::api::{ApiDocument, ApiStickerPack, ApiStickerSetInfo};
    use scrub_net::NetError;
    use scrub_store::Database;
    use tokio::sync::Mutex;

    use super::*;
    use crate::testing::ScriptedNetwork;

    fn api_set(flags: i32) -> ApiStickerSet {
        let document = |id| ApiDocument {
            id,
            access_hash: id * 10,
            mime_type: "image/webp".into(),
            size: 512,
        };
        ApiStickerSet {
            set: ApiStickerSetInfo {
                flags,
                id: 31,
                access_hash: 32,
                title: "Animals".into(),
                short_name: "animals".into(),
                count: 2,
                hash: 7,
            },
            packs: vec![
                ApiStickerPack {
                    emoticon: "🐱".into(),
                    documents: vec![1],
                },
                ApiStickerPack {
                    emoticon: "😺".into(),
                    documents: vec![1, 2],
                },
            ],
            documents: vec![document(1), document(2)],
        }
    }

    fn shared_db() -> SharedDatabase {
        Arc::new(Mutex::new(Database::open_in_memory().unwrap()))
    }

    #[test]
    fn api_set_maps_keys_and_namespace() {
        let (info, items) = sticker_pack_from_api(api_set(0));
        assert_eq!(info.id.namespace, ItemCollectionNamespace::CloudStickerPacks);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].index.index, 0);
        assert_eq!(items[1].index.index, 1);
        assert_eq!(
            items[0].index_keys,
            vec!["🐱".as_bytes().to_vec(), "😺".as_bytes().to_vec()]
        );
        assert_eq!(items[1].index_keys, vec!["😺".as_bytes().to_vec()]);

        let (masks, _) = sticker_pack_from_api(api_set(1 << 3));
        assert_eq!(masks.id.namespace, ItemCollectionNamespace::CloudMaskPacks);
    }

    #[test]
    fn repeated_document_keeps_its_keys() {
        let mut set = api_set(0);
        set.documents.push(set.documents[1].clone());

        let (_, items) = sticker_pack_from_api(set);

        assert_eq!(items.len(), 3);
        assert_eq!(items[2].index.index, 2);
        assert_eq!(items[2].index_keys, items[1].index_keys);
        assert_eq!(items[2].index_keys, vec!["😺".as_bytes().to_vec()]);
    }

    #[tokio::test]
    async fn miss_fetches_then_hit_reads_cache() {
        let db = shared_db();
        let network: Arc<ScriptedNetwork> = Arc::new(ScriptedNetwork::new(vec![Ok(Some(
            ApiResponse::StickerSet(api_set(0)),
        ))]));
        let reference = StickerPackReference::Name("Animals".into());

        let first: Vec<LoadedStickerPack> =
            loaded_sticker_pack(db.clone(), network.clone(), reference.clone())
                .collect()
                .await;
        assert_eq!(first.len(), 2);
        assert_eq!(first[0], LoadedStickerPack::Fetching);
        assert!(matches!(
            first[1],
            LoadedStickerPack::Result {
                installed: false,
                ..
            }
        ));

        db.lock()
            .await
            .transaction(|tx| {
                tx.install_sticker_pack(ItemCollectionId {
                    namespace: ItemCollectionNamespace::CloudStickerPacks,
                    id: 31,
                })
            })
            .unwrap();

        let second: Vec<LoadedStickerPack> =
            loaded_sticker_pack(db.clone(), network.clone(), reference)
                .collect()
                .await;
        assert_eq!(second.len(), 1);
        match &second[0] {
            LoadedStickerPack::Result {
                info,
                items,
                installed,
            } => {
                assert_eq!(info.short_name, "animals");
                assert_eq!(items.len(), 2);
                assert!(*installed);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(network.calls(), 1);
        assert_eq!(
            network.requests()[0],
            ApiRequest::GetStickerSet {
                stickerset: InputStickerSet::ShortName {
                    short_name: "Animals".into()
                }
            }
        );
    }

    #[tokio::test]
    async fn remote_failure_yields_none() {
        let db = shared_db();
        let network = Arc::new(ScriptedNetwork::new(vec![Err(NetError::Rpc(
            "STICKERSET_INVALID".into(),
        ))]));

        let states: Vec<LoadedStickerPack> = loaded_sticker_pack(
            db.clone(),
            network,
            StickerPackReference::Id {
                id: 1,
                access_hash: 2,
            },
        )
        .collect()
        .await;

        assert_eq!(states, vec![LoadedStickerPack::Fetching, LoadedStickerPack::None]);
        let cached = db
            .lock()
            .await
            .transaction(|tx| {
                tx.get_cached_sticker_pack(&StickerPackReference::Id {
                    id: 1,
                    access_hash: 2,
                })
            })
            .unwrap();
        assert!(cached.is_none());
    }
}
