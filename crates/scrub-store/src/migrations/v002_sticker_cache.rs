use rusqlite::Connection;

const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS sticker_pack_cache (
    reference_key TEXT PRIMARY KEY NOT NULL,
    info          TEXT NOT NULL,              -- JSON StickerPackCollectionInfo
    items         TEXT NOT NULL,              -- JSON Vec<StickerPackItem>
    cached_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS installed_sticker_packs (
    collection_namespace INTEGER NOT NULL,    -- 0 = stickers, 1 = masks
    collection_id        INTEGER NOT NULL,
    PRIMARY KEY (collection_namespace, collection_id)
);
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
