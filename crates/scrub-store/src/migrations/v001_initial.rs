//! v001 -- Initial schema creation.
//!
//! Peers, messages, per-peer chat state and cached metadata, the chat-list
//! inclusion table, and the two per-peer operation logs (cloud sync intents
//! and secret chat outgoing operations).

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Peers
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS peers (
    namespace   INTEGER NOT NULL,
    id          INTEGER NOT NULL,
    access_hash INTEGER,                      -- absent = not addressable remotely
    title       TEXT NOT NULL,
    PRIMARY KEY (namespace, id)
);

-- ----------------------------------------------------------------
-- Messages
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS messages (
    peer_namespace     INTEGER NOT NULL,
    peer_id            INTEGER NOT NULL,
    namespace          INTEGER NOT NULL,      -- message namespace
    id                 INTEGER NOT NULL,
    globally_unique_id INTEGER,
    author_namespace   INTEGER,
    author_id          INTEGER,
    timestamp          INTEGER NOT NULL,      -- unix seconds
    text               TEXT NOT NULL,
    PRIMARY KEY (peer_namespace, peer_id, namespace, id)
);

CREATE INDEX IF NOT EXISTS idx_messages_peer_ts
    ON messages(peer_namespace, peer_id, namespace, timestamp DESC);

CREATE INDEX IF NOT EXISTS idx_messages_author
    ON messages(peer_namespace, peer_id, author_namespace, author_id);

-- ----------------------------------------------------------------
-- Per-peer chat state (bincode-encoded secret chat state)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS peer_chat_states (
    peer_namespace INTEGER NOT NULL,
    peer_id        INTEGER NOT NULL,
    state          BLOB NOT NULL,
    PRIMARY KEY (peer_namespace, peer_id)
);

-- ----------------------------------------------------------------
-- Cached peer metadata (JSON)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS cached_peer_data (
    peer_namespace INTEGER NOT NULL,
    peer_id        INTEGER NOT NULL,
    data           TEXT NOT NULL,
    PRIMARY KEY (peer_namespace, peer_id)
);

-- ----------------------------------------------------------------
-- Chat list inclusion (JSON)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS chat_list_inclusion (
    peer_namespace INTEGER NOT NULL,
    peer_id        INTEGER NOT NULL,
    inclusion      TEXT NOT NULL,
    PRIMARY KEY (peer_namespace, peer_id)
);

-- ----------------------------------------------------------------
-- Operation logs
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS cloud_chat_operations (
    tag_local_index INTEGER PRIMARY KEY AUTOINCREMENT,
    peer_namespace  INTEGER NOT NULL,
    peer_id         INTEGER NOT NULL,
    contents        BLOB NOT NULL,            -- bincode CloudChatOperation
    created_at      TEXT NOT NULL             -- RFC-3339
);

CREATE INDEX IF NOT EXISTS idx_cloud_ops_peer
    ON cloud_chat_operations(peer_namespace, peer_id, tag_local_index);

CREATE TABLE IF NOT EXISTS secret_outgoing_operations (
    tag_local_index INTEGER PRIMARY KEY AUTOINCREMENT,
    peer_namespace  INTEGER NOT NULL,
    peer_id         INTEGER NOT NULL,
    contents        BLOB NOT NULL,            -- bincode SecretChatOutgoingOperation
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_secret_ops_peer
    ON secret_outgoing_operations(peer_namespace, peer_id, tag_local_index);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
