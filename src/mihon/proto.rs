//! Wire messages for the Mihon/Tachiyomi backup format.
//!
//! Hand-written prost structs with the field tags Mihon's backup schema
//! defines. Only the messages and fields this converter populates or reads
//! are declared; unknown fields in real backups (tracking, preferences,
//! extension repos) are skipped by the decoder. The original schema is
//! proto2 with mostly-optional fields, hence the `Option` scalars; repeated
//! numerics stay unpacked to match what the app itself emits.

/// Top-level backup message. Field 101 onward is Mihon's "non-library"
/// number space.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Backup {
    #[prost(message, repeated, tag = "1")]
    pub backup_manga: Vec<BackupManga>,
    #[prost(message, repeated, tag = "2")]
    pub backup_categories: Vec<BackupCategory>,
    #[prost(message, repeated, tag = "101")]
    pub backup_sources: Vec<BackupSource>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BackupManga {
    #[prost(int64, optional, tag = "1")]
    pub source: Option<i64>,
    #[prost(string, optional, tag = "2")]
    pub url: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub title: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub artist: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub author: Option<String>,
    #[prost(string, optional, tag = "6")]
    pub description: Option<String>,
    #[prost(string, repeated, tag = "7")]
    pub genre: Vec<String>,
    #[prost(int32, optional, tag = "8")]
    pub status: Option<i32>,
    #[prost(string, optional, tag = "9")]
    pub thumbnail_url: Option<String>,
    #[prost(int64, optional, tag = "13")]
    pub date_added: Option<i64>,
    #[prost(message, repeated, tag = "16")]
    pub chapters: Vec<BackupChapter>,
    #[prost(int64, repeated, packed = "false", tag = "17")]
    pub categories: Vec<i64>,
    #[prost(bool, optional, tag = "100")]
    pub favorite: Option<bool>,
    #[prost(message, repeated, tag = "104")]
    pub history: Vec<BackupHistory>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BackupCategory {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(int64, optional, tag = "2")]
    pub order: Option<i64>,
    #[prost(int64, optional, tag = "3")]
    pub id: Option<i64>,
    #[prost(int64, optional, tag = "100")]
    pub flags: Option<i64>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BackupChapter {
    #[prost(string, optional, tag = "1")]
    pub url: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub scanlator: Option<String>,
    #[prost(bool, optional, tag = "4")]
    pub read: Option<bool>,
    #[prost(bool, optional, tag = "5")]
    pub bookmark: Option<bool>,
    #[prost(int64, optional, tag = "6")]
    pub last_page_read: Option<i64>,
    #[prost(int64, optional, tag = "7")]
    pub date_fetch: Option<i64>,
    #[prost(int64, optional, tag = "8")]
    pub date_upload: Option<i64>,
    #[prost(float, optional, tag = "9")]
    pub chapter_number: Option<f32>,
    #[prost(int64, optional, tag = "10")]
    pub source_order: Option<i64>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BackupHistory {
    #[prost(string, optional, tag = "1")]
    pub url: Option<String>,
    #[prost(int64, optional, tag = "2")]
    pub last_read: Option<i64>,
    #[prost(int64, optional, tag = "3")]
    pub read_duration: Option<i64>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BackupSource {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(int64, optional, tag = "2")]
    pub source_id: Option<i64>,
}
