//! Live streaming data extracted from upstream `data` objects
//!
//! Only the fields listed here are copied into an envelope; everything else
//! the upstream returns is dropped.

use super::serde_helpers::{deserialize_flexible_id, deserialize_flexible_opt_id};
use serde::{Deserialize, Serialize};

/// Streamer profile from `live_user/v1/Master/info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterInfo {
    pub info: MasterUser,
    #[serde(default)]
    pub exp: MasterExp,
    #[serde(default)]
    pub follower_num: u64,
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub room_id: u64,
    #[serde(default)]
    pub medal_name: String,
    #[serde(default)]
    pub room_news: RoomNews,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterUser {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub uid: u64,
    pub uname: String,
    #[serde(default)]
    pub face: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterExp {
    #[serde(default)]
    pub master_level: MasterLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterLevel {
    #[serde(default)]
    pub level: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomNews {
    #[serde(default)]
    pub content: String,
}

/// One of a streamer's recently used areas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorArea {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub id: u64,
    pub name: String,
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub parent_id: u64,
    pub parent_name: String,
}

/// Top level area with its children, from `room/v1/Area/getList`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentArea {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub list: Vec<SubArea>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubArea {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub id: u64,
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub parent_id: u64,
    pub name: String,
    #[serde(default)]
    pub parent_name: String,
}

impl ParentArea {
    /// Find a child area by id
    pub fn find(&self, id: u64) -> Option<&SubArea> {
        self.list.iter().find(|area| area.id == id)
    }
}

/// Legacy room summary from `room/v1/Room/getRoomInfoOld`
///
/// Field names follow the upstream spelling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomInfoOld {
    #[serde(rename = "roomStatus", default)]
    pub room_status: Option<i64>,
    #[serde(rename = "roundStatus", default)]
    pub round_status: Option<i64>,
    #[serde(rename = "liveStatus", default)]
    pub live_status: Option<i64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub online: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_flexible_opt_id")]
    pub roomid: Option<u64>,
    #[serde(default)]
    pub broadcast_type: Option<i64>,
    #[serde(default)]
    pub online_hidden: Option<i64>,
    #[serde(default)]
    pub link: Option<String>,
}

impl RoomInfoOld {
    /// `liveStatus == 1`
    pub fn is_live(&self) -> bool {
        self.live_status == Some(1)
    }
}

/// Room details from `xlive/web-room/v1/index/getRoomBaseInfo`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomBaseInfo {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub room_id: u64,
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub uid: u64,
    #[serde(default)]
    pub area_id: u64,
    #[serde(default)]
    pub live_status: i64,
    #[serde(default)]
    pub live_url: String,
    #[serde(default)]
    pub parent_area_id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub parent_area_name: String,
    #[serde(default)]
    pub area_name: String,
    #[serde(default)]
    pub live_time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub attention: u64,
    #[serde(default)]
    pub online: u64,
    #[serde(default)]
    pub short_id: u64,
    #[serde(default)]
    pub uname: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub background: String,
}
