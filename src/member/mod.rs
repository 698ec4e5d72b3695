use chrono::{DateTime, Utc};
use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub mod queue;
pub use endpoints::*;

pub type MemberId = TypedId<Member>;

/// Which signup queue a member came through. Each type lives in its own
/// collection and is approved independently of the others.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberType {
    Agency,
    Advertiser,
    Partner,
}

impl MemberType {
    pub const ALL: [MemberType; 3] = [
        MemberType::Agency,
        MemberType::Advertiser,
        MemberType::Partner,
    ];

    pub fn collection_name(self) -> &'static str {
        match self {
            MemberType::Agency => "agencies",
            MemberType::Advertiser => "advertisers",
            MemberType::Partner => "partners",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MemberType::Agency => "agency",
            MemberType::Advertiser => "advertiser",
            MemberType::Partner => "partner",
        }
    }
}

/// `Approved` and `Rejected` are final.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Pending,
    Approved,
    Rejected,
}

impl MemberStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberStatus::Pending => "pending",
            MemberStatus::Approved => "approved",
            MemberStatus::Rejected => "rejected",
        }
    }
}

impl From<MemberType> for Bson {
    fn from(member_type: MemberType) -> Bson {
        Bson::String(member_type.as_str().to_string())
    }
}

impl From<MemberStatus> for Bson {
    fn from(status: MemberStatus) -> Bson {
        Bson::String(status.as_str().to_string())
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: MemberId,
    pub member_type: MemberType,
    pub status: MemberStatus,
    pub name: String,
    pub biz_no: String,
    pub manager_name: String,
    pub phone: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    pub review: Option<Review>,
}

/// What was recorded when a pending member was approved or rejected.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Review {
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub reviewed_at: DateTime<Utc>,
    pub reason: Option<String>,
}

impl TypedIdMarker for Member {
    fn tag() -> &'static str {
        "MBR"
    }
}
