use actix_web::error::JsonPayloadError;
use actix_web::web::{Bytes, Data, Json, Path};
use actix_web::{get, post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::utils::SuccessBody;

use super::queue::{MemberQueue, MemberStats};
use super::{manager, Member, MemberId, MemberStatus, MemberType, Review};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MemberBody {
    pub id: MemberId,
    pub member_type: MemberType,
    pub status: MemberStatus,
    pub name: String,
    pub biz_no: String,
    pub manager_name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_reason: Option<String>,
}

impl MemberBody {
    pub fn render(member: Member) -> MemberBody {
        let (reviewed_at, review_reason) = match member.review {
            Some(Review {
                reviewed_at,
                reason,
            }) => (Some(reviewed_at), reason),
            None => (None, None),
        };

        MemberBody {
            id: member.id,
            member_type: member.member_type,
            status: member.status,
            name: member.name,
            biz_no: member.biz_no,
            manager_name: member.manager_name,
            phone: member.phone,
            created_at: member.created_at,
            modified_at: member.modified_at,
            reviewed_at,
            review_reason,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MemberListResponse {
    pub success: bool,
    pub items: Vec<MemberBody>,
    pub stats: MemberStats,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RejectMemberBody {
    pub reason: Option<String>,
}

impl RejectMemberBody {
    /// A blank payload rejects without a reason, anything else must be a
    /// well-formed body.
    fn from_payload(payload: &[u8]) -> Result<RejectMemberBody, Error> {
        if payload.iter().all(u8::is_ascii_whitespace) {
            return Ok(RejectMemberBody::default());
        }

        serde_json::from_slice(payload)
            .map_err(|err| Error::InvalidJson(JsonPayloadError::Deserialize(err)))
    }
}

#[get("/members/{member_type}")]
#[tracing::instrument(skip(db))]
pub async fn get_members(
    db: Data<Box<dyn Database>>,
    params: Path<MemberType>,
) -> Result<Json<MemberListResponse>, Error> {
    let member_type = params.into_inner();

    let members = manager::get_members(&***db, member_type).await?;
    let stats = MemberStats::tally(&members);

    Ok(Json(MemberListResponse {
        success: true,
        items: members.into_iter().map(MemberBody::render).collect(),
        stats,
    }))
}

#[get("/members/{member_type}/pending")]
#[tracing::instrument(skip(db))]
pub async fn get_pending_members(
    db: Data<Box<dyn Database>>,
    params: Path<MemberType>,
) -> Result<Json<MemberListResponse>, Error> {
    let member_type = params.into_inner();

    let mut queue = MemberQueue::new(member_type);
    queue.refresh(&***db).await?;

    Ok(Json(MemberListResponse {
        success: true,
        stats: queue.stats(),
        items: queue
            .members()
            .iter()
            .cloned()
            .map(MemberBody::render)
            .collect(),
    }))
}

#[post("/members/{member_type}/{member_id}/approve")]
#[tracing::instrument(skip(db))]
pub async fn approve_member(
    db: Data<Box<dyn Database>>,
    params: Path<(MemberType, MemberId)>,
) -> Result<Json<SuccessBody>, Error> {
    let (member_type, member_id) = params.into_inner();

    manager::approve_member(&***db, member_type, member_id).await?;

    Ok(Json(SuccessBody::new()))
}

#[post("/members/{member_type}/{member_id}/reject")]
#[tracing::instrument(skip(db))]
pub async fn reject_member(
    db: Data<Box<dyn Database>>,
    params: Path<(MemberType, MemberId)>,
    payload: Bytes,
) -> Result<Json<SuccessBody>, Error> {
    let (member_type, member_id) = params.into_inner();
    let body = RejectMemberBody::from_payload(&payload)?;

    manager::reject_member(&***db, member_type, member_id, body.reason).await?;

    Ok(Json(SuccessBody::new()))
}
