use tracing::info;

use crate::database::Database;
use crate::error::Error;

use super::{Member, MemberId, MemberStatus, MemberType};

#[tracing::instrument(skip(db))]
pub async fn get_members(db: &dyn Database, member_type: MemberType) -> Result<Vec<Member>, Error> {
    let members = db.members(member_type).fetch_members().await?;

    Ok(members)
}

/// Members of `member_type` waiting for approval, in store order.
#[tracing::instrument(skip(db))]
pub async fn get_pending_members(
    db: &dyn Database,
    member_type: MemberType,
) -> Result<Vec<Member>, Error> {
    let members = db
        .members(member_type)
        .fetch_members_by_status(MemberStatus::Pending)
        .await?;

    Ok(members)
}

#[tracing::instrument(skip(db))]
pub async fn approve_member(
    db: &dyn Database,
    member_type: MemberType,
    member_id: MemberId,
) -> Result<Member, Error> {
    let member = expect_pending_member(db, member_type, member_id).await?;

    let member = db
        .members(member_type)
        .update_member_status(member, MemberStatus::Approved, None)
        .await?;

    info!(member_type = member_type.as_str(), %member_id, "member approved");

    Ok(member)
}

#[tracing::instrument(skip(db))]
pub async fn reject_member(
    db: &dyn Database,
    member_type: MemberType,
    member_id: MemberId,
    reason: Option<String>,
) -> Result<Member, Error> {
    let member = expect_pending_member(db, member_type, member_id).await?;

    let member = db
        .members(member_type)
        .update_member_status(member, MemberStatus::Rejected, reason)
        .await?;

    info!(member_type = member_type.as_str(), %member_id, "member rejected");

    Ok(member)
}

async fn expect_pending_member(
    db: &dyn Database,
    member_type: MemberType,
    member_id: MemberId,
) -> Result<Member, Error> {
    let member = db
        .members(member_type)
        .fetch_member_by_id(member_id)
        .await?
        .ok_or(Error::MemberDoesNotExist {
            member_type,
            member_id,
        })?;

    if member.status != MemberStatus::Pending {
        return Err(Error::MemberIsNotPending {
            member_id,
            status: member.status,
        });
    }

    Ok(member)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::test::{MockDatabase, MockMemberStore};
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    pub(crate) fn member(member_type: MemberType, name: &str, status: MemberStatus) -> Member {
        let now = Utc::now();
        Member {
            id: MemberId::new(),
            member_type,
            status,
            name: name.to_string(),
            biz_no: "123-45-67890".to_string(),
            manager_name: "Kim Minji".to_string(),
            phone: "010-1234-5678".to_string(),
            created_at: now,
            modified_at: now,
            review: None,
        }
    }

    fn database_with(members: &[Member]) -> MockDatabase {
        let mut db = MockDatabase::new();
        for member_type in MemberType::ALL.iter() {
            let of_type = members
                .iter()
                .filter(|member| member.member_type == *member_type)
                .cloned()
                .collect();
            *db.members_mut(*member_type) = MockMemberStore::backed_by(Arc::new(Mutex::new(of_type)));
        }
        db
    }

    #[tokio::test]
    async fn approved_member_leaves_pending_listing() {
        let m1 = member(MemberType::Partner, "Blue Sky Media", MemberStatus::Pending);
        let db = database_with(&[m1.clone()]);

        let pending = get_pending_members(&db, MemberType::Partner).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, m1.id);

        let approved = approve_member(&db, MemberType::Partner, m1.id).await.unwrap();
        assert_eq!(approved.status, MemberStatus::Approved);
        assert!(approved.review.is_some());

        let pending = get_pending_members(&db, MemberType::Partner).await.unwrap();
        assert!(pending.iter().all(|member| member.id != m1.id));
    }

    #[tokio::test]
    async fn rejecting_one_type_leaves_other_types_alone() {
        let m2 = member(MemberType::Agency, "Hangang Agency", MemberStatus::Pending);
        let advertiser = member(MemberType::Advertiser, "Jeju Tangerine", MemberStatus::Pending);
        let partner = member(MemberType::Partner, "Blue Sky Media", MemberStatus::Pending);
        let db = database_with(&[m2.clone(), advertiser.clone(), partner.clone()]);

        let rejected = reject_member(
            &db,
            MemberType::Agency,
            m2.id,
            Some("불충분한 서류".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(rejected.status, MemberStatus::Rejected);
        assert_eq!(
            rejected.review.unwrap().reason.as_deref(),
            Some("불충분한 서류")
        );

        let agencies = get_pending_members(&db, MemberType::Agency).await.unwrap();
        let advertisers = get_pending_members(&db, MemberType::Advertiser).await.unwrap();
        let partners = get_pending_members(&db, MemberType::Partner).await.unwrap();
        assert!(agencies.is_empty());
        assert_eq!(advertisers.len(), 1);
        assert_eq!(advertisers[0].id, advertiser.id);
        assert_eq!(partners.len(), 1);
        assert_eq!(partners[0].id, partner.id);
    }

    #[tokio::test]
    async fn reject_accepts_empty_reason() {
        let agency = member(MemberType::Agency, "Hangang Agency", MemberStatus::Pending);
        let db = database_with(&[agency.clone()]);

        let rejected = reject_member(&db, MemberType::Agency, agency.id, Some(String::new()))
            .await
            .unwrap();

        assert_eq!(rejected.review.unwrap().reason, Some(String::new()));
    }

    #[tokio::test]
    async fn approve_refuses_member_that_is_not_pending() {
        let partner = member(MemberType::Partner, "Blue Sky Media", MemberStatus::Rejected);
        let db = database_with(&[partner.clone()]);

        let result = approve_member(&db, MemberType::Partner, partner.id).await;

        assert_eq!(
            result.unwrap_err(),
            Error::MemberIsNotPending {
                member_id: partner.id,
                status: MemberStatus::Rejected,
            }
        );
    }

    #[tokio::test]
    async fn approve_looks_only_in_the_requested_type() {
        let advertiser = member(MemberType::Advertiser, "Jeju Tangerine", MemberStatus::Pending);
        let db = database_with(&[advertiser.clone()]);

        let result = approve_member(&db, MemberType::Partner, advertiser.id).await;

        assert_eq!(
            result.unwrap_err(),
            Error::MemberDoesNotExist {
                member_type: MemberType::Partner,
                member_id: advertiser.id,
            }
        );
        let pending = get_pending_members(&db, MemberType::Advertiser).await.unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[tokio::test]
    async fn listing_failure_is_propagated() {
        let mut db = MockDatabase::new();
        db.agencies.on_fetch_members_by_status =
            Box::new(|_| Err(Error::ExistentialState("store unavailable".to_string())));

        let result = get_pending_members(&db, MemberType::Agency).await;

        assert_eq!(
            result.unwrap_err(),
            Error::ExistentialState("store unavailable".to_string())
        );
    }
}
