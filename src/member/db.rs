use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{bson, Database};

use crate::database::MongoMemberStore;
use crate::error::Error;

use super::{Member, MemberId, MemberStatus, MemberType, Review};

pub async fn initialize(db: &Database) -> Result<(), Error> {
    for member_type in MemberType::ALL.iter() {
        db.run_command(
            bson::doc! {
                "createIndexes": member_type.collection_name(),
                "indexes": [
                    { "key": { "status": 1, "created_at": 1 }, "name": "by_status" },
                ]
            },
            None,
        )
        .await?;
    }

    Ok(())
}

/// One store per member type; nothing here crosses between types.
#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn insert_member(&self, member: &Member) -> Result<(), Error>;

    async fn fetch_members(&self) -> Result<Vec<Member>, Error>;

    async fn fetch_members_by_status(&self, status: MemberStatus) -> Result<Vec<Member>, Error>;

    async fn fetch_member_by_id(&self, member_id: MemberId) -> Result<Option<Member>, Error>;

    /// Moves a pending member to `status`. Fails with
    /// `ConcurrentModificationDetected` if the member changed since it was read.
    async fn update_member_status(
        &self,
        member: Member,
        status: MemberStatus,
        reason: Option<String>,
    ) -> Result<Member, Error>;
}

#[async_trait]
impl MemberStore for MongoMemberStore {
    #[tracing::instrument(skip(self))]
    async fn insert_member(&self, member: &Member) -> Result<(), Error> {
        self.insert_one(member, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_members(&self) -> Result<Vec<Member>, Error> {
        let options = FindOptions::builder()
            .sort(bson::doc! { "created_at": -1 })
            .build();

        let members: Vec<Member> = self
            .find(bson::doc! {}, options)
            .await?
            .try_collect()
            .await?;

        Ok(members)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_members_by_status(&self, status: MemberStatus) -> Result<Vec<Member>, Error> {
        let options = FindOptions::builder()
            .sort(bson::doc! { "created_at": -1 })
            .build();

        let members: Vec<Member> = self
            .find(bson::doc! { "status": status }, options)
            .await?
            .try_collect()
            .await?;

        Ok(members)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_member_by_id(&self, member_id: MemberId) -> Result<Option<Member>, Error> {
        let member = self
            .find_one(bson::doc! { "_id": member_id }, None)
            .await?;

        Ok(member)
    }

    #[tracing::instrument(skip(self))]
    async fn update_member_status(
        &self,
        mut member: Member,
        status: MemberStatus,
        reason: Option<String>,
    ) -> Result<Member, Error> {
        let now = Utc::now();
        let old_modified_at = bson::DateTime::from_chrono(member.modified_at);
        let new_modified_at = bson::DateTime::from_chrono(now);
        let review = Review {
            reviewed_at: now,
            reason,
        };
        let new_review = bson::to_bson(&review)?;

        let result = self
            .update_one(
                bson::doc! {
                    "_id": member.id,
                    "status": MemberStatus::Pending,
                    "modified_at": old_modified_at,
                },
                bson::doc! { "$set": { "status": status, "review": new_review, "modified_at": new_modified_at } },
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(Error::ConcurrentModificationDetected);
        }

        member.modified_at = now;
        member.status = status;
        member.review = Some(review);

        Ok(member)
    }
}
