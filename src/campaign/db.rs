use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{bson, Database};

use crate::database::MongoCampaignStore;
use crate::error::Error;

use super::{Campaign, CampaignId};

pub const CAMPAIGNS: &str = "campaigns";

pub async fn initialize(db: &Database) -> Result<(), Error> {
    db.run_command(
        bson::doc! {
            "createIndexes": CAMPAIGNS,
            "indexes": [
                { "key": { "partner_code": 1, "created_on": 1 }, "name": "by_partner_code_and_day" },
                { "key": { "campaign_code": 1 }, "name": "by_campaign_code" },
            ]
        },
        None,
    )
    .await?;

    Ok(())
}

#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error>;

    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error>;

    async fn fetch_campaign_by_id(&self, campaign_id: CampaignId)
        -> Result<Option<Campaign>, Error>;

    async fn fetch_campaign_by_code(&self, campaign_code: &str)
        -> Result<Option<Campaign>, Error>;

    async fn count_campaigns_by_partner_and_day(
        &self,
        partner_code: &str,
        day: NaiveDate,
    ) -> Result<u64, Error>;

    async fn assert_campaign_exists(&self, campaign_id: CampaignId) -> Result<Campaign, Error> {
        self.fetch_campaign_by_id(campaign_id)
            .await?
            .ok_or(Error::CampaignDoesNotExist { campaign_id })
    }
}

#[async_trait]
impl CampaignStore for MongoCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        self.insert_one(campaign, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        let options = FindOptions::builder()
            .sort(bson::doc! { "created_at": -1 })
            .build();

        let campaigns: Vec<Campaign> = self
            .find(bson::doc! {}, options)
            .await?
            .try_collect()
            .await?;

        Ok(campaigns)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let campaign = self
            .find_one(bson::doc! { "_id": campaign_id }, None)
            .await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_code(
        &self,
        campaign_code: &str,
    ) -> Result<Option<Campaign>, Error> {
        let campaign = self
            .find_one(bson::doc! { "campaign_code": campaign_code }, None)
            .await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn count_campaigns_by_partner_and_day(
        &self,
        partner_code: &str,
        day: NaiveDate,
    ) -> Result<u64, Error> {
        let day = bson::to_bson(&day)?;
        let count = self
            .count_documents(
                bson::doc! { "partner_code": partner_code, "created_on": day },
                None,
            )
            .await?;

        Ok(count)
    }
}
