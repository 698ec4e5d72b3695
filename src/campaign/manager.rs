use chrono::{Local, NaiveDate, Utc};
use tracing::warn;

use crate::database::Database;
use crate::error::Error;

use super::code::{self, GeneratedCode, PartnerCode};
use super::{Campaign, CampaignId};

fn normalize_partner_code(partner_code: &str) -> Result<PartnerCode, Error> {
    partner_code
        .parse()
        .map_err(|_| Error::InvalidPartnerCode {
            partner_code: partner_code.to_string(),
        })
}

/// The calendar day campaign codes are stamped with when none is given.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[tracing::instrument(skip(db))]
pub async fn count_campaigns_for_day(
    db: &dyn Database,
    partner_code: &str,
    day: NaiveDate,
) -> Result<u64, Error> {
    let partner_code = normalize_partner_code(partner_code)?;
    let count = db
        .campaigns()
        .count_campaigns_by_partner_and_day(partner_code.as_str(), day)
        .await?;

    Ok(count)
}

/// Derives the code the partner's next campaign on `day` would get.
///
/// The count and the eventual insert are not atomic, so two campaigns created
/// at the same time can be handed the same code.
#[tracing::instrument(skip(db))]
pub async fn generate_campaign_code(
    db: &dyn Database,
    partner_code: &str,
    day: NaiveDate,
) -> Result<GeneratedCode, Error> {
    let partner_code = normalize_partner_code(partner_code)?;
    let count = db
        .campaigns()
        .count_campaigns_by_partner_and_day(partner_code.as_str(), day)
        .await?;

    Ok(code::generate(partner_code.as_str(), &day, count))
}

#[tracing::instrument(skip(db))]
pub async fn campaign_code_exists(db: &dyn Database, campaign_code: &str) -> Result<bool, Error> {
    let campaign = db.campaigns().fetch_campaign_by_code(campaign_code).await?;

    Ok(campaign.is_some())
}

#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: &dyn Database,
    name: String,
    partner_code: &str,
    day: NaiveDate,
) -> Result<Campaign, Error> {
    let partner_code = normalize_partner_code(partner_code)?;
    let count = db
        .campaigns()
        .count_campaigns_by_partner_and_day(partner_code.as_str(), day)
        .await?;

    let generated = code::generate(partner_code.as_str(), &day, count);
    if !code::validate(&generated.full_code) {
        warn!(code = %generated.full_code, "campaign code sequence overflowed");
        return Err(Error::CampaignCodeSequenceExhausted {
            partner_code: partner_code.as_str().to_string(),
            date_string: code::date_string(&day),
            sequence_number: count + 1,
        });
    }

    // codes carry no year, so last year's campaigns can collide; the code stays advisory
    if campaign_code_exists(db, &generated.full_code).await? {
        warn!(code = %generated.full_code, "campaign code is already in use");
    }

    let now = Utc::now();
    let campaign = Campaign {
        id: CampaignId::new(),
        name,
        partner_code: partner_code.as_str().to_string(),
        campaign_code: generated.full_code,
        display_code: generated.display_code,
        created_on: day,
        created_at: now,
        modified_at: now,
    };

    db.campaigns().insert_campaign(&campaign).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: &dyn Database) -> Result<Vec<Campaign>, Error> {
    let campaigns = db.campaigns().fetch_campaigns().await?;

    Ok(campaigns)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<Campaign, Error> {
    let campaign = db.campaigns().assert_campaign_exists(campaign_id).await?;

    Ok(campaign)
}
