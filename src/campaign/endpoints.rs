use actix_web::web::{Data, Json, Path, Query};
use actix_web::{get, post};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;

use super::code::{self, ParsedCode};
use super::{manager, Campaign, CampaignId};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreateCampaignBody {
    pub name: String,
    pub partner_code: String,
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CampaignBody {
    pub id: CampaignId,
    pub name: String,
    pub partner_code: String,
    pub campaign_code: String,
    pub display_code: String,
    pub created_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            id: campaign.id,
            name: campaign.name,
            partner_code: campaign.partner_code,
            campaign_code: campaign.campaign_code,
            display_code: campaign.display_code,
            created_on: campaign.created_on,
            created_at: campaign.created_at,
            modified_at: campaign.modified_at,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CampaignResponse {
    pub success: bool,
    pub campaign: CampaignBody,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CampaignListResponse {
    pub success: bool,
    pub items: Vec<CampaignBody>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CountQuery {
    pub partner_code: String,
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CountResponse {
    pub success: bool,
    pub count: u64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GenerateCodeBody {
    pub partner_code: String,
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GenerateCodeResponse {
    pub success: bool,
    pub full_code: String,
    pub display_code: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParseCodeResponse {
    pub success: bool,
    pub valid: bool,
    pub parsed: Option<ParsedCode>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CodeExistsResponse {
    pub success: bool,
    pub exists: bool,
}

#[post("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: Data<Box<dyn Database>>,
    body: Json<CreateCampaignBody>,
) -> Result<Json<CampaignResponse>, Error> {
    let body = body.into_inner();
    let day = body.date.unwrap_or_else(manager::today);

    let campaign = manager::create_campaign(&***db, body.name, &body.partner_code, day).await?;

    Ok(Json(CampaignResponse {
        success: true,
        campaign: CampaignBody::render(campaign),
    }))
}

#[get("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: Data<Box<dyn Database>>) -> Result<Json<CampaignListResponse>, Error> {
    let campaigns = manager::get_campaigns(&***db).await?;

    Ok(Json(CampaignListResponse {
        success: true,
        items: campaigns.into_iter().map(CampaignBody::render).collect(),
    }))
}

#[get("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<CampaignResponse>, Error> {
    let campaign_id = params.into_inner();

    let campaign = manager::get_campaign_by_id(&***db, campaign_id).await?;

    Ok(Json(CampaignResponse {
        success: true,
        campaign: CampaignBody::render(campaign),
    }))
}

#[get("/campaign-codes/count")]
#[tracing::instrument(skip(db))]
pub async fn count_campaign_codes(
    db: Data<Box<dyn Database>>,
    query: Query<CountQuery>,
) -> Result<Json<CountResponse>, Error> {
    let query = query.into_inner();
    let day = query.date.unwrap_or_else(manager::today);

    let count = manager::count_campaigns_for_day(&***db, &query.partner_code, day).await?;

    Ok(Json(CountResponse {
        success: true,
        count,
    }))
}

#[post("/campaign-codes/generate")]
#[tracing::instrument(skip(db))]
pub async fn generate_campaign_code(
    db: Data<Box<dyn Database>>,
    body: Json<GenerateCodeBody>,
) -> Result<Json<GenerateCodeResponse>, Error> {
    let body = body.into_inner();
    let day = body.date.unwrap_or_else(manager::today);

    let generated = manager::generate_campaign_code(&***db, &body.partner_code, day).await?;

    Ok(Json(GenerateCodeResponse {
        success: true,
        full_code: generated.full_code,
        display_code: generated.display_code,
    }))
}

#[get("/campaign-codes/{code}")]
#[tracing::instrument]
pub async fn parse_campaign_code(params: Path<String>) -> Json<ParseCodeResponse> {
    let code = params.into_inner();
    let parsed = code::parse(&code);

    Json(ParseCodeResponse {
        success: true,
        valid: parsed.is_some(),
        parsed,
    })
}

#[get("/campaign-codes/{code}/exists")]
#[tracing::instrument(skip(db))]
pub async fn campaign_code_exists(
    db: Data<Box<dyn Database>>,
    params: Path<String>,
) -> Result<Json<CodeExistsResponse>, Error> {
    let code = params.into_inner();

    let exists = manager::campaign_code_exists(&***db, &code).await?;

    Ok(Json(CodeExistsResponse {
        success: true,
        exists,
    }))
}
