use actix_web::web::{self, Data, JsonConfig, PathConfig, QueryConfig, ServiceConfig};
use actix_web::{App, HttpServer, ResponseError};
use mongodb::Client;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod campaign;
pub mod config;
pub mod database;
pub mod error;
pub mod member;
pub mod seed;
pub mod typedid;
pub mod utils;

pub use campaign::code;
pub use config::Config;
pub use error::Error;

use crate::database::{Database, MongoDatabase};

/// Registers every endpoint. Static campaign code routes come before the
/// `{code}` catch-all so they are matched first.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        // format json errors with custom format
        Error::InvalidJson(err).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        // format query errors with custom format
        Error::InvalidQuery(err).into()
    }))
    .service(campaign::endpoints::create_campaign)
    .service(campaign::endpoints::get_campaigns)
    .service(campaign::endpoints::get_campaign_by_id)
    .service(campaign::endpoints::count_campaign_codes)
    .service(campaign::endpoints::generate_campaign_code)
    .service(campaign::endpoints::campaign_code_exists)
    .service(campaign::endpoints::parse_campaign_code)
    .service(member::endpoints::get_members)
    .service(member::endpoints::get_pending_members)
    .service(member::endpoints::approve_member)
    .service(member::endpoints::reject_member)
    .default_service(web::to(|| async { Error::PathDoesNotExist.error_response() }));
}

pub async fn run(config: Config) -> Result<(), Error> {
    info!("connecting to db: {}", config.mongo_uri);
    let db = Client::with_uri_str(&config.mongo_uri)
        .await?
        .database(&config.database);
    let db = MongoDatabase::initialize(db).await?;

    if config.seed {
        seed::seed(&db).await?;
    }

    info!("listening on {}", config.bind);
    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(Box::new(db.clone()) as Box<dyn Database>))
            .wrap(TracingLogger::default())
            .configure(configure)
    })
    .bind(&config.bind)?
    .run()
    .await?;

    Ok(())
}
