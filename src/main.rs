use tracing_subscriber::fmt::format::FmtSpan;

use adboard::{Config, Error};

#[actix_web::main]
async fn main() -> Result<(), Error> {
    let config = Config::load_reporting_to(tracing_subscriber::fmt().compact().finish())?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_span_events(FmtSpan::NEW)
        .compact()
        .init();

    adboard::run(config).await
}
