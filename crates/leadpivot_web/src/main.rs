use actix_web::{App, HttpServer, middleware, web};
use clap::Parser;
use leadpivot_core::conf::derive_default_pivot_options;
use leadpivot_web::{ServerConfig, configure, init_default_logging};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = ServerConfig::parse();
    init_default_logging();

    if let Err(err) = config.validate() {
        error!(error = %err, "invalid configuration");
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err));
    }

    let options = web::Data::new(derive_default_pivot_options());
    let n_limit = config.max_upload_bytes;
    info!(bind = %config.bind, max_upload_bytes = n_limit, "starting leadpivot");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(options.clone())
            .app_data(web::PayloadConfig::new(n_limit))
            .configure(configure)
    })
    .bind(config.bind)?
    .run()
    .await
}
