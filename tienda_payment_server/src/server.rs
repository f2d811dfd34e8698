use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use tienda_payment_engine::{PaymentFlowApi, SqliteDatabase};
use wompi_tools::WompiApi;

use crate::{
    config::{ServerConfig, WebhookOptions},
    errors::ServerError,
    routes::{health, NewOrderRoute, OrderByIdRoute},
    wompi_routes::{CheckoutRoute, PollTransactionRoute, WompiWebhookRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    // The gateway client is built once, outside the factory closure, so a bad credential fails startup rather than
    // every request.
    let wompi_api = WompiApi::new(config.wompi.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let webhook_options = WebhookOptions::from_config(&config);
    let srv = HttpServer::new(move || {
        let flow_api = PaymentFlowApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("tps::access_log"))
            .app_data(web::Data::new(flow_api))
            .app_data(web::Data::new(wompi_api.clone()))
            .app_data(web::Data::new(webhook_options.clone()))
            .service(health)
            .service(NewOrderRoute::<SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new())
            .service(CheckoutRoute::<SqliteDatabase>::new())
            .service(PollTransactionRoute::<SqliteDatabase>::new())
            .service(WompiWebhookRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
