use super::errors::handle_rejection;
use super::handlers;
use crate::service::OffersService;
use rweb::*;
use std::net::SocketAddr;

/// Routes without the OpenAPI document, rejections already turned into replies.
pub fn routes(
    service: OffersService,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::any()
        .and(handlers::status(service.clone()).boxed())
        .or(handlers::offers::get_offers(service.clone()).boxed())
        .or(handlers::offers::get_stats(service).boxed())
        .recover(handle_rejection)
}

pub async fn start(service: OffersService, addr: SocketAddr) {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET"])
        .max_age(86400);

    let (spec, filter) = openapi::spec().build(move || routes(service).with(cors));

    ::log::info!("Listening on {}", addr);
    serve(filter.or(openapi_docs(spec))).run(addr).await;
}
