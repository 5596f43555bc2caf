use crate::auth::Store;
use crate::service::MessageHandler;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{event, Level};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::{Filter, Rejection, Reply};

/// Largest message body accepted on the bridge.
pub const MAX_MESSAGE_SIZE: u64 = 64 * 1024;

#[derive(Debug)]
pub struct Server<S> {
    handler: Arc<MessageHandler<S>>,
    address: SocketAddr,
}

#[derive(serde::Serialize)]
struct Health<'a> {
    status: &'static str,
    service: &'a str,
}

async fn handle_message<S: Store>(
    handler: Arc<MessageHandler<S>>,
    body: Bytes,
) -> Result<warp::reply::Response, Infallible> {
    if !handler.validate(&body) {
        return Ok(warp::reply::with_status(warp::reply(), StatusCode::BAD_REQUEST).into_response());
    }

    let response = handler.execute(&body);
    Ok(warp::reply::with_header(response, "content-type", "application/json").into_response())
}

/// `POST /v1/messages` carries one envelope per request, `GET /v1/health` answers liveness probes.
pub fn routes<S: Store + Send + Sync + 'static>(
    handler: Arc<MessageHandler<S>>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let with_handler = warp::any().map(move || handler.clone());

    let messages = warp::path!("v1" / "messages")
        .and(warp::post())
        .and(with_handler.clone())
        .and(warp::body::content_length_limit(MAX_MESSAGE_SIZE))
        .and(warp::body::bytes())
        .and_then(handle_message);

    let health = warp::path!("v1" / "health")
        .and(warp::get())
        .and(with_handler)
        .map(|handler: Arc<MessageHandler<S>>| {
            warp::reply::json(&Health {
                status: "ok",
                service: handler.service_name(),
            })
        });

    messages.or(health).with(warp::log("kagi::http"))
}

impl<S: Store + Send + Sync + 'static> Server<S> {
    pub fn new(handler: MessageHandler<S>, address: SocketAddr) -> Self {
        Self {
            handler: Arc::new(handler),
            address,
        }
    }

    pub async fn serve(self) {
        event!(Level::INFO, address = %self.address, "Listening for messages");
        warp::serve(routes(self.handler)).run(self.address).await;
    }
}
