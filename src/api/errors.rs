use derive_more::Display;
use hyper::StatusCode;
use rweb::{reject::Reject, warp, Rejection, Reply};

pub fn not_found(what: &str) -> Rejection {
    warp::reject::custom(ServiceError::NotFound(what.to_string()))
}

pub fn bad_request(reason: &str) -> Rejection {
    warp::reject::custom(ServiceError::BadRequest(reason.to_string()))
}

#[derive(Debug, Display)]
pub enum ServiceError {
    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "BadRequest: {}", _0)]
    BadRequest(String),
}

#[derive(Debug, rweb::Schema, serde::Serialize, serde::Deserialize)]
pub struct ErrorJSON {
    pub error: String,
}

impl From<&ServiceError> for ErrorJSON {
    fn from(e: &ServiceError) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

impl Reject for ServiceError {}

pub async fn handle_rejection(r: Rejection) -> Result<impl Reply, Rejection> {
    if r.is_not_found() {
        return Err(warp::reject());
    }
    match r.find::<ServiceError>() {
        Some(e @ ServiceError::NotFound(_)) => Ok(warp::reply::with_status(
            warp::reply::json(&ErrorJSON::from(e)),
            StatusCode::NOT_FOUND,
        )),
        Some(e @ ServiceError::BadRequest(_)) => Ok(warp::reply::with_status(
            warp::reply::json(&ErrorJSON::from(e)),
            StatusCode::BAD_REQUEST,
        )),
        None => Err(r),
    }
}
