use std::convert::Infallible;

use warp::Rejection;
use warp::http::StatusCode;
use warp::reply::Response;

use super::handlers::error_reply;

/// Map filter rejections to the same JSON error shape the handlers use
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Uploaded file is too large")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        log::debug!("Unhandled rejection: {:?}", err);
        (StatusCode::BAD_REQUEST, "Invalid upload request")
    };

    Ok(error_reply(status, message))
}
