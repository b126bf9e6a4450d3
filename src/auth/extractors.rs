use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// The authenticated caller of a request.
///
/// `AuthMiddleware` inserts a `Principal` into the request extensions
/// after verifying the bearer token. A handler that declares this
/// extractor thereby requires authentication: anonymous requests are
/// rejected with 401 before the handler body runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The username the bearer token was issued to.
    pub subject: String,
}

impl FromRequest for Principal {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Principal>().cloned() {
            Some(principal) => ready(Ok(principal)),
            None => {
                let err = AppError::Unauthorized("Authentication required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
