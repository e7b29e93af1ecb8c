//! 路径参数提取器：只接受正整数 ID，其余情况直接返回 400

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

pub(crate) fn parse_positive_id(name: &str, raw: Option<&str>) -> Result<i64, String> {
    let raw = raw.ok_or_else(|| format!("Missing path parameter '{name}'"))?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("Invalid {name}: '{raw}'")),
    }
}

fn bad_request(message: String) -> actix_web::Error {
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::error_empty(ErrorCode::BadRequest, message.clone()));
    InternalError::from_response(message, response).into()
}

macro_rules! define_safe_id_extractor {
    ($(#[$meta:meta])* $name:ident, $param:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(
                    parse_positive_id($param, req.match_info().get($param))
                        .map($name)
                        .map_err(bad_request),
                )
            }
        }
    };
}

define_safe_id_extractor!(
    /// `{id}`
    SafeIDI64,
    "id"
);
define_safe_id_extractor!(
    /// `{assignment_id}`，教学安排的子资源 ID
    SafeAssignmentIdI64,
    "assignment_id"
);

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("id", Some("42")), Ok(42));
        assert!(parse_positive_id("id", Some("0")).is_err());
        assert!(parse_positive_id("id", Some("-3")).is_err());
        assert!(parse_positive_id("id", Some("abc")).is_err());
        assert!(parse_positive_id("id", None).is_err());
    }

    #[actix_web::test]
    async fn test_extractor_reads_match_info() {
        let req = TestRequest::default().param("id", "17").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 17);

        let req = TestRequest::default().param("id", "x").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
    }
}
