use crate::{
    api::AppContext,
    login360::{
        params::LoginRequest,
        session::{self, LoginResult},
        sign,
    },
};
use axum::{
    extract::{Extension, RawQuery},
    Json,
};
use tracing::{debug, info, instrument, warn, Span};

#[utoipa::path(
    get,
    path = "/360/login",
    params(
        ("qid" = i64, Query, description = "Platform user id"),
        ("time" = i64, Query, description = "Request timestamp, part of the signature"),
        ("isAdult" = i64, Query, description = "Adult flag reported by the platform"),
        ("server_id" = String, Query, description = "Game server the login targets"),
        ("sign" = String, Query, description = "md5(qid=&time=&server_id= + key), lowercase hex"),
    ),
    responses (
        (status = 200, description = "errno 0 with a session, -1 on signature error, -2 on parameter error", body = LoginResult, content_type = "application/json"),
    ),
    tag = "login",
)]
/// Verify a signed login and issue a session token.
#[instrument(skip_all, fields(qid))]
pub async fn login(
    Extension(ctx): Extension<AppContext>,
    RawQuery(query): RawQuery,
) -> Json<LoginResult> {
    let request = match LoginRequest::from_query(query.as_deref()) {
        Ok(request) => request,
        Err(err) => {
            debug!("Rejected login parameters: {err}");
            return Json(LoginResult::parameter_error());
        }
    };

    Span::current().record("qid", request.qid);

    let expected = sign::login_sign(
        request.qid,
        request.time,
        &request.server_id,
        ctx.login_key(),
    );
    if !sign::matches(&expected, &request.sign) {
        warn!(server_id = %request.server_id, "Login signature mismatch");
        return Json(LoginResult::signature_error());
    }

    let result = session::issue(&request);

    info!(server_id = %request.server_id, "Login session issued");

    Json(result)
}
