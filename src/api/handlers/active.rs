use crate::{
    api::AppContext,
    login360::{
        activation::{self, ActiveCode},
        params::ActiveRequest,
        sign,
    },
};
use axum::extract::{Extension, RawQuery};
use tracing::{debug, instrument, warn, Span};

#[utoipa::path(
    get,
    path = "/360/active",
    params(
        ("qid" = i64, Query, description = "Platform user id"),
        ("server_id" = String, Query, description = "Game server the check targets"),
        ("sign" = String, Query, description = "md5(qid + server_id + key), lowercase hex"),
    ),
    responses (
        (status = 200, description = "1 activated, 0 not activated, -1 bad parameters or signature, -2 store error", body = String, content_type = "text/plain"),
    ),
    tag = "active",
)]
/// Report whether a player has an activation record.
#[instrument(skip_all, fields(qid))]
pub async fn active(
    Extension(ctx): Extension<AppContext>,
    RawQuery(query): RawQuery,
) -> &'static str {
    let request = match ActiveRequest::from_query(query.as_deref()) {
        Ok(request) => request,
        Err(err) => {
            debug!("Rejected active parameters: {err}");
            return ActiveCode::Rejected.as_str();
        }
    };

    Span::current().record("qid", request.qid);

    let expected = sign::active_sign(request.qid, &request.server_id, ctx.login_key());
    if !sign::matches(&expected, &request.sign) {
        warn!(server_id = %request.server_id, "Active signature mismatch");
        return ActiveCode::Rejected.as_str();
    }

    activation::check(ctx.store(), ctx.key_prefix(), request.qid)
        .await
        .as_str()
}
