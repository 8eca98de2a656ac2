//! Caller identity middleware.
//!
//! Authentication happens upstream; the gateway forwards the authenticated account id
//! in `X-User-Id`.

use salvo::prelude::*;
use uuid::Uuid;

use apothecary_app::domain::patients::records::OwnerUuid;

use crate::extensions::*;

/// Header carrying the authenticated account id.
pub(crate) const USER_ID_HEADER: &str = "x-user-id";

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(owner) = extract_owner(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid X-User-Id header"));

        return;
    };

    depot.insert_owner_uuid(owner);

    ctrl.call_next(req, depot, res).await;
}

fn extract_owner(req: &Request) -> Option<OwnerUuid> {
    let value = req.headers().get(USER_ID_HEADER)?.to_str().ok()?;

    Uuid::parse_str(value.trim()).ok().map(OwnerUuid::from)
}
