//! Built-in health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Can it serve traffic? |

use crate::{ApiError, Request, Response};

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Result<Response, ApiError> {
    Ok(Response::text("ok"))
}

/// `200 OK` with body `"ready"`. Stores are opened before the server binds,
/// so a listening process is a ready one.
pub async fn readiness(_req: Request) -> Result<Response, ApiError> {
    Ok(Response::text("ready"))
}
