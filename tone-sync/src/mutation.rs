//! Write-then-invalidate.
//!
//! Every mutation runs its remote write and, only when that write succeeds,
//! advances the owning resource's refresh counter exactly once. A failed write
//! leaves the counter alone and reaches the caller as [`RemoteWriteError`].

use std::future::Future;

use serde_json::Value;

use tone_core::{ApiError, RemoteWriteError, WriteAction};

use crate::counter::RefreshCounter;

/// Await `write`, then bump `counter` on success.
///
/// Returns once the increment has been applied, so any view over `counter`
/// is already `Loading` for the post-write fetch when this returns.
pub async fn perform<F>(
    counter: &RefreshCounter,
    action: WriteAction,
    write: F,
) -> Result<Value, RemoteWriteError>
where
    F: Future<Output = Result<Value, ApiError>>,
{
    let resource = counter.resource();
    match write.await {
        Ok(body) => {
            let token = counter.increment();
            tracing::info!(%resource, %action, token, "remote write succeeded");
            Ok(body)
        }
        Err(source) => {
            tracing::warn!(%resource, %action, error = %source, "remote write failed");
            Err(RemoteWriteError {
                resource,
                action,
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tone_core::ResourceKind;

    #[tokio::test]
    async fn success_increments_once() {
        let counter = RefreshCounter::new(ResourceKind::Agents);
        let body = perform(&counter, WriteAction::Delete, async { Ok(Value::Null) })
            .await
            .expect("write succeeds");
        assert_eq!(body, Value::Null);
        assert_eq!(counter.value(), 1);
    }

    #[tokio::test]
    async fn failure_leaves_counter_unchanged() {
        let counter = RefreshCounter::new(ResourceKind::Members);
        let err = perform(&counter, WriteAction::UpdateRole, async {
            Err(ApiError::Status {
                status: 422,
                detail: "invalid role".into(),
            })
        })
        .await
        .expect_err("write fails");

        assert_eq!(counter.value(), 0);
        assert_eq!(err.resource, ResourceKind::Members);
        assert_eq!(err.action, WriteAction::UpdateRole);
        assert_eq!(err.source.status(), Some(422));
    }
}
