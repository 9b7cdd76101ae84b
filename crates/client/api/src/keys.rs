//! Key-service operations: create, list, delete.

use crate::errors::run_or_canceled;
use crate::ApiHandler;
use lp_api::batch::{CreateKeyRequest, DeleteKeyRequest};
use lp_api::query::{ListKeysQuery, XPubResponse};
use lp_api::{ApiError, Page, DEFAULT_PAGE_SIZE};
use lp_utils::service::ServiceContext;

impl ApiHandler {
    pub async fn create_key(&self, ctx: &ServiceContext, req: CreateKeyRequest) -> Result<XPubResponse, ApiError> {
        let xpub = run_or_canceled(ctx, self.keys.create_key(req.alias.as_deref())).await?;
        Ok(XPubResponse { xpub: xpub.xpub, alias: xpub.alias })
    }

    /// Lists stored keys, optionally restricted to a set of aliases. The
    /// `after` cursor is an opaque echo managed by the key store.
    pub async fn list_keys(
        &self,
        ctx: &ServiceContext,
        q: ListKeysQuery,
    ) -> Result<Page<XPubResponse, ListKeysQuery>, ApiError> {
        let limit = DEFAULT_PAGE_SIZE;

        let (xpubs, after) = run_or_canceled(ctx, self.keys.list_keys(&q.aliases, &q.after, limit)).await?;

        let items: Vec<XPubResponse> =
            xpubs.into_iter().map(|xpub| XPubResponse { xpub: xpub.xpub, alias: xpub.alias }).collect();
        let last_page = items.len() < limit;
        Ok(Page { items, last_page, next: ListKeysQuery { after, ..q } })
    }

    pub async fn delete_key(&self, ctx: &ServiceContext, req: DeleteKeyRequest) -> Result<(), ApiError> {
        if req.xpub.is_empty() {
            return Err(ApiError::bad_request("xpub is required"));
        }
        run_or_canceled(ctx, self.keys.delete_key(&req.xpub)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, KeyStore, XPub};
    use crate::testutil::{test_handler, FakeDomain};
    use async_trait::async_trait;
    use lp_api::ApiErrorCode;
    use std::sync::Arc;

    struct Keys;

    #[async_trait]
    impl KeyStore for Keys {
        async fn create_key(&self, alias: Option<&str>) -> Result<XPub, DomainError> {
            Ok(XPub { xpub: "xpub-new".into(), alias: alias.map(str::to_string) })
        }

        async fn list_keys(
            &self,
            aliases: &[String],
            after: &str,
            _limit: usize,
        ) -> Result<(Vec<XPub>, String), DomainError> {
            assert!(aliases.is_empty());
            assert_eq!(after, "k2");
            Ok((vec![XPub { xpub: "xpub-3".into(), alias: None }], "k3".into()))
        }

        async fn delete_key(&self, xpub: &str) -> Result<(), DomainError> {
            match xpub {
                "xpub-3" => Ok(()),
                _ => Err(DomainError::NotFound(format!("key {xpub}"))),
            }
        }
    }

    #[tokio::test]
    async fn create_and_list_round_trip() {
        let handler = test_handler(FakeDomain::keys(Arc::new(Keys)));
        let ctx = ServiceContext::new();

        let created = handler
            .create_key(&ctx, CreateKeyRequest { alias: Some("signer-a".into()) })
            .await
            .unwrap();
        assert_eq!(created.alias.as_deref(), Some("signer-a"));

        let page = handler.list_keys(&ctx, ListKeysQuery { aliases: vec![], after: "k2".into() }).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.last_page);
        assert_eq!(page.next.after, "k3");
    }

    #[tokio::test]
    async fn delete_requires_an_xpub() {
        let handler = test_handler(FakeDomain::keys(Arc::new(Keys)));
        let ctx = ServiceContext::new();

        let err = handler.delete_key(&ctx, DeleteKeyRequest { xpub: String::new() }).await.unwrap_err();
        assert_eq!(err.code, ApiErrorCode::BadRequest);
        handler.delete_key(&ctx, DeleteKeyRequest { xpub: "xpub-3".into() }).await.unwrap();
    }
}
