use crate::builder::NodeProvider;
use crate::error::NodeClientError;
use crate::request_builder::RequestBuilder;
use bytes::Bytes;
use lp_api::node::{GetBlockHeightResponse, SnapshotInfoResponse, SubmitTxResponse};

impl NodeProvider {
    fn request(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.client, self.base_url.clone(), self.headers.clone())
    }

    /// Fetches the raw encoded block at `height`. The remote node holds the
    /// request open until a block at that height exists.
    pub async fn get_block(&self, height: u64) -> Result<Bytes, NodeClientError> {
        self.request().with_path("node/get-block").with_height(height).send_get_bytes().await
    }

    pub async fn get_snapshot_info(&self) -> Result<SnapshotInfoResponse, NodeClientError> {
        self.request().with_path("node/get-snapshot-info").send_get().await
    }

    pub async fn get_snapshot(&self, height: u64) -> Result<Bytes, NodeClientError> {
        self.request().with_path("node/get-snapshot").with_height(height).send_get_bytes().await
    }

    pub async fn get_block_height(&self) -> Result<u64, NodeClientError> {
        let resp: GetBlockHeightResponse = self.request().with_path("node/get-height").send_get().await?;
        Ok(resp.height)
    }

    /// Submits a raw transaction for inclusion.
    pub async fn submit_tx(&self, raw_tx: Bytes) -> Result<(), NodeClientError> {
        let _resp: SubmitTxResponse = self.request().with_path("node/submit-tx").send_post(raw_tx).await?;
        Ok(())
    }

    /// Asks the node to sign a raw block. The receiving node transparently
    /// forwards the call to the current leader when it is not leading
    /// itself.
    pub async fn sign_block(&self, raw_block: Bytes) -> Result<Bytes, NodeClientError> {
        self.request().with_path("node/sign-block").send_post_bytes(raw_block).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use lp_api::{ApiError, ApiErrorCode};
    use url::Url;

    fn gzip(data: &[u8]) -> Vec<u8> {
        use flate2::write::GzEncoder;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn provider(server: &MockServer) -> NodeProvider {
        NodeProvider::new(Url::parse(&server.base_url()).unwrap())
    }

    #[tokio::test]
    async fn get_block_decompresses_the_payload() {
        let server = MockServer::start_async().await;
        let raw_block = b"raw block bytes".repeat(50);
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/node/get-block").query_param("height", "42");
                then.status(200).header("content-encoding", "gzip").body(gzip(&raw_block));
            })
            .await;

        let block = provider(&server).get_block(42).await.unwrap();
        mock.assert_async().await;
        assert_eq!(block, Bytes::from(raw_block));
    }

    #[tokio::test]
    async fn structured_errors_surface_verbatim() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/node/get-block");
                then.status(404)
                    .json_body(serde_json::to_value(ApiError::not_found("block at height 42")).unwrap());
            })
            .await;

        let err = provider(&server).get_block(42).await.unwrap_err();
        assert_matches!(err, NodeClientError::Api(api) if api.code == ApiErrorCode::NotFound);
    }

    #[tokio::test]
    async fn rate_limited_calls_map_to_the_rate_limited_code() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/node/get-height");
                then.status(429).json_body(serde_json::to_value(ApiError::rate_limited()).unwrap());
            })
            .await;

        let err = provider(&server).get_block_height().await.unwrap_err();
        assert_matches!(err, NodeClientError::Api(api) if api.code == ApiErrorCode::RateLimited);
    }

    #[tokio::test]
    async fn an_unparseable_error_body_is_its_own_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/node/get-height");
                then.status(500).body("<html>gateway exploded</html>");
            })
            .await;

        let err = provider(&server).get_block_height().await.unwrap_err();
        assert_matches!(err, NodeClientError::InvalidErrorPayload { http_status, .. } if http_status == 500);
    }

    #[tokio::test]
    async fn get_block_height_decodes_json() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/node/get-height");
                then.status(200).json_body(serde_json::json!({ "height": 7 }));
            })
            .await;

        assert_eq!(provider(&server).get_block_height().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn sign_block_sends_credentials_and_compressed_body() {
        let server = MockServer::start_async().await;
        let signature = b"sig-bytes".to_vec();
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/node/sign-block")
                    .header("content-encoding", "gzip")
                    .header_exists("authorization");
                then.status(200).body(signature.clone());
            })
            .await;

        let provider = provider(&server).with_access_token("alice:s3cret").unwrap();
        let sig = provider.sign_block(Bytes::from_static(b"raw block")).await.unwrap();
        mock.assert_async().await;
        assert_eq!(sig, Bytes::from(signature));
    }

    #[tokio::test]
    async fn submit_tx_round_trips() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/node/submit-tx");
                then.status(200).json_body(serde_json::json!({ "ok": true }));
            })
            .await;

        provider(&server).submit_tx(Bytes::from_static(b"raw tx")).await.unwrap();
    }
}
