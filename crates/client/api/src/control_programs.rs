//! Batch control-program creation.

use crate::batch::run_batch;
use crate::domain::AccountManager;
use crate::errors::run_or_canceled;
use crate::ApiHandler;
use lp_api::batch::{BatchResult, ControlProgram, CreateControlProgramRequest, CreateControlProgramsRequest};
use lp_api::ApiError;
use lp_utils::service::ServiceContext;
use std::sync::Arc;

impl ApiHandler {
    /// Creates one control program per request, concurrently. An item naming
    /// an unknown account alias fails alone.
    pub async fn create_control_programs(
        &self,
        ctx: &ServiceContext,
        req: CreateControlProgramsRequest,
    ) -> Vec<BatchResult<ControlProgram>> {
        let accounts = Arc::clone(&self.accounts);
        run_batch(ctx, req.requests, move |subctx, item| {
            let accounts = Arc::clone(&accounts);
            create_control_program(accounts, subctx, item)
        })
        .await
    }
}

async fn create_control_program(
    accounts: Arc<dyn AccountManager>,
    ctx: ServiceContext,
    req: CreateControlProgramRequest,
) -> Result<ControlProgram, ApiError> {
    match req {
        CreateControlProgramRequest::Account { account_id, account_alias } => {
            let account_id = if account_id.is_empty() {
                run_or_canceled(&ctx, accounts.find_by_alias(&account_alias)).await?.id
            } else {
                account_id
            };

            let control_program = run_or_canceled(&ctx, accounts.create_control_program(&account_id, false)).await?;
            Ok(ControlProgram { control_program })
        }
    }
}
