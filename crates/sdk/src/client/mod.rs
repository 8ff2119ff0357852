pub mod address_list;
pub mod base;
pub mod deploy;
pub mod extension;
pub mod invest;
pub mod query;
pub mod token;

use std::sync::Arc;

use crate::config::SdkConfig;

pub use address_list::AddressListService;
pub use base::BaseClient;
pub use deploy::DeploymentService;
pub use extension::{ExtensionService, SwapOrder};
pub use invest::{min_shares_for, ApprovalMode, DepositOptions, InvestmentService, MinShares};
pub use query::FundQueryService;
pub use token::TokenService;

/// Fund interaction client with service-based architecture
///
/// Services hold configuration only. The chain connection is passed to every
/// operation, so one client can serve many accounts.
pub struct FundClient {
    /// Shared configuration and call plumbing
    pub base: Arc<BaseClient>,
    /// Fund deployment service
    pub deployment: DeploymentService,
    /// Fund state queries
    pub funds: FundQueryService,
    /// Deposits and redemptions
    pub investment: InvestmentService,
    /// ERC20 approvals and balances
    pub tokens: TokenService,
    /// Address list registry
    pub address_lists: AddressListService,
    /// Integration adapter calls
    pub extensions: ExtensionService,
}

impl FundClient {
    pub fn new(config: SdkConfig) -> Self {
        let base = Arc::new(BaseClient::new(config));
        let tokens = TokenService::new(base.clone());
        let address_lists = AddressListService::new(base.clone());

        Self {
            deployment: DeploymentService::new(base.clone(), address_lists.clone()),
            funds: FundQueryService::new(base.clone()),
            investment: InvestmentService::new(base.clone(), tokens.clone()),
            extensions: ExtensionService::new(base.clone()),
            tokens,
            address_lists,
            base,
        }
    }

    pub fn config(&self) -> &SdkConfig {
        self.base.config()
    }
}
