use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use fundhub_types::{BestEffort, FundDeployment, FundDeploymentRequest, FundError, FundHandle};
use tracing::{debug, info, warn};

use crate::{
    calls::{
        empty_extension_config, encode_entrance_fee, encode_extension_config, encode_list_policy,
        find_event,
    },
    client::{AddressListService, BaseClient},
    connection::{CallRequest, ChainConnection, ChainError},
    contracts::IFundDeployer,
    error::SdkResult,
};

/// Service for deploying new funds through the fund deployer
///
/// Candidate fee and policy configurations are dry-run with `estimate_gas`
/// before they are accepted. Only after every probe passes is the single
/// deployment transaction submitted.
#[derive(Clone)]
pub struct DeploymentService {
    base: Arc<BaseClient>,
    address_lists: AddressListService,
}

/// Arguments shared by every probe and the final submission
struct DeploymentCall<'a> {
    deployer: Address,
    signer: Address,
    owner: Address,
    request: &'a FundDeploymentRequest,
}

impl DeploymentCall<'_> {
    fn encode(&self, fee_config: &Bytes, policy_config: &Bytes) -> CallRequest {
        let call = IFundDeployer::createNewFundCall {
            fundOwner: self.owner,
            fundName: self.request.fund_name.clone(),
            fundSymbol: self.request.fund_symbol.clone(),
            denominationAsset: self.request.denomination_asset,
            sharesActionTimelock: U256::from(self.request.shares_action_timelock),
            feeManagerConfigData: fee_config.clone(),
            policyManagerConfigData: policy_config.clone(),
        };
        CallRequest::new(self.deployer, call.abi_encode()).from(self.signer)
    }
}

impl DeploymentService {
    pub fn new(base: Arc<BaseClient>, address_lists: AddressListService) -> Self {
        Self {
            base,
            address_lists,
        }
    }

    /// Deploy a fund and resolve its vault and comptroller proxies
    pub async fn create_fund(
        &self,
        conn: &dyn ChainConnection,
        request: &FundDeploymentRequest,
    ) -> SdkResult<FundDeployment> {
        request.validate()?;
        let signer = BaseClient::signer(conn)?;
        let addresses = self.base.addresses();
        let call = DeploymentCall {
            deployer: addresses.fund_deployer,
            signer,
            owner: request.manager.unwrap_or(signer),
            request,
        };

        info!(
            "Deploying fund {} ({}) denominated in {}",
            request.fund_name, request.fund_symbol, request.denomination_asset
        );

        // Baseline: no fees, no policies
        let mut fee_config = empty_extension_config();
        let mut policy_config = empty_extension_config();
        self.probe(conn, &call, &fee_config, &policy_config).await?;

        if let Some(fee) = &request.entrance_fee {
            let settings = encode_entrance_fee(fee.rate_bps, fee.recipient.unwrap_or(signer));
            let candidate =
                encode_extension_config(&[addresses.entrance_rate_direct_fee], &[settings]);
            if let Err(err) = self.probe(conn, &call, &candidate, &policy_config).await {
                warn!("Entrance fee probe failed: {}", err);
                return Err(FundError::IncompatibleFeeModule {
                    reason: err.to_string(),
                });
            }
            fee_config = candidate;
        }

        let whitelist = if request.whitelist.is_empty() {
            None
        } else {
            let list = self
                .address_lists
                .create_list(conn, &request.whitelist)
                .await;
            match &list {
                BestEffort::Completed(created) => {
                    let settings = encode_list_policy(&[created.list_id]);
                    let candidate = encode_extension_config(
                        &[addresses.allowed_deposit_recipients_policy],
                        &[settings],
                    );
                    if let Err(err) = self.probe(conn, &call, &fee_config, &candidate).await {
                        warn!("Whitelist policy probe failed: {}", err);
                        return Err(FundError::IncompatiblePolicyModule {
                            reason: err.to_string(),
                        });
                    }
                    policy_config = candidate;
                }
                BestEffort::Skipped(err) => {
                    warn!("Deploying without deposit whitelist: {}", err);
                }
            }
            Some(list)
        };

        let estimate = self.probe(conn, &call, &fee_config, &policy_config).await?;
        let gas_limit = self.base.gas().with_deployment_margin(estimate);
        debug!("Deployment gas estimate {}, submitting with {}", estimate, gas_limit);

        let submission = call.encode(&fee_config, &policy_config).gas_limit(gas_limit);
        let receipt = self.base.submit(conn, submission, "Fund deployment").await?;

        let deployer = self.base.addresses().fund_deployer;
        let created = find_event::<IFundDeployer::NewFundCreated>(&receipt.logs, deployer)
            .ok_or_else(|| {
                warn!("NewFundCreated from {} missing in {}", deployer, receipt.tx_hash);
                FundError::AddressResolutionFailed {
                    tx_hash: receipt.tx_hash.to_string(),
                }
            })?;

        let handle = FundHandle {
            vault_proxy: created.vaultProxy,
            comptroller_proxy: created.comptrollerProxy,
        };
        info!(
            "Fund deployed: vault {}, comptroller {}",
            handle.vault_proxy, handle.comptroller_proxy
        );

        Ok(FundDeployment {
            tx_hash: receipt.tx_hash,
            handle,
            whitelist,
        })
    }

    /// Dry-run `createNewFund`; an error means the configuration is rejected
    async fn probe(
        &self,
        conn: &dyn ChainConnection,
        call: &DeploymentCall<'_>,
        fee_config: &Bytes,
        policy_config: &Bytes,
    ) -> Result<u64, ChainError> {
        conn.estimate_gas(&call.encode(fee_config, policy_config)).await
    }
}
