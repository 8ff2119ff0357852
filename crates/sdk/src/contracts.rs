//! Solidity bindings for the fund protocol contracts.
//!
//! Uses alloy's `sol!` macro to generate ABI encoders/decoders for the fund
//! deployer, the comptroller and vault proxies, the address list registry,
//! ERC20 tokens and the integration adapters reached through `callOnExtension`.

use alloy::sol;

sol! {
    interface IFundDeployer {
        function createNewFund(
            address fundOwner,
            string fundName,
            string fundSymbol,
            address denominationAsset,
            uint256 sharesActionTimelock,
            bytes feeManagerConfigData,
            bytes policyManagerConfigData
        ) external returns (address comptrollerProxy, address vaultProxy);

        event NewFundCreated(address indexed creator, address vaultProxy, address comptrollerProxy);
    }

    interface IComptroller {
        function buyShares(uint256 investmentAmount, uint256 minSharesQuantity) external returns (uint256 sharesReceived);
        function redeemSharesInKind(
            address recipient,
            uint256 sharesQuantity,
            address[] additionalAssets,
            address[] assetsToSkip
        ) external returns (address[] payoutAssets, uint256[] payoutAmounts);
        function calcGav() external returns (uint256 gav);
        function calcGrossShareValue() external returns (uint256 grossShareValue);
        function getDenominationAsset() external view returns (address denominationAsset);
        function callOnExtension(address extension, uint256 actionId, bytes callArgs) external;
    }

    interface IVault {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }

    interface IERC20 {
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    interface IAddressListRegistry {
        function createList(address owner, uint8 updateType, address[] initialItems) external returns (uint256 id);

        event ListCreated(address indexed creator, address indexed owner, uint256 id, uint8 updateType);
    }

    interface IIntegrationAdapter {
        function takeOrder(address vaultProxy, bytes actionData, bytes assetData) external;
    }
}

/// Address list update policy: no additions or removals after creation
pub const LIST_UPDATE_TYPE_NONE: u8 = 0;

/// `callOnExtension` action id for calling an integration adapter
pub const INTEGRATION_ACTION_CALL_ON_INTEGRATION: u64 = 0;
