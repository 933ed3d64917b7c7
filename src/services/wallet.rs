use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use solana_account_decoder::UiAccountData;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_client::GetConfirmedSignaturesForAddress2Config,
    rpc_request::TokenAccountsFilter,
    rpc_response::{RpcConfirmedTransactionStatusWithSignature, RpcKeyedAccount},
};
use solana_sdk::{native_token::LAMPORTS_PER_SOL, pubkey::Pubkey};

use super::price::PriceFeed;
use super::Limiter;
use crate::types::models::{TransactionKind, WalletData, WalletToken, WalletTransaction};

pub const MAX_WALLET_TOKENS: usize = 20;
pub const MAX_WALLET_TRANSACTIONS: usize = 10;

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    Missing,
    Malformed,
}

impl AddressError {
    pub fn message(&self) -> &'static str {
        match self {
            AddressError::Missing => "Missing address parameter",
            AddressError::Malformed => "Invalid Solana address format",
        }
    }
}

/// Base-58, 32 to 44 characters, decoding to a 32-byte key. Does no I/O.
pub fn validate_address(address: &str) -> Result<Pubkey, AddressError> {
    if address.is_empty() {
        return Err(AddressError::Missing);
    }
    if !(32..=44).contains(&address.len()) || !address.chars().all(|c| BASE58_ALPHABET.contains(c)) {
        return Err(AddressError::Malformed);
    }
    Pubkey::from_str(address).map_err(|_| AddressError::Malformed)
}

#[derive(Clone)]
pub struct WalletService {
    rpc_client: Arc<RpcClient>,
    rate_limiter: Arc<Limiter>,
    prices: PriceFeed,
}

impl WalletService {
    pub fn new(rpc_client: Arc<RpcClient>, rate_limiter: Arc<Limiter>, prices: PriceFeed) -> Self {
        Self {
            rpc_client,
            rate_limiter,
            prices,
        }
    }

    /// Balance, SPL holdings and recent signatures for `owner`. Each part that fails
    /// degrades to zero or empty; the lookup fails only when every RPC call did.
    pub async fn lookup(&self, owner: &Pubkey) -> Result<WalletData> {
        let (balance, token_accounts, signatures, sol_price) = futures::join!(
            self.balance(owner),
            self.token_accounts(owner),
            self.signatures(owner),
            self.prices.sol_usd(),
        );

        if let (Err(e), Err(_), Err(_)) = (&balance, &token_accounts, &signatures) {
            return Err(anyhow::anyhow!("All wallet RPC calls failed for {}: {}", owner, e));
        }

        let lamports = balance.unwrap_or_else(|e| {
            tracing::warn!("getBalance failed for {}: {}", owner, e);
            0
        });
        let sol_price = sol_price.unwrap_or_else(|e| {
            tracing::warn!("SOL price unavailable: {:#}", e);
            0.0
        });
        let tokens = token_accounts
            .map(|accounts| holdings_from_accounts(&accounts))
            .unwrap_or_else(|e| {
                tracing::warn!("getTokenAccountsByOwner failed for {}: {}", owner, e);
                Vec::new()
            });
        let transactions = signatures
            .map(|sigs| transactions_from_signatures(&sigs))
            .unwrap_or_else(|e| {
                tracing::warn!("getSignaturesForAddress failed for {}: {}", owner, e);
                Vec::new()
            });

        let sol_balance = lamports as f64 / LAMPORTS_PER_SOL as f64;
        tracing::info!(
            "Wallet {}: {:.4} SOL, {} tokens, {} transactions",
            owner,
            sol_balance,
            tokens.len(),
            transactions.len()
        );

        Ok(WalletData {
            address: owner.to_string(),
            sol_balance,
            sol_usd_value: sol_balance * sol_price,
            tokens,
            transactions,
        })
    }

    async fn balance(&self, owner: &Pubkey) -> Result<u64> {
        self.rate_limiter.until_ready().await;
        Ok(self.rpc_client.get_balance(owner).await?)
    }

    async fn token_accounts(&self, owner: &Pubkey) -> Result<Vec<RpcKeyedAccount>> {
        self.rate_limiter.until_ready().await;
        let accounts = self
            .rpc_client
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::ProgramId(spl_token::id()))
            .await?;
        Ok(accounts)
    }

    async fn signatures(&self, owner: &Pubkey) -> Result<Vec<RpcConfirmedTransactionStatusWithSignature>> {
        self.rate_limiter.until_ready().await;
        let config = GetConfirmedSignaturesForAddress2Config {
            limit: Some(MAX_WALLET_TRANSACTIONS),
            ..Default::default()
        };
        let signatures = self
            .rpc_client
            .get_signatures_for_address_with_config(owner, config)
            .await?;
        Ok(signatures)
    }
}

fn holdings_from_accounts(accounts: &[RpcKeyedAccount]) -> Vec<WalletToken> {
    accounts
        .iter()
        .filter_map(|keyed| match &keyed.account.data {
            UiAccountData::Json(parsed) => parse_token_holding(&parsed.parsed),
            _ => {
                tracing::debug!("Token account {} was not jsonParsed", keyed.pubkey);
                None
            }
        })
        .filter(|t| t.amount > 0.0)
        .take(MAX_WALLET_TOKENS)
        .collect()
}

fn parse_token_holding(parsed: &serde_json::Value) -> Option<WalletToken> {
    let info = &parsed["info"];
    let mint = info["mint"].as_str()?.to_string();
    let token_amount = &info["tokenAmount"];
    let decimals = u8::try_from(token_amount["decimals"].as_u64()?).ok()?;

    // uiAmount is null for amounts that do not fit an f64 cleanly; the string form is always set.
    let amount = token_amount["uiAmount"].as_f64().or_else(|| {
        token_amount["uiAmountString"]
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
    })?;

    Some(WalletToken {
        symbol: mint.chars().take(6).collect::<String>().to_uppercase(),
        name: "SPL Token".to_string(),
        mint,
        amount,
        decimals,
        usd_value: None,
    })
}

fn transactions_from_signatures(
    signatures: &[RpcConfirmedTransactionStatusWithSignature],
) -> Vec<WalletTransaction> {
    signatures
        .iter()
        .take(MAX_WALLET_TRANSACTIONS)
        .map(|status| WalletTransaction {
            signature: status.signature.clone(),
            kind: if status.err.is_some() {
                TransactionKind::Failed
            } else {
                TransactionKind::Other
            },
            timestamp: status.block_time.unwrap_or(0).saturating_mul(1000),
            description: shorten_signature(&status.signature),
        })
        .collect()
}

fn shorten_signature(signature: &str) -> String {
    let chars: Vec<char> = signature.chars().collect();
    if chars.len() <= 14 {
        return signature.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{}…{}", head, tail)
}
