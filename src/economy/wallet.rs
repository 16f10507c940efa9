//! Wallet collaborator client
//!
//! The wallet/payment backend is an external service; the game only reads
//! balances and pushes deltas. This module is the entire surface the core
//! depends on: a trait for tests and a thin blocking HTTP client for
//! production. Webhook ingestion is provider-to-backend traffic and has no
//! client method here.

use std::env;
use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Base URL of the wallet backend
pub fn wallet_service_url() -> String {
    env::var("GAME_BACKEND_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

pub fn wallet_request_timeout() -> Duration {
    let millis = env::var("WALLET_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(10_000);
    Duration::from_millis(millis)
}

/// Externally owned balance record; the core never mutates it directly
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    #[serde(default)]
    pub gold_coins: u64,
    #[serde(default)]
    pub health_packs: u32,
    #[serde(default)]
    pub total_earned_coins: u64,
    #[serde(default)]
    pub total_earned_health_packs: u32,
    #[serde(default)]
    pub total_spent_usd: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EarnedCoinsReceipt {
    pub success: bool,
    pub coins_added: u64,
    pub new_balance: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpendReceipt {
    pub success: bool,
    pub new_balance: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthPackReceipt {
    pub success: bool,
    pub health_packs_remaining: u32,
}

/// Checkout handle for an in-app purchase, brokered by the backend through
/// its payment provider
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub success: bool,
    #[serde(default)]
    pub checkout_url: Option<String>,
    #[serde(default)]
    pub session_data: Option<String>,
    #[serde(default)]
    pub merchant_reference: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// The backend refused the request (bad amount, insufficient balance,
    /// no packs left)
    Rejected(String),
    /// The backend could not be reached or returned an unreadable body
    Unavailable,
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::Rejected(reason) => write!(f, "wallet rejected the request: {reason}"),
            WalletError::Unavailable => write!(f, "wallet service unavailable"),
        }
    }
}

impl std::error::Error for WalletError {}

/// The wallet operations the game core consumes
pub trait WalletClient {
    /// Idempotent balance read; absent players are provisioned with zero
    /// balances by the backend
    fn fetch_balance(&self, player_id: &str) -> Result<WalletBalance, WalletError>;

    /// Push a positive session-coin delta. The backend rejects amounts
    /// that are not strictly positive.
    fn add_earned_coins(&self, player_id: &str, amount: u64)
    -> Result<EarnedCoinsReceipt, WalletError>;

    fn spend_coins(&self, player_id: &str, amount: u64) -> Result<SpendReceipt, WalletError>;

    fn use_health_pack(&self, player_id: &str) -> Result<HealthPackReceipt, WalletError>;

    fn create_checkout(
        &self,
        player_id: &str,
        package_id: &str,
        email: Option<&str>,
    ) -> Result<CheckoutSession, WalletError>;
}

#[derive(Debug, Serialize)]
struct AddEarnedCoinsRequest<'a> {
    player_uuid: &'a str,
    amount: u64,
}

#[derive(Debug, Serialize)]
struct SpendRequest<'a> {
    player_uuid: &'a str,
    amount: u64,
}

#[derive(Debug, Serialize)]
struct UseHealthPackRequest<'a> {
    player_uuid: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateSessionRequest<'a> {
    player_uuid: &'a str,
    package_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: String,
}

/// Thin blocking reqwest client for the wallet backend. Blocking is
/// intentional: wallet sync only happens at checkpoints and a short stall
/// there is accepted.
pub struct HttpWalletClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl HttpWalletClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Client configured from `GAME_BACKEND_URL` / `WALLET_TIMEOUT_MS`
    pub fn from_env() -> Result<Self, reqwest::Error> {
        Self::new(wallet_service_url(), wallet_request_timeout())
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, WalletError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|_| WalletError::Unavailable)?;
        Self::decode(response)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, WalletError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .map_err(|_| WalletError::Unavailable)?;
        Self::decode(response)
    }

    fn decode<T: DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<T, WalletError> {
        if response.status().is_success() {
            return response.json::<T>().map_err(|_| WalletError::Unavailable);
        }
        if response.status() == StatusCode::BAD_REQUEST {
            let error = response
                .json::<ErrorResponse>()
                .map_err(|_| WalletError::Unavailable)?;
            return Err(WalletError::Rejected(error.detail));
        }
        Err(WalletError::Unavailable)
    }
}

impl WalletClient for HttpWalletClient {
    fn fetch_balance(&self, player_id: &str) -> Result<WalletBalance, WalletError> {
        self.get_json(&format!("/api/wallet/{player_id}"))
    }

    fn add_earned_coins(
        &self,
        player_id: &str,
        amount: u64,
    ) -> Result<EarnedCoinsReceipt, WalletError> {
        self.post_json(
            "/api/wallet/add-earned-coins",
            &AddEarnedCoinsRequest {
                player_uuid: player_id,
                amount,
            },
        )
    }

    fn spend_coins(&self, player_id: &str, amount: u64) -> Result<SpendReceipt, WalletError> {
        self.post_json(
            "/api/wallet/spend",
            &SpendRequest {
                player_uuid: player_id,
                amount,
            },
        )
    }

    fn use_health_pack(&self, player_id: &str) -> Result<HealthPackReceipt, WalletError> {
        self.post_json(
            "/api/wallet/use-health-pack",
            &UseHealthPackRequest {
                player_uuid: player_id,
            },
        )
    }

    fn create_checkout(
        &self,
        player_id: &str,
        package_id: &str,
        email: Option<&str>,
    ) -> Result<CheckoutSession, WalletError> {
        self.post_json(
            "/api/payment/create-session",
            &CreateSessionRequest {
                player_uuid: player_id,
                package_id,
                email,
            },
        )
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory wallet double shared by the economy and simulation tests

    use std::cell::{Cell, RefCell};

    use super::*;

    #[derive(Debug, Default)]
    pub(crate) struct StubWallet {
        pub balance: RefCell<WalletBalance>,
        /// When set, every request fails as if the backend were down
        pub fail_requests: Cell<bool>,
        /// Amounts credited through `add_earned_coins`, in call order
        pub credits: RefCell<Vec<u64>>,
    }

    impl StubWallet {
        pub fn with_balance(gold_coins: u64, health_packs: u32) -> Self {
            let stub = Self::default();
            stub.balance.borrow_mut().gold_coins = gold_coins;
            stub.balance.borrow_mut().health_packs = health_packs;
            stub
        }

        fn check_up(&self) -> Result<(), WalletError> {
            if self.fail_requests.get() {
                Err(WalletError::Unavailable)
            } else {
                Ok(())
            }
        }
    }

    impl WalletClient for StubWallet {
        fn fetch_balance(&self, _player_id: &str) -> Result<WalletBalance, WalletError> {
            self.check_up()?;
            Ok(self.balance.borrow().clone())
        }

        fn add_earned_coins(
            &self,
            _player_id: &str,
            amount: u64,
        ) -> Result<EarnedCoinsReceipt, WalletError> {
            self.check_up()?;
            if amount == 0 {
                return Err(WalletError::Rejected("Amount must be positive".to_string()));
            }
            let mut balance = self.balance.borrow_mut();
            balance.gold_coins += amount;
            balance.total_earned_coins += amount;
            self.credits.borrow_mut().push(amount);
            Ok(EarnedCoinsReceipt {
                success: true,
                coins_added: amount,
                new_balance: balance.gold_coins,
            })
        }

        fn spend_coins(&self, _player_id: &str, amount: u64) -> Result<SpendReceipt, WalletError> {
            self.check_up()?;
            let mut balance = self.balance.borrow_mut();
            if balance.gold_coins < amount {
                return Err(WalletError::Rejected("Insufficient balance".to_string()));
            }
            balance.gold_coins -= amount;
            Ok(SpendReceipt {
                success: true,
                new_balance: balance.gold_coins,
            })
        }

        fn use_health_pack(&self, _player_id: &str) -> Result<HealthPackReceipt, WalletError> {
            self.check_up()?;
            let mut balance = self.balance.borrow_mut();
            if balance.health_packs == 0 {
                return Err(WalletError::Rejected("No health packs available".to_string()));
            }
            balance.health_packs -= 1;
            Ok(HealthPackReceipt {
                success: true,
                health_packs_remaining: balance.health_packs,
            })
        }

        fn create_checkout(
            &self,
            player_id: &str,
            package_id: &str,
            _email: Option<&str>,
        ) -> Result<CheckoutSession, WalletError> {
            self.check_up()?;
            Ok(CheckoutSession {
                success: true,
                checkout_url: Some(format!("https://pay.example/{package_id}")),
                session_data: None,
                merchant_reference: Some(format!("{player_id}-{package_id}")),
                error: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_url_defaults_to_localhost() {
        // Only meaningful when the env var is unset, which is the common
        // test environment
        if env::var("GAME_BACKEND_URL").is_err() {
            assert_eq!(wallet_service_url(), "http://localhost:8000");
        }
    }

    #[test]
    fn test_error_display_is_descriptive() {
        let rejected = WalletError::Rejected("Amount must be positive".to_string());
        assert!(rejected.to_string().contains("Amount must be positive"));
        assert_eq!(WalletError::Unavailable.to_string(), "wallet service unavailable");
    }

    #[test]
    fn test_balance_deserializes_with_missing_fields() {
        let balance: WalletBalance = serde_json::from_str(r#"{"gold_coins": 500}"#).unwrap();
        assert_eq!(balance.gold_coins, 500);
        assert_eq!(balance.health_packs, 0);
        assert_eq!(balance.total_spent_usd, 0.0);
    }
}
