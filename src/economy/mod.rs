//! In-session economy bookkeeping
//!
//! Score, coins, health and lives accumulate locally; the externally owned
//! wallet only ever sees "add N" deltas at checkpoints (level completion,
//! treasure unlock, explicit save, exit flush). A failed wallet call never
//! touches local state, so gameplay continues and a later retry is safe.

pub mod wallet;

pub use wallet::{
    CheckoutSession, HttpWalletClient, WalletBalance, WalletClient, WalletError,
};

use std::fmt;

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EconomyError {
    /// The session accumulator is empty; saving would be a zero delta
    NothingToSave,
    Wallet(WalletError),
}

impl fmt::Display for EconomyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EconomyError::NothingToSave => write!(f, "no session coins to save"),
            EconomyError::Wallet(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for EconomyError {}

impl From<WalletError> for EconomyError {
    fn from(err: WalletError) -> Self {
        EconomyError::Wallet(err)
    }
}

/// Snapshot of the session for HUD panels and end-of-run summaries
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub score: u64,
    pub health: i32,
    pub session_coins: u64,
    pub lives: u8,
    pub wallet: WalletBalance,
}

/// Per-run score/coin/health bookkeeping with a borrowed wallet client.
///
/// The session never owns the wallet; it pushes deltas and re-reads the
/// resulting balance. The credit call itself is not idempotent on the
/// backend side, so retries after a *reported* success would double-pay;
/// retries after a failure are safe because the accumulator is untouched.
pub struct EconomySession<'a> {
    wallet: &'a dyn WalletClient,
    player_id: String,
    pub score: u64,
    pub session_coins: u64,
    pub health: i32,
    max_health: i32,
    pub lives: u8,
    cached_balance: Option<WalletBalance>,
}

impl<'a> EconomySession<'a> {
    /// Create a session and do a best-effort initial balance read
    pub fn new(wallet: &'a dyn WalletClient, player_id: impl Into<String>) -> Self {
        let mut session = Self {
            wallet,
            player_id: player_id.into(),
            score: 0,
            session_coins: 0,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            lives: INITIAL_LIVES,
            cached_balance: None,
        };
        if !session.sync_wallet() {
            log::warn!("wallet unavailable at session start, continuing with an empty balance");
        }
        session
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn add_score(&mut self, amount: u64) {
        self.score += amount;
    }

    /// Record coins earned this session; persisted at the next checkpoint
    pub fn earn_coins(&mut self, amount: u64) {
        self.session_coins += amount;
    }

    /// Clamp and adopt the player's current health
    pub fn update_health(&mut self, health: i32) {
        self.health = health.clamp(0, self.max_health);
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.update_health(self.health - amount);
    }

    pub fn heal(&mut self, amount: i32) {
        self.update_health(self.health + amount);
    }

    pub fn grant_life(&mut self) {
        if self.lives < MAX_LIVES {
            self.lives += 1;
        }
    }

    /// Last balance read from the wallet service (zeroes before any sync)
    pub fn wallet_balance(&self) -> WalletBalance {
        self.cached_balance.clone().unwrap_or_default()
    }

    /// Wallet coins plus whatever this session has not persisted yet
    pub fn total_coins(&self) -> u64 {
        self.wallet_balance().gold_coins + self.session_coins
    }

    /// Refresh the cached balance. Returns false when the wallet could not
    /// be reached; the stale cache is kept.
    pub fn sync_wallet(&mut self) -> bool {
        match self.wallet.fetch_balance(&self.player_id) {
            Ok(balance) => {
                self.cached_balance = Some(balance);
                true
            }
            Err(err) => {
                log::warn!("wallet sync failed: {err}");
                false
            }
        }
    }

    /// Push the session accumulator to the wallet as one delta.
    ///
    /// An empty accumulator is a structured no-op failure. On success the
    /// accumulator is zeroed and the cached balance refreshed; on failure
    /// everything local is untouched.
    pub fn save_session_coins(&mut self) -> Result<u64, EconomyError> {
        if self.session_coins == 0 {
            return Err(EconomyError::NothingToSave);
        }
        let amount = self.session_coins;
        let receipt = self.wallet.add_earned_coins(&self.player_id, amount)?;
        self.session_coins = 0;
        if !self.sync_wallet() {
            // Keep the cache coherent from the receipt when the follow-up
            // read fails
            let balance = self.cached_balance.get_or_insert_with(WalletBalance::default);
            balance.gold_coins = receipt.new_balance;
        }
        log::info!("saved {amount} session coins to wallet");
        Ok(receipt.coins_added)
    }

    /// Spend wallet coins; returns the new balance
    pub fn spend_coins(&mut self, amount: u64) -> Result<u64, EconomyError> {
        let receipt = self.wallet.spend_coins(&self.player_id, amount)?;
        self.sync_wallet();
        Ok(receipt.new_balance)
    }

    /// Consume one wallet health pack and heal; returns packs remaining
    pub fn use_health_pack(&mut self) -> Result<u32, EconomyError> {
        let receipt = self.wallet.use_health_pack(&self.player_id)?;
        self.heal(HEALTH_PACK_HEAL);
        self.sync_wallet();
        Ok(receipt.health_packs_remaining)
    }

    /// Start a purchase through the backend's payment provider
    pub fn create_checkout(
        &self,
        package_id: &str,
        email: Option<&str>,
    ) -> Result<CheckoutSession, EconomyError> {
        Ok(self
            .wallet
            .create_checkout(&self.player_id, package_id, email)?)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            score: self.score,
            health: self.health,
            session_coins: self.session_coins,
            lives: self.lives,
            wallet: self.wallet_balance(),
        }
    }

    /// Zero the session for a new game and re-read the wallet
    pub fn reset(&mut self) {
        self.score = 0;
        self.session_coins = 0;
        self.health = self.max_health;
        self.lives = INITIAL_LIVES;
        self.sync_wallet();
    }
}

#[cfg(test)]
mod tests {
    use super::wallet::test_support::StubWallet;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_save_with_empty_accumulator_is_a_noop_failure() {
        let stub = StubWallet::default();
        let mut session = EconomySession::new(&stub, "p1");

        assert_eq!(session.save_session_coins(), Err(EconomyError::NothingToSave));
        assert!(stub.credits.borrow().is_empty());
        assert_eq!(stub.balance.borrow().gold_coins, 0);
    }

    #[test]
    fn test_save_pushes_delta_and_refreshes_balance() {
        let stub = StubWallet::with_balance(100, 0);
        let mut session = EconomySession::new(&stub, "p1");
        session.earn_coins(250);

        let saved = session.save_session_coins().unwrap();

        assert_eq!(saved, 250);
        assert_eq!(session.session_coins, 0);
        assert_eq!(session.wallet_balance().gold_coins, 350);
        assert_eq!(stub.credits.borrow().as_slice(), &[250]);
    }

    #[test]
    fn test_failed_save_leaves_accumulator_for_retry() {
        let stub = StubWallet::default();
        let mut session = EconomySession::new(&stub, "p1");
        session.earn_coins(80);

        stub.fail_requests.set(true);
        assert_eq!(
            session.save_session_coins(),
            Err(EconomyError::Wallet(WalletError::Unavailable))
        );
        assert_eq!(session.session_coins, 80);

        // Retry once the wallet is back
        stub.fail_requests.set(false);
        assert_eq!(session.save_session_coins(), Ok(80));
        assert_eq!(session.session_coins, 0);
        assert_eq!(session.wallet_balance().gold_coins, 80);
    }

    #[test]
    fn test_total_coins_includes_unsaved_session_earnings() {
        let stub = StubWallet::with_balance(40, 0);
        let mut session = EconomySession::new(&stub, "p1");
        session.earn_coins(5);
        assert_eq!(session.total_coins(), 45);
    }

    #[test]
    fn test_health_pack_heals_and_decrements_backend() {
        let stub = StubWallet::with_balance(0, 2);
        let mut session = EconomySession::new(&stub, "p1");
        session.update_health(40);

        let remaining = session.use_health_pack().unwrap();
        assert_eq!(remaining, 1);
        assert_eq!(session.health, 40 + HEALTH_PACK_HEAL);

        // Drain the packs and confirm the structured failure
        session.use_health_pack().unwrap();
        assert!(matches!(
            session.use_health_pack(),
            Err(EconomyError::Wallet(WalletError::Rejected(_)))
        ));
    }

    #[test]
    fn test_spend_insufficient_balance_is_rejected() {
        let stub = StubWallet::with_balance(10, 0);
        let mut session = EconomySession::new(&stub, "p1");

        assert!(matches!(
            session.spend_coins(50),
            Err(EconomyError::Wallet(WalletError::Rejected(_)))
        ));
        assert_eq!(session.wallet_balance().gold_coins, 10);

        assert_eq!(session.spend_coins(10), Ok(0));
        assert_eq!(session.wallet_balance().gold_coins, 0);
    }

    #[test]
    fn test_checkout_session_carries_a_url_and_reference() {
        let stub = StubWallet::default();
        let session = EconomySession::new(&stub, "p1");

        let checkout = session.create_checkout("gold_100", None).unwrap();
        assert!(checkout.success);
        assert!(checkout.checkout_url.is_some());
        assert!(checkout.merchant_reference.is_some());
    }

    #[test]
    fn test_lives_are_capped() {
        let stub = StubWallet::default();
        let mut session = EconomySession::new(&stub, "p1");
        for _ in 0..10 {
            session.grant_life();
        }
        assert_eq!(session.lives, MAX_LIVES);
    }

    #[test]
    fn test_reset_clears_session_but_not_wallet() {
        let stub = StubWallet::with_balance(500, 1);
        let mut session = EconomySession::new(&stub, "p1");
        session.add_score(900);
        session.earn_coins(300);
        session.update_health(15);

        session.reset();

        assert_eq!(session.score, 0);
        assert_eq!(session.session_coins, 0);
        assert_eq!(session.health, PLAYER_MAX_HEALTH);
        assert_eq!(session.wallet_balance().gold_coins, 500);
    }

    proptest! {
        /// Health stays inside [0, max] under any damage/heal sequence
        #[test]
        fn prop_health_is_always_clamped(steps in prop::collection::vec(-300i32..300, 0..64)) {
            let stub = StubWallet::default();
            let mut session = EconomySession::new(&stub, "p1");
            for step in steps {
                if step < 0 {
                    session.take_damage(-step);
                } else {
                    session.heal(step);
                }
                prop_assert!((0..=PLAYER_MAX_HEALTH).contains(&session.health));
            }
        }
    }
}
