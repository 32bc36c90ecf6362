//! Process-wide active chain parameters.
//!
//! Start-up calls [`select_params`] once, before any other thread reads
//! [`params`]. Code that can take a `&ChainParams` argument should do so;
//! the global only exists for callers without an explicit context.
//!
//! [`update_version_bits_parameters`] is for single-threaded test setup.
//! Readers already holding an `Arc` from [`params`] keep the old values.

use crate::chainparams::{create_chain_params, ChainParams};
use crate::config::Config;
use crate::consensus::DeploymentPos;
use crate::error::ChainError;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info};

static GLOBAL_CHAIN_PARAMS: Lazy<RwLock<Option<Arc<ChainParams>>>> = Lazy::new(|| RwLock::new(None));

/// Builds the parameters for `network` and makes them the active set,
/// replacing any previous selection.
///
/// An unknown name is returned as an error and leaves the current selection
/// untouched. A genesis integrity failure means the parameter table is
/// corrupt and aborts the process.
pub fn select_params(network: &str) -> Result<(), ChainError> {
    let params = checked(create_chain_params(network))?;
    activate(params);
    Ok(())
}

/// Selects the configured network with its version-bits overrides applied.
///
/// The profile is stored only once every override has been applied, so a
/// failing override leaves the previous selection in place.
pub fn select_from_config(config: &Config) -> Result<(), ChainError> {
    let mut params = checked(create_chain_params(&config.chain.network))?;
    config.apply_to(&mut params)?;
    activate(params);
    Ok(())
}

fn checked(built: Result<ChainParams, ChainError>) -> Result<ChainParams, ChainError> {
    match built {
        Err(err @ ChainError::GenesisIntegrity { .. }) => {
            error!("refusing to run with inconsistent chain params: {}", err);
            panic!("{}", err);
        }
        other => other,
    }
}

fn activate(params: ChainParams) {
    info!(
        "selected chain {} (genesis {})",
        params.network_id(),
        params.consensus.hash_genesis_block
    );
    *GLOBAL_CHAIN_PARAMS.write() = Some(Arc::new(params));
}

/// The active parameters.
///
/// # Panics
///
/// If [`select_params`] has never succeeded.
pub fn params() -> Arc<ChainParams> {
    match try_params() {
        Some(params) => params,
        None => {
            error!("chain params read before selection");
            panic!("chain params read before select_params");
        }
    }
}

pub fn try_params() -> Option<Arc<ChainParams>> {
    GLOBAL_CHAIN_PARAMS.read().clone()
}

/// Overrides the signalling window of one deployment in the active set.
///
/// # Panics
///
/// If [`select_params`] has never succeeded.
pub fn update_version_bits_parameters(pos: DeploymentPos, start_time: i64, timeout: i64) {
    let mut guard = GLOBAL_CHAIN_PARAMS.write();
    let Some(active) = guard.as_mut() else {
        error!("version bits override before selection");
        panic!("chain params read before select_params");
    };

    info!("overriding {} window: start {} timeout {}", pos, start_time, timeout);
    Arc::make_mut(active).update_version_bits_parameters(pos, start_time, timeout);
}

/// Serializes tests that touch the process-wide selection.
#[cfg(test)]
pub(crate) static TEST_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

#[cfg(test)]
pub(crate) fn reset_for_tests() {
    *GLOBAL_CHAIN_PARAMS.write() = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chainparams::Network;
    use crate::config::{ChainConfig, VersionBitsOverride};

    #[test]
    fn test_select_then_read() {
        let _guard = TEST_LOCK.lock();
        for network in Network::ALL {
            select_params(network.as_str()).unwrap();
            assert_eq!(params().network_id(), network.as_str());
        }
    }

    #[test]
    fn test_unknown_network_keeps_previous() {
        let _guard = TEST_LOCK.lock();
        select_params("test").unwrap();

        let err = select_params("bogus").unwrap_err();
        assert_eq!(err, ChainError::UnknownNetwork("bogus".to_string()));
        assert_eq!(params().network_id(), "test");
    }

    #[test]
    fn test_read_before_select_panics() {
        let _guard = TEST_LOCK.lock();
        reset_for_tests();
        assert!(try_params().is_none());
        let result = std::panic::catch_unwind(params);
        assert!(result.is_err());
    }

    #[test]
    fn test_select_from_config_applies_overrides() {
        let _guard = TEST_LOCK.lock();
        let config = Config::from_toml(
            "[chain]\nnetwork = \"regtest\"\n\n[[chain.vbparams]]\ndeployment = \"testdummy\"\nstart_time = 7\ntimeout = 9\n",
        )
        .unwrap();
        select_from_config(&config).unwrap();

        let active = params();
        assert_eq!(active.network_id(), "regtest");
        let dummy = active.consensus.deployment(DeploymentPos::TestDummy);
        assert_eq!((dummy.bit, dummy.start_time, dummy.timeout), (28, 7, 9));
    }

    #[test]
    fn test_override_touches_only_one_window() {
        let _guard = TEST_LOCK.lock();
        select_params("main").unwrap();
        let before = params();

        update_version_bits_parameters(DeploymentPos::Csv, 100, 200);
        let after = params();

        let csv = after.consensus.deployment(DeploymentPos::Csv);
        assert_eq!(csv.start_time, 100);
        assert_eq!(csv.timeout, 200);
        assert_eq!(csv.bit, before.consensus.deployment(DeploymentPos::Csv).bit);
        for pos in [DeploymentPos::TestDummy, DeploymentPos::Segwit] {
            assert_eq!(after.consensus.deployment(pos), before.consensus.deployment(pos));
        }

        // the snapshot taken earlier is unaffected
        assert_eq!(before.consensus.deployment(DeploymentPos::Csv).start_time, 1485561600);
    }

    #[test]
    fn test_genesis_mismatch_panics_without_storing() {
        let _guard = TEST_LOCK.lock();
        select_params("main").unwrap();

        let corrupt = Err(ChainError::GenesisIntegrity {
            network: "main".to_string(),
            field: "block hash",
            expected: "00".repeat(32),
            computed: "11".repeat(32),
        });
        let result = std::panic::catch_unwind(move || checked(corrupt).map(activate));
        assert!(result.is_err());
        assert_eq!(params().network_id(), "main");
    }

    #[test]
    fn test_failed_override_keeps_previous_selection() {
        let _guard = TEST_LOCK.lock();
        select_params("test").unwrap();

        // built directly so validation does not catch the bad entry first
        let config = Config {
            chain: ChainConfig {
                network: "regtest".to_string(),
                vbparams: vec![
                    VersionBitsOverride {
                        deployment: "csv".to_string(),
                        start_time: 1,
                        timeout: 2,
                    },
                    VersionBitsOverride {
                        deployment: "taproot".to_string(),
                        start_time: 1,
                        timeout: 2,
                    },
                ],
            },
        };
        assert_eq!(
            select_from_config(&config),
            Err(ChainError::UnknownDeployment("taproot".to_string()))
        );

        let active = params();
        assert_eq!(active.network_id(), "test");
        assert_eq!(active.consensus.deployment(DeploymentPos::Csv).start_time, 1483228800);
    }
}
