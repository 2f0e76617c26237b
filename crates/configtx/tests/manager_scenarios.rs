//! # Config Manager Scenarios
//!
//! End-to-end validate/apply behaviour through the public API.
//!
//! ## Test Categories
//!
//! 1. **Envelope shape** - channel mismatch, empty update, missing chain ID, limits
//! 2. **Versioning** - replay, regression, stale new entries, silent modification
//! 3. **Deletion** - omitted entries
//! 4. **Authorization** - modified and new entries checked, unchanged entries not
//! 5. **Handler** - semantic rejection, commit notification
//! 6. **Convergence** - identical digests for identical histories

use configtx::{
    ConfigManager, ConfigSnapshot, ConfigTxApi, ConfigTxConfig, ConfigTxError,
    ConfigUpdateEnvelope, ConfigValue, ErrorKind, RecordingHandler, RejectAllPolicy, SignedData,
    StaticPolicyManager,
};
use std::sync::Arc;

// =============================================================================
// TEST HELPERS
// =============================================================================

const DEFAULT_CHAIN: &str = "DefaultChainID";

type Manager = ConfigManager<StaticPolicyManager, RecordingHandler>;

struct Harness {
    manager: Manager,
    policies: Arc<StaticPolicyManager>,
    handler: Arc<RecordingHandler>,
}

fn pair(name: &str, policy: &str, version: u64, data: &[u8]) -> (String, ConfigValue) {
    (name.to_string(), ConfigValue::new(data.to_vec(), version, policy))
}

fn genesis(chain: &str, pairs: Vec<(String, ConfigValue)>) -> ConfigSnapshot {
    pairs
        .into_iter()
        .fold(ConfigSnapshot::new(chain), |s, (k, v)| s.with_entry(k, v))
}

fn update(chain: &str, pairs: Vec<(String, ConfigValue)>) -> ConfigUpdateEnvelope {
    pairs
        .into_iter()
        .fold(ConfigUpdateEnvelope::new(chain), |u, (k, v)| u.with_entry(k, v))
        .with_signature(SignedData::new(b"update".to_vec(), b"admin".to_vec(), b"sig".to_vec()))
}

fn harness(pairs: Vec<(String, ConfigValue)>) -> Harness {
    let policies = Arc::new(StaticPolicyManager::permissive());
    let handler = Arc::new(RecordingHandler::new());
    let manager = ConfigManager::new(
        genesis(DEFAULT_CHAIN, pairs),
        Arc::clone(&policies),
        Arc::clone(&handler),
        Vec::new(),
    )
    .expect("genesis should be accepted");
    Harness {
        manager,
        policies,
        handler,
    }
}

/// Both validate and apply must fail with `kind`, leaving state untouched
fn assert_rejected(h: &Harness, upd: &ConfigUpdateEnvelope, kind: ErrorKind) -> ConfigTxError {
    let before = h.manager.current_config();
    let commits = h.handler.committed();

    let validate_err = h.manager.validate(upd).unwrap_err();
    assert_eq!(validate_err.kind(), kind, "validate: {validate_err}");

    let apply_err = h.manager.apply(upd).unwrap_err();
    assert_eq!(apply_err, validate_err);

    let after = h.manager.current_config();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(before.digest(), after.digest());
    assert_eq!(h.handler.committed(), commits);
    apply_err
}

// =============================================================================
// ENVELOPE SHAPE
// =============================================================================

#[test]
fn test_different_chain_id() {
    let h = harness(vec![pair("foo", "foo", 0, b"foo")]);
    let upd = update("wrongChain", vec![pair("foo", "foo", 1, b"foo")]);

    let err = assert_rejected(&h, &upd, ErrorKind::ChannelMismatch);
    assert_eq!(
        err,
        ConfigTxError::ChannelMismatch {
            expected: DEFAULT_CHAIN.into(),
            actual: "wrongChain".into(),
        }
    );
}

#[test]
fn test_empty_config_update() {
    let h = harness(vec![pair("foo", "foo", 0, b"foo")]);
    let upd = ConfigUpdateEnvelope::new(DEFAULT_CHAIN);
    assert_rejected(&h, &upd, ErrorKind::EmptyUpdate);
}

#[test]
fn test_default_envelope_rejected() {
    let h = harness(vec![pair("foo", "foo", 0, b"foo")]);
    // Carries no channel header at all
    assert_rejected(&h, &ConfigUpdateEnvelope::default(), ErrorKind::ChannelMismatch);
}

#[test]
fn test_missing_chain_id() {
    let result = ConfigManager::new(
        genesis("", vec![pair("foo", "foo", 0, b"foo")]),
        Arc::new(StaticPolicyManager::permissive()),
        Arc::new(RecordingHandler::new()),
        Vec::new(),
    );
    assert!(matches!(result, Err(ConfigTxError::MissingChainId)));
}

#[test]
fn test_genesis_is_trusted() {
    // Policies and handler would reject, but genesis is not checked
    let policies = Arc::new(StaticPolicyManager::new());
    let handler = Arc::new(RecordingHandler::new());
    handler.set_rejection(Some("no".into()));

    let manager = ConfigManager::new(
        genesis(DEFAULT_CHAIN, vec![pair("foo", "foo", 7, b"foo")]),
        policies,
        Arc::clone(&handler),
        Vec::new(),
    )
    .unwrap();

    assert_eq!(manager.current_config().watermark(), 7);
    assert!(handler.proposed().is_empty());
}

#[test]
fn test_genesis_outside_limits_rejected() {
    let config = ConfigTxConfig {
        max_payload_bytes: 4,
        ..Default::default()
    };
    let result = ConfigManager::with_config(
        config,
        genesis(
            DEFAULT_CHAIN,
            vec![pair("big", "big", 0, &[0u8; 10]), pair("foo", "foo", 0, b"foo")],
        ),
        Arc::new(StaticPolicyManager::permissive()),
        Arc::new(RecordingHandler::new()),
        Vec::new(),
    );

    let err = result.err().expect("oversized genesis must be rejected");
    assert_eq!(err.kind(), ErrorKind::LimitExceeded);
    assert_eq!(err.key(), Some("big"));
}

#[test]
fn test_genesis_within_limits_stays_updatable() {
    let config = ConfigTxConfig {
        max_payload_bytes: 10,
        max_write_set_entries: 2,
        ..Default::default()
    };
    let manager = ConfigManager::with_config(
        config,
        genesis(
            DEFAULT_CHAIN,
            vec![pair("big", "big", 0, &[0u8; 10]), pair("foo", "foo", 0, b"foo")],
        ),
        Arc::new(StaticPolicyManager::permissive()),
        Arc::new(RecordingHandler::new()),
        Vec::new(),
    )
    .unwrap();

    let upd = update(
        DEFAULT_CHAIN,
        vec![pair("big", "big", 0, &[0u8; 10]), pair("foo", "foo", 1, b"foo")],
    );
    manager.apply(&upd).unwrap();
    assert_eq!(manager.sequence(), 1);
}

// =============================================================================
// VERSIONING
// =============================================================================

#[test]
fn test_valid_config_change() {
    let h = harness(vec![pair("foo", "foo", 0, b"foo")]);
    let upd = update(DEFAULT_CHAIN, vec![pair("foo", "foo", 1, b"foo")]);

    h.manager.validate(&upd).unwrap();
    let applied = h.manager.apply(&upd).unwrap();

    let current = h.manager.current_config();
    assert_eq!(current.get("foo").map(|v| v.version), Some(1));
    assert_eq!(current.sequence(), 1);
    assert_eq!(applied.diff.modified().collect::<Vec<_>>(), vec!["foo"]);
    assert_eq!(h.handler.committed(), vec![1]);
}

#[test]
fn test_old_config_replay() {
    let h = harness(vec![pair("foo", "foo", 0, b"foo")]);
    let upd = update(DEFAULT_CHAIN, vec![pair("foo", "foo", 0, b"foo")]);
    let err = assert_rejected(&h, &upd, ErrorKind::InvalidSequence);
    assert_eq!(err, ConfigTxError::ReplayedUpdate);
}

#[test]
fn test_reapplying_update_fails() {
    let h = harness(vec![pair("foo", "foo", 0, b"foo")]);
    let upd = update(DEFAULT_CHAIN, vec![pair("foo", "foo", 1, b"foo2")]);

    h.manager.apply(&upd).unwrap();
    let err = h.manager.apply(&upd).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidSequence);
    assert_eq!(h.manager.sequence(), 1);
}

#[test]
fn test_config_change_regressed_sequence() {
    let h = harness(vec![pair("foo", "foo", 1, b"foo")]);
    let upd = update(
        DEFAULT_CHAIN,
        vec![pair("foo", "foo", 0, b"foo"), pair("bar", "bar", 2, b"bar")],
    );
    let err = assert_rejected(&h, &upd, ErrorKind::InvalidSequence);
    assert_eq!(err.key(), Some("foo"));
}

#[test]
fn test_config_change_skipped_version() {
    let h = harness(vec![pair("foo", "foo", 1, b"foo")]);
    let upd = update(DEFAULT_CHAIN, vec![pair("foo", "foo", 3, b"foo")]);
    assert_rejected(&h, &upd, ErrorKind::InvalidSequence);
}

#[test]
fn test_config_change_old_sequence() {
    let h = harness(vec![pair("foo", "foo", 1, b"foo")]);
    let upd = update(
        DEFAULT_CHAIN,
        vec![pair("foo", "foo", 2, b"foo"), pair("bar", "bar", 1, b"bar")],
    );
    let err = assert_rejected(&h, &upd, ErrorKind::StaleSequence);
    assert_eq!(err.key(), Some("bar"));
}

#[test]
fn test_new_entry_must_clear_raised_watermark() {
    let h = harness(vec![pair("foo", "foo", 0, b"foo")]);
    h.manager
        .apply(&update(
            DEFAULT_CHAIN,
            vec![pair("foo", "foo", 1, b"foo"), pair("bar", "bar", 5, b"bar")],
        ))
        .unwrap();
    assert_eq!(h.manager.current_config().watermark(), 5);

    let stale = update(
        DEFAULT_CHAIN,
        vec![
            pair("foo", "foo", 1, b"foo"),
            pair("bar", "bar", 5, b"bar"),
            pair("baz", "baz", 5, b"baz"),
        ],
    );
    assert_rejected(&h, &stale, ErrorKind::StaleSequence);
}

#[test]
fn test_silent_config_modification() {
    let h = harness(vec![pair("foo", "foo", 0, b"foo"), pair("bar", "bar", 0, b"bar")]);
    let upd = update(
        DEFAULT_CHAIN,
        vec![pair("foo", "foo", 0, b"different"), pair("bar", "bar", 1, b"bar")],
    );
    let err = assert_rejected(&h, &upd, ErrorKind::SilentModification);
    assert_eq!(err.key(), Some("foo"));
}

// =============================================================================
// DELETION
// =============================================================================

#[test]
fn test_config_implicit_delete() {
    let h = harness(vec![pair("foo", "foo", 0, b"foo"), pair("bar", "bar", 0, b"bar")]);
    let upd = update(DEFAULT_CHAIN, vec![pair("bar", "bar", 1, b"bar")]);
    let err = assert_rejected(&h, &upd, ErrorKind::ImplicitDelete);
    assert_eq!(err.key(), Some("foo"));
}

// =============================================================================
// AUTHORIZATION
// =============================================================================

#[test]
fn test_config_change_violates_policy() {
    let h = harness(vec![pair("foo", "foo", 0, b"foo")]);
    h.policies
        .set_fallback(Some(Arc::new(RejectAllPolicy::new("err"))));

    let upd = update(DEFAULT_CHAIN, vec![pair("foo", "foo", 1, b"foo")]);
    let err = assert_rejected(&h, &upd, ErrorKind::PolicyViolation);
    assert_eq!(
        err,
        ConfigTxError::PolicyViolation {
            key: "foo".into(),
            policy: "foo".into(),
            reason: "err".into(),
        }
    );
}

#[test]
fn test_unchanged_config_violates_policy() {
    let h = harness(vec![pair("foo", "foo", 0, b"foo")]);
    h.policies
        .set_policy("foo", Arc::new(RejectAllPolicy::new("err")));

    let upd = update(
        DEFAULT_CHAIN,
        vec![pair("foo", "foo", 0, b"foo"), pair("bar", "bar", 1, b"foo")],
    );

    h.manager.validate(&upd).unwrap();
    let applied = h.manager.apply(&upd).unwrap();
    assert_eq!(applied.diff.unchanged().collect::<Vec<_>>(), vec!["foo"]);
    assert_eq!(applied.diff.added().collect::<Vec<_>>(), vec!["bar"]);
}

#[test]
fn test_new_entry_violates_policy() {
    let h = harness(vec![pair("foo", "foo", 0, b"foo")]);
    h.policies
        .set_policy("bar", Arc::new(RejectAllPolicy::new("bar admins required")));

    let upd = update(
        DEFAULT_CHAIN,
        vec![pair("foo", "foo", 0, b"foo"), pair("bar", "bar", 1, b"bar")],
    );
    let err = assert_rejected(&h, &upd, ErrorKind::PolicyViolation);
    assert_eq!(err.key(), Some("bar"));
    assert_eq!(
        err,
        ConfigTxError::PolicyViolation {
            key: "bar".into(),
            policy: "bar".into(),
            reason: "bar admins required".into(),
        }
    );
    assert!(h.handler.proposed().is_empty());
}

#[test]
fn test_modification_checked_against_proposed_policy() {
    let h = harness(vec![pair("foo", "old", 0, b"foo")]);
    h.policies
        .set_policy("new", Arc::new(RejectAllPolicy::new("new policy unmet")));

    let upd = update(DEFAULT_CHAIN, vec![pair("foo", "new", 1, b"foo")]);
    let err = assert_rejected(&h, &upd, ErrorKind::PolicyViolation);
    assert!(err.to_string().contains("new policy unmet"));
}

#[test]
fn test_unknown_policy_fails_closed() {
    let h = harness(vec![pair("foo", "foo", 0, b"foo")]);
    h.policies.set_fallback(None);

    let upd = update(DEFAULT_CHAIN, vec![pair("foo", "foo", 1, b"foo")]);
    let err = assert_rejected(&h, &upd, ErrorKind::PolicyViolation);
    assert!(matches!(err, ConfigTxError::PolicyNotFound { .. }));
}

// =============================================================================
// HANDLER
// =============================================================================

#[test]
fn test_invalid_proposal() {
    let h = harness(vec![pair("foo", "foo", 0, b"foo")]);
    h.handler.set_rejection(Some("err".into()));

    let upd = update(DEFAULT_CHAIN, vec![pair("foo", "foo", 1, b"foo")]);
    let err = assert_rejected(&h, &upd, ErrorKind::HandlerRejected);
    assert_eq!(err, ConfigTxError::HandlerRejected { reason: "err".into() });
    // proposed on validate and again on apply
    assert_eq!(h.handler.proposed(), vec![1, 1]);
}

#[test]
fn test_handler_sees_full_candidate() {
    let h = harness(vec![pair("foo", "foo", 0, b"foo"), pair("bar", "bar", 0, b"bar")]);
    let upd = update(
        DEFAULT_CHAIN,
        vec![pair("foo", "foo", 0, b"foo"), pair("bar", "bar", 1, b"bar2")],
    );

    let validated = h.manager.validate(&upd).unwrap();

    assert_eq!(validated.candidate.len(), 2);
    assert_eq!(validated.candidate.get("foo").map(|v| v.payload.clone()), Some(b"foo".to_vec()));
    assert_eq!(validated.candidate.get("bar").map(|v| v.payload.clone()), Some(b"bar2".to_vec()));
    assert_eq!(h.manager.sequence(), 0);
}

// =============================================================================
// CONVERGENCE
// =============================================================================

#[test]
fn test_identical_histories_converge() {
    let a = harness(vec![pair("foo", "foo", 0, b"foo")]);
    let b = harness(vec![pair("foo", "foo", 0, b"foo")]);

    let updates = vec![
        update(DEFAULT_CHAIN, vec![pair("foo", "foo", 1, b"one")]),
        update(DEFAULT_CHAIN, vec![pair("foo", "foo", 1, b"one"), pair("bar", "bar", 2, b"b")]),
        update(DEFAULT_CHAIN, vec![pair("foo", "foo", 0, b"bad")]),
        update(DEFAULT_CHAIN, vec![pair("foo", "foo", 2, b"two"), pair("bar", "bar", 2, b"b")]),
    ];

    for upd in &updates {
        let ra = a.manager.apply(upd).map(|_| ());
        let rb = b.manager.apply(upd).map(|_| ());
        assert_eq!(ra, rb);
    }

    assert_eq!(a.manager.current_config().digest(), b.manager.current_config().digest());
    assert_eq!(a.manager.sequence(), 3);
}

#[test]
fn test_bootstrap_from_later_snapshot_matches_replayed_node() {
    let replayed = harness(vec![pair("foo", "foo", 0, b"foo")]);
    replayed
        .manager
        .apply(&update(DEFAULT_CHAIN, vec![pair("foo", "foo", 1, b"one")]))
        .unwrap();

    let restored = harness(vec![pair("foo", "foo", 1, b"one")]);

    assert_eq!(
        replayed.manager.current_config().digest(),
        restored.manager.current_config().digest()
    );
}
