use borsh::BorshSerialize;
use finality_authorities::{
    authority_manager::AuthorityManagerError,
    consensus::{
        encode_authorities, ConsensusEngineId, ConsensusMessage, BABE_ENGINE_ID,
        GRANDPA_ENGINE_ID,
    },
    types::data_types::BlockNumber,
};
use log::LevelFilter;

mod common;

use crate::common::{
    chain::MockChain, keys::authorities, logging::setup_logger, mem_db::MemDB,
    setup::authority_manager,
};

const UNKNOWN_ENGINE_ID: ConsensusEngineId = ConsensusEngineId::new(*b"aura");

fn scheduled_change(seed: u8, count: u8, delay: u64) -> ConsensusMessage {
    ConsensusMessage::ScheduledChange {
        authorities: encode_authorities(&authorities(seed, count)),
        delay,
    }
}

#[test]
fn digests_from_unknown_engines_are_not_decoded() {
    let garbage = [0xff, 0x00, 0x13];
    assert!(ConsensusMessage::from_digest(&UNKNOWN_ENGINE_ID, &garbage)
        .unwrap()
        .is_none());
    assert!(!UNKNOWN_ENGINE_ID.is_known());
    assert!(GRANDPA_ENGINE_ID.is_known());
    assert!(BABE_ENGINE_ID.is_known());
    assert_eq!(GRANDPA_ENGINE_ID.to_string(), "FRNK");
}

#[test]
fn digests_from_known_engines_are_decoded() {
    let message = scheduled_change(10, 4, 5);
    let payload = message.try_to_vec().unwrap();

    assert_eq!(
        ConsensusMessage::from_digest(&GRANDPA_ENGINE_ID, &payload).unwrap(),
        Some(message)
    );
    assert!(ConsensusMessage::from_digest(&GRANDPA_ENGINE_ID, &[0xff, 0x00, 0x13]).is_err());
}

#[test]
fn delays_are_counted_from_the_carrying_block() {
    let at = BlockNumber::new(10);
    assert_eq!(scheduled_change(10, 4, 5).activate_at(at), BlockNumber::new(15));
    assert_eq!(ConsensusMessage::Pause { delay: 3 }.activate_at(at), BlockNumber::new(13));
    assert_eq!(
        ConsensusMessage::OnDisabled { authority_index: 1 }.activate_at(at),
        BlockNumber::new(10)
    );
}

#[test]
fn on_consensus_dispatches_known_messages() {
    setup_logger(LevelFilter::Trace);

    let chain = MockChain::new();
    let main = chain.main_chain(30);
    let db = MemDB::new();
    let authority_manager = authority_manager(&chain, &db, main[0], authorities(0, 3));

    authority_manager
        .on_consensus(&GRANDPA_ENGINE_ID, &main[10], &scheduled_change(10, 4, 5))
        .unwrap();
    assert_eq!(authority_manager.authorities(&main[14]).unwrap(), authorities(0, 3));
    assert_eq!(authority_manager.authorities(&main[15]).unwrap(), authorities(10, 4));

    let forced = ConsensusMessage::ForcedChange {
        authorities: encode_authorities(&authorities(20, 2)),
        delay: 2,
    };
    authority_manager
        .on_consensus(&GRANDPA_ENGINE_ID, &main[12], &forced)
        .unwrap();
    assert_eq!(authority_manager.authorities(&main[15]).unwrap(), authorities(20, 2));

    authority_manager
        .on_consensus(&BABE_ENGINE_ID, &main[16], &ConsensusMessage::Pause { delay: 4 })
        .unwrap();
    assert!(authority_manager.finality_enabled(&main[19]).unwrap());
    assert!(!authority_manager.finality_enabled(&main[20]).unwrap());

    authority_manager
        .on_consensus(
            &GRANDPA_ENGINE_ID,
            &main[17],
            &ConsensusMessage::OnDisabled { authority_index: 1 },
        )
        .unwrap();
    assert!(authority_manager.authorities(&main[17]).unwrap().is_disabled(1));
    assert!(!authority_manager.authorities(&main[16]).unwrap().is_disabled(1));
}

#[test]
fn on_consensus_ignores_unknown_engines() {
    let chain = MockChain::new();
    let main = chain.main_chain(30);
    let db = MemDB::new();
    let authority_manager = authority_manager(&chain, &db, main[0], authorities(0, 3));

    authority_manager
        .on_consensus(&UNKNOWN_ENGINE_ID, &main[10], &scheduled_change(10, 4, 5))
        .unwrap();

    assert_eq!(authority_manager.schedule_tree().len(), 1);
    assert_eq!(authority_manager.authorities(&main[20]).unwrap(), authorities(0, 3));
}

#[test]
fn on_consensus_rejects_invalid_messages() {
    let chain = MockChain::new();
    let main = chain.main_chain(30);
    let db = MemDB::new();
    let authority_manager = authority_manager(&chain, &db, main[0], authorities(0, 3));

    assert!(matches!(
        authority_manager.on_consensus(&GRANDPA_ENGINE_ID, &main[10], &scheduled_change(10, 4, 0)),
        Err(AuthorityManagerError::InvalidActivationHeight { .. })
    ));
    assert!(matches!(
        authority_manager.on_consensus(
            &GRANDPA_ENGINE_ID,
            &main[10],
            &ConsensusMessage::Resume { delay: 0 }
        ),
        Err(AuthorityManagerError::InvalidActivationHeight { .. })
    ));
    assert!(matches!(
        authority_manager.on_consensus(
            &GRANDPA_ENGINE_ID,
            &main[10],
            &ConsensusMessage::OnDisabled { authority_index: 7 }
        ),
        Err(AuthorityManagerError::InvalidAuthorityIndex { .. })
    ));

    assert_eq!(authority_manager.schedule_tree().len(), 1);
}

#[test]
fn digest_authorities_replace_the_set_with_every_member_enabled() {
    let chain = MockChain::new();
    let main = chain.main_chain(30);
    let db = MemDB::new();
    let authority_manager = authority_manager(&chain, &db, main[0], authorities(0, 4));

    // Disable two members, then schedule the same members back in through a digest.
    authority_manager.apply_on_disabled(&main[5], 0).unwrap();
    authority_manager.apply_on_disabled(&main[6], 1).unwrap();
    let before = authority_manager.authorities(&main[19]).unwrap();
    assert_eq!(before.disabled().collect::<Vec<usize>>(), vec![0, 1]);
    assert_eq!(before.total_weight().int(), 2);

    let mut disabled_list = authorities(0, 4);
    disabled_list.disable(0);
    disabled_list.disable(1);
    let digest_authorities = encode_authorities(&disabled_list);
    assert_eq!(digest_authorities.len(), 4);

    authority_manager
        .on_consensus(
            &GRANDPA_ENGINE_ID,
            &main[10],
            &ConsensusMessage::ScheduledChange {
                authorities: digest_authorities,
                delay: 10,
            },
        )
        .unwrap();

    let after = authority_manager.authorities(&main[20]).unwrap();
    assert_eq!(after, authorities(0, 4));
    assert_eq!(after.disabled().count(), 0);
    assert_eq!(after.total_weight().int(), 4);
}
