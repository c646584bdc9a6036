use finality_authorities::{
    authority_manager::AuthorityManagerError,
    grandpa::messages::{Equivocation, GrandpaJustification, SignedMessage, SignedPrecommit, Vote},
    types::{
        block::BlockInfo,
        crypto_primitives::VerifyingKeyBytes,
        data_types::{MembershipCounter, RoundNumber, SignatureBytes, Weight},
    },
};

mod common;

use crate::common::{
    chain::MockChain,
    keys::{authorities, random_authorities, verifying_keys},
    mem_db::MemDB,
    setup::authority_manager,
};

fn signed(vote: Vote, id: VerifyingKeyBytes) -> SignedMessage {
    SignedMessage {
        message: vote,
        signature: SignatureBytes::new([0; 64]),
        id,
    }
}

fn precommit(block: BlockInfo, id: VerifyingKeyBytes) -> SignedPrecommit {
    SignedPrecommit {
        precommit: block,
        signature: SignatureBytes::new([0; 64]),
        id,
    }
}

fn equivocation(id: VerifyingKeyBytes, first: Vote, second: Vote) -> Equivocation {
    Equivocation {
        round: RoundNumber::new(3),
        id,
        first: signed(first, id),
        second: signed(second, id),
    }
}

#[test]
fn equivocation_needs_two_different_votes_of_the_same_kind_by_the_same_voter() {
    let chain = MockChain::new();
    let main = chain.main_chain(5);
    let fork = chain.extend(&main[3], 2, 1);
    let ids: Vec<VerifyingKeyBytes> = verifying_keys(0, 2).iter().map(|id| id.to_bytes()).collect();

    assert!(equivocation(ids[0], Vote::Prevote(main[4]), Vote::Prevote(fork[0])).is_well_formed());
    assert!(
        equivocation(ids[0], Vote::Precommit(main[4]), Vote::Precommit(fork[0])).is_well_formed()
    );

    // Same block twice.
    assert!(!equivocation(ids[0], Vote::Prevote(main[4]), Vote::Prevote(main[4])).is_well_formed());

    // A prevote and a precommit for different blocks are not conflicting.
    assert!(
        !equivocation(ids[0], Vote::Prevote(main[4]), Vote::Precommit(fork[0])).is_well_formed()
    );

    // Votes cast by someone other than the accused.
    let mut framed = equivocation(ids[0], Vote::Prevote(main[4]), Vote::Prevote(fork[0]));
    framed.second.id = ids[1];
    assert!(!framed.is_well_formed());
}

#[test]
fn equivocator_is_located_by_identity() {
    let chain = MockChain::new();
    let main = chain.main_chain(5);
    let fork = chain.extend(&main[3], 2, 1);
    let authority_list = authorities(0, 3);
    let outsider = verifying_keys(50, 1)[0].to_bytes();

    let by_member = equivocation(
        verifying_keys(0, 3)[2].to_bytes(),
        Vote::Prevote(main[4]),
        Vote::Prevote(fork[0]),
    );
    let by_outsider = equivocation(outsider, Vote::Prevote(main[4]), Vote::Prevote(fork[0]));

    assert_eq!(by_member.equivocator_index(&authority_list), Some(2));
    assert_eq!(by_outsider.equivocator_index(&authority_list), None);
}

#[test]
fn reported_equivocator_is_disabled_from_the_reporting_block() {
    let chain = MockChain::new();
    let main = chain.main_chain(20);
    let fork = chain.extend(&main[3], 10, 1);
    let db = MemDB::new();
    let authority_manager = authority_manager(&chain, &db, main[0], authorities(0, 3));
    let ids: Vec<VerifyingKeyBytes> = verifying_keys(0, 3).iter().map(|id| id.to_bytes()).collect();

    let proof = equivocation(ids[1], Vote::Precommit(main[4]), Vote::Precommit(fork[0]));
    authority_manager.report_equivocation(&main[6], &proof).unwrap();

    assert!(!authority_manager.authorities(&main[5]).unwrap().is_disabled(1));
    assert!(authority_manager.authorities(&main[6]).unwrap().is_disabled(1));
    assert!(authority_manager.authorities(&main[15]).unwrap().is_disabled(1));
    assert!(!authority_manager.authorities(&fork[5]).unwrap().is_disabled(1));

    let malformed = equivocation(ids[1], Vote::Precommit(main[4]), Vote::Precommit(main[4]));
    assert!(matches!(
        authority_manager.report_equivocation(&main[6], &malformed),
        Err(AuthorityManagerError::InvalidEquivocation { .. })
    ));

    let outsider = verifying_keys(50, 1)[0].to_bytes();
    let by_outsider = equivocation(outsider, Vote::Prevote(main[4]), Vote::Prevote(fork[0]));
    assert!(matches!(
        authority_manager.report_equivocation(&main[6], &by_outsider),
        Err(AuthorityManagerError::InvalidEquivocation { .. })
    ));
}

#[test]
fn justification_counts_each_enabled_authority_once() {
    let chain = MockChain::new();
    let main = chain.main_chain(5);
    let (signing_keys, mut authority_list) = random_authorities(&[3, 3, 2, 2]);
    let ids: Vec<VerifyingKeyBytes> = signing_keys
        .iter()
        .map(|key| key.verifying_key().to_bytes())
        .collect();
    let outsider = verifying_keys(50, 1)[0].to_bytes();

    // Total weight 10, quorum 7.
    let justification = |items: Vec<SignedPrecommit>| GrandpaJustification {
        round_number: RoundNumber::new(1),
        block_info: main[4],
        items,
    };

    let two_heavy = justification(vec![precommit(main[4], ids[0]), precommit(main[4], ids[1])]);
    assert_eq!(two_heavy.precommit_weight(&authority_list).int(), 6);
    assert!(!two_heavy.has_quorum(&authority_list));

    let with_duplicates = justification(vec![
        precommit(main[4], ids[0]),
        precommit(main[4], ids[0]),
        precommit(main[4], ids[1]),
        precommit(main[4], outsider),
    ]);
    assert_eq!(with_duplicates.precommit_weight(&authority_list).int(), 6);
    assert!(!with_duplicates.has_quorum(&authority_list));

    let enough = justification(vec![
        precommit(main[4], ids[0]),
        precommit(main[4], ids[1]),
        precommit(main[4], ids[2]),
    ]);
    assert_eq!(enough.precommit_weight(&authority_list).int(), 8);
    assert!(enough.has_quorum(&authority_list));

    // Disabling authority 2 lowers the total to 8 and the quorum to 6, and its precommit stops
    // counting.
    authority_list.disable(2);
    assert_eq!(enough.precommit_weight(&authority_list).int(), 6);
    assert!(enough.has_quorum(&authority_list));
    assert_eq!(authority_list.quorum().int(), 6);
    assert_eq!(authority_list.get(2).map(|authority| authority.weight), Some(Weight::new(2)));
}

#[test]
fn vote_digest_is_bound_to_round_and_counter() {
    let chain = MockChain::new();
    let main = chain.main_chain(5);
    let vote = Vote::Prevote(main[4]);

    let digest = vote.digest(RoundNumber::new(1), MembershipCounter::new(0)).unwrap();
    assert_eq!(
        digest,
        vote.digest(RoundNumber::new(1), MembershipCounter::new(0)).unwrap()
    );
    assert_ne!(
        digest,
        vote.digest(RoundNumber::new(2), MembershipCounter::new(0)).unwrap()
    );
    assert_ne!(
        digest,
        vote.digest(RoundNumber::new(1), MembershipCounter::new(1)).unwrap()
    );
    assert_ne!(
        digest,
        Vote::Precommit(main[4])
            .digest(RoundNumber::new(1), MembershipCounter::new(0))
            .unwrap()
    );
}
