use finality_authorities::{
    authority_manager::{AuthorityManager, AuthorityManagerSpec, Configuration},
    types::{authority_list::AuthorityList, block::BlockInfo},
};

use super::{chain::MockChain, mem_db::MemDB};

/// Prepare and start an authority manager over `chain` and `db`, with event logging enabled.
pub(crate) fn authority_manager(
    chain: &MockChain,
    db: &MemDB,
    genesis: BlockInfo,
    genesis_authorities: AuthorityList,
) -> AuthorityManager<MemDB, MockChain> {
    let configuration = Configuration::builder()
        .genesis_block(genesis)
        .genesis_authorities(genesis_authorities)
        .log_events(true)
        .build();

    let authority_manager = AuthorityManagerSpec::builder()
        .configuration(configuration)
        .ancestry(chain.clone())
        .kv_store(db.clone())
        .build()
        .prepare()
        .unwrap();
    authority_manager.start();
    authority_manager
}
