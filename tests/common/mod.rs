pub(crate) mod chain;

pub(crate) mod keys;

pub(crate) mod logging;

pub(crate) mod mem_db;

pub(crate) mod setup;
