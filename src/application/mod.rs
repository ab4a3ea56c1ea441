pub mod daily;
pub mod ledger;

mod locks;
