mod calendar;
mod donation;
mod ledger;
mod money;
mod user;

pub use calendar::*;
pub use donation::*;
pub use ledger::*;
pub use money::*;
pub use user::*;
