pub use ai::*;
pub use cards::*;
pub use cards_set::*;
pub use config::*;
pub use errors::*;
pub use protocol::*;
pub use rules::*;
pub use state::*;
pub use sync::*;

mod ai;
#[cfg(test)]
mod arbitrary;
mod cards;
mod cards_set;
mod config;
mod errors;
mod protocol;
mod rules;
mod state;
mod sync;
