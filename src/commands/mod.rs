pub mod demo_command;
pub mod key_pair;

pub use self::{demo_command::*, key_pair::*};
