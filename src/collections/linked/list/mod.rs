mod iter;
mod linked_list;
mod node;
mod state;
mod tests;

pub use iter::*;
pub use linked_list::*;
pub(crate) use node::*;
pub(crate) use state::*;
