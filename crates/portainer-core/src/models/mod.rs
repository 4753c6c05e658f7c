pub mod stack;

pub use stack::{EdgeStack, RegularStack, Stack, StackFile, STACK_STATUS_ACTIVE};
