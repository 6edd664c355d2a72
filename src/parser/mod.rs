mod backtrace;
mod frame_info;
mod memory;
mod registers;
mod types;

pub use backtrace::{parse_backtrace, split_arguments};
pub use frame_info::parse_frame_info;
pub use memory::parse_stack_memory;
pub use registers::parse_registers;
pub use types::{
    format_address, format_word, parse_hex, Argument, Frame, FrameDetail, RegisterSet,
};
pub(crate) use types::opt_hex;
