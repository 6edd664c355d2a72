mod reconstruct;

pub use reconstruct::{reconstruct, Segment, StackLayout, StackWord};
