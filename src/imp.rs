mod all_any;
mod count;
mod find;
mod first;
mod fold;
mod object;
mod vec;

pub use all_any::*;
pub use count::*;
pub use find::*;
pub use first::*;
pub use fold::*;
pub use object::*;
pub use vec::*;
