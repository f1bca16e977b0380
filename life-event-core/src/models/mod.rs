mod field;
mod life_event;

pub use field::Field;
pub use life_event::{LifeEventInput, LifeEventRecord};
