mod subscription_loop;

pub use subscription_loop::*;
