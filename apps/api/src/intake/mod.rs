// Resume intake: turns an uploaded PDF into the plain text the generator takes as input.

pub mod handlers;
pub mod pdf;
