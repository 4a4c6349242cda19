mod session;

pub use session::{SessionStore, TOKEN_KEY};
