pub mod diagnostics;
pub use self::diagnostics::test_supabase;

pub mod health;
pub use self::health::health;

pub mod login;
pub use self::login::login;

pub mod public_config;
pub use self::public_config::{public_config, PublicConfig};

pub mod signup;
pub use self::signup::signup;
