pub mod mock_auth;

pub use mock_auth::MockAuthenticator;
