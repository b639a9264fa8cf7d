pub mod db;
pub mod portal;
pub mod secrets;

pub use db::DbAdapter;
pub use portal::ReqwestPortalClient;
pub use secrets::EnvSecretSource;
