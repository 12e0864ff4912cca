mod bmc_host;
mod bmc_password;
mod bmc_url;
mod bmc_username;

pub use bmc_host::BmcHost;
pub use bmc_password::BmcPassword;
pub use bmc_url::BmcUrl;
pub use bmc_username::BmcUsername;
